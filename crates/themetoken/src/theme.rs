//! Browser theme generation from a sixteen-color scheme.
//!
//! A color scheme is the usual terminal palette: colors 0-7 are the normal
//! black, red, green, yellow, blue, magenta, cyan and white, 8-15 their bright
//! variants. Each theme field is taken from one palette slot.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use themetoken_pack::Value;

/// Number of colors in a scheme.
pub const PALETTE_SIZE: usize = 16;

/// Theme color field and the palette slot it is drawn from.
pub const THEME_FIELDS: &[(&str, usize)] = &[
    ("frame", 0),
    ("frame_inactive", 0),
    ("tab_background_text", 7),
    ("tab_selected", 8),
    ("tab_text", 15),
    ("tab_line", 4),
    ("tab_loading", 4),
    ("toolbar", 8),
    ("toolbar_text", 15),
    ("toolbar_bottom_separator", 0),
    ("toolbar_vertical_separator", 8),
    ("toolbar_field", 0),
    ("toolbar_field_text", 7),
    ("toolbar_field_focus", 0),
    ("toolbar_field_text_focus", 15),
    ("toolbar_field_border_focus", 12),
    ("toolbar_field_highlight", 4),
    ("toolbar_field_highlight_text", 15),
    ("button_background_active", 4),
    ("icons", 7),
    ("icons_attention", 11),
    ("popup", 0),
    ("popup_text", 7),
    ("popup_border", 8),
    ("popup_highlight", 4),
    ("popup_highlight_text", 15),
    ("sidebar", 0),
    ("sidebar_text", 7),
    ("sidebar_border", 8),
    ("sidebar_highlight", 4),
    ("sidebar_highlight_text", 15),
    ("ntp_background", 0),
    ("ntp_text", 7),
];

/// Errors that can occur while reading a color scheme.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// A color is not `#rgb` or `#rrggbb`.
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),

    /// The scheme does not hold exactly sixteen colors.
    #[error("expected 16 colors, found {0}")]
    ColorCount(usize),

    /// A keyed scheme lacks one of `color0`..`color15`.
    #[error("color scheme is missing {0}")]
    MissingColor(String),

    /// The scheme looks like JSON but does not parse.
    #[error("invalid color scheme document: {0}")]
    Json(#[from] serde_json::Error),

    /// The scheme file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ThemeError>;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rrggbb` or `#rgb`; the leading `#` is optional.
    pub fn parse_hex(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || ThemeError::InvalidColor(input.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => Ok(Self {
                r: channel(&hex[0..1])? * 0x11,
                g: channel(&hex[1..2])? * 0x11,
                b: channel(&hex[2..3])? * 0x11,
            }),
            _ => Err(invalid()),
        }
    }

    /// `{"r": .., "g": .., "b": ..}`
    pub fn to_value(self) -> Value {
        Value::Map(vec![
            ("r".to_string(), Value::from(self.r)),
            ("g".to_string(), Value::from(self.g)),
            ("b".to_string(), Value::from(self.b)),
        ])
    }
}

#[derive(Deserialize)]
struct SchemeDocument {
    #[serde(default)]
    name: Option<String>,
    colors: SchemeColors,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemeColors {
    List(Vec<String>),
    Keyed(BTreeMap<String, String>),
}

/// A parsed sixteen-color scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: Option<String>,
    pub colors: [Rgb; PALETTE_SIZE],
}

impl ColorScheme {
    /// Parse a scheme document.
    ///
    /// Accepted forms:
    /// - JSON with `"colors": ["#rrggbb", ...]`
    /// - JSON with `"colors": {"color0": "#rrggbb", ..., "color15": ...}`
    /// - plain text, one color per non-empty line (`//` lines are comments)
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim_start().starts_with('{') {
            let doc: SchemeDocument = serde_json::from_str(input)?;
            let hex = match doc.colors {
                SchemeColors::List(list) => list,
                SchemeColors::Keyed(mut keyed) => (0..PALETTE_SIZE)
                    .map(|i| {
                        let key = format!("color{i}");
                        keyed.remove(&key).ok_or(ThemeError::MissingColor(key))
                    })
                    .collect::<Result<Vec<_>>>()?,
            };
            return Self::from_hex(doc.name, &hex);
        }

        let lines: Vec<&str> = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("//"))
            .collect();
        Self::from_hex(None, &lines)
    }

    fn from_hex<S: AsRef<str>>(name: Option<String>, hex: &[S]) -> Result<Self> {
        if hex.len() != PALETTE_SIZE {
            return Err(ThemeError::ColorCount(hex.len()));
        }
        let mut colors = [Rgb { r: 0, g: 0, b: 0 }; PALETTE_SIZE];
        for (slot, color) in colors.iter_mut().zip(hex) {
            *slot = Rgb::parse_hex(color.as_ref())?;
        }
        Ok(Self { name, colors })
    }

    /// Build the theme value, titled `title`.
    pub fn to_theme(&self, title: &str) -> Value {
        let colors = THEME_FIELDS
            .iter()
            .map(|(field, slot)| (field.to_string(), self.colors[*slot].to_value()))
            .collect();
        Value::Map(vec![
            ("colors".to_string(), Value::Map(colors)),
            (
                "images".to_string(),
                Value::Map(vec![(
                    "additional_backgrounds".to_string(),
                    Value::List(Vec::new()),
                )]),
            ),
            ("title".to_string(), Value::from(title)),
        ])
    }
}

/// Read and parse a scheme file.
pub fn load_color_scheme(path: impl AsRef<Path>) -> Result<ColorScheme> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let scheme = ColorScheme::parse(&text)?;
    tracing::debug!(path = %path.display(), name = ?scheme.name, "loaded color scheme");
    Ok(scheme)
}
