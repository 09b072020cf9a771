use std::path::{Path, PathBuf};

use clap::ArgMatches;
use themetoken::theme::{load_color_scheme, ThemeError};
use themetoken::{CodecError, TokenCodec};

use crate::cmd::{CodecArgs, RequestArgs};
use crate::exit::{io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_result, OutputFormat};

const DEFAULT_THEME_TITLE: &str = "themetoken";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Decode,
    Encode,
    EncodeJson,
    Theme,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Decode => "decode",
            Operation::Encode => "encode",
            Operation::EncodeJson => "json",
            Operation::Theme => "theme",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Operation::Decode => "decoded",
            Operation::Encode | Operation::EncodeJson | Operation::Theme => "encoded",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Decode(String),
    Encode(String),
    EncodeJson(String),
    Theme(PathBuf),
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::Decode(_) => Operation::Decode,
            Request::Encode(_) => Operation::Encode,
            Request::EncodeJson(_) => Operation::EncodeJson,
            Request::Theme(_) => Operation::Theme,
        }
    }

    pub fn input(&self) -> String {
        match self {
            Request::Decode(s) | Request::Encode(s) | Request::EncodeJson(s) => s.clone(),
            Request::Theme(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Theme(#[from] ThemeError),
}

/// Collect request flags in the order they appeared on the command line.
pub fn ordered_requests(matches: &ArgMatches) -> Vec<Request> {
    let mut indexed: Vec<(usize, Request)> = Vec::new();
    for (id, wrap) in [
        ("decode", Request::Decode as fn(String) -> Request),
        ("encode", Request::Encode),
        ("json", Request::EncodeJson),
    ] {
        if let (Some(values), Some(indices)) =
            (matches.get_many::<String>(id), matches.indices_of(id))
        {
            indexed.extend(indices.zip(values.cloned().map(wrap)));
        }
    }
    if let (Some(values), Some(indices)) =
        (matches.get_many::<PathBuf>("theme"), matches.indices_of("theme"))
    {
        indexed.extend(indices.zip(values.cloned().map(Request::Theme)));
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, request)| request).collect()
}

pub fn run(
    matches: &ArgMatches,
    args: &RequestArgs,
    codec_args: &CodecArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let requests = ordered_requests(matches);
    if requests.is_empty() {
        return Err(CliError::new(
            USAGE,
            "nothing to do: pass --decode, --encode, --json or --theme (see --help)",
        ));
    }

    let config = codec_args.to_config()?;
    let codec = TokenCodec::from_config(&config);
    tracing::debug!(backend = codec.backend(), requests = requests.len(), "processing requests");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("failed to start async runtime", err))?;

    runtime.block_on(async {
        for request in &requests {
            let operation = request.operation();
            match execute(&codec, request, args.title.as_deref()).await {
                Ok(output) => {
                    print_result(operation, &request.input(), &output, codec.backend(), format)
                }
                Err(err) => {
                    tracing::debug!(operation = operation.as_str(), error = ?err, "request failed");
                    eprintln!("error: {} failed: {err}", operation.as_str());
                }
            }
        }
    });

    // Request failures are reported individually and leave the exit status alone.
    Ok(SUCCESS)
}

async fn execute(
    codec: &TokenCodec,
    request: &Request,
    title: Option<&str>,
) -> Result<String, RequestError> {
    match request {
        // Tokens pasted from a terminal often carry a newline or indentation.
        Request::Decode(token) => Ok(codec.decode(token.trim()).await?),
        Request::Encode(text) => Ok(codec.encode_text(text).await?),
        Request::EncodeJson(json) => Ok(codec.encode_json(json).await?),
        Request::Theme(path) => {
            let scheme = load_color_scheme(path)?;
            let title = theme_title(title, scheme.name.as_deref(), path);
            Ok(codec.encode_value(&scheme.to_theme(&title)).await?)
        }
    }
}

fn theme_title(explicit: Option<&str>, scheme_name: Option<&str>, path: &Path) -> String {
    explicit
        .or(scheme_name)
        .map(str::to_string)
        .or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_THEME_TITLE.to_string())
}
