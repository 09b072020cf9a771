use std::io::Write;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::cmd::request::Operation;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Only the resulting token or decoded payload.
    Raw,
    Json,
    Table,
    Pretty,
}

const PREVIEW_CHARS: usize = 48;

#[derive(Serialize)]
struct RequestOutput<'a> {
    operation: &'a str,
    backend: &'a str,
    input: &'a str,
    output: &'a str,
}

pub fn print_result(
    operation: Operation,
    input: &str,
    output: &str,
    backend: &str,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Raw => print_line(output),
        OutputFormat::Json => {
            let out = RequestOutput {
                operation: operation.as_str(),
                backend,
                input,
                output,
            };
            print_line(&serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string()));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OPERATION", "BACKEND", "INPUT", "OUTPUT"])
                .add_row(vec![
                    operation.as_str().to_string(),
                    backend.to_string(),
                    preview(input),
                    output.to_string(),
                ]);
            print_line(&table.to_string());
        }
        OutputFormat::Pretty => {
            print_line(&format!("{} value:", operation.past_tense()));
            print_line(output);
        }
    }
}

fn print_line(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{text}");
    let _ = out.flush();
}

fn preview(input: &str) -> String {
    if input.chars().count() <= PREVIEW_CHARS {
        return input.to_string();
    }
    let head: String = input.chars().take(PREVIEW_CHARS).collect();
    format!("{head}…")
}
