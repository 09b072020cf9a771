mod cmd;
mod exit;
mod logging;
mod output;

use clap::{CommandFactory, FromArgMatches, Parser};

use crate::cmd::{CodecArgs, Command, RequestArgs};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "themetoken",
    version,
    about = "Encode and decode URL-safe theme tokens",
    after_help = "Requests run in the order given; each reports its own result or error."
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "raw", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "THEMETOKEN_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(flatten)]
    codec: CodecArgs,

    #[command(flatten)]
    requests: RequestArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() {
    // Keep the raw matches: request order comes from argument indices.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    init_logging(cli.log_format, cli.log_level);

    let result = match cli.command {
        Some(command) => cmd::run(command, &cli.codec, cli.format),
        None => cmd::request::run(&matches, &cli.requests, &cli.codec, cli.format),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
