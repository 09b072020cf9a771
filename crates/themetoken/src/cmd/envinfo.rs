use std::collections::BTreeMap;

use serde::Serialize;

use crate::cmd::{CodecArgs, EnvinfoArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

const ENV_VARS: &[&str] = &[
    "THEMETOKEN_BACKEND",
    "THEMETOKEN_COMPRESS_CMD",
    "THEMETOKEN_DECOMPRESS_CMD",
    "THEMETOKEN_TIMEOUT",
    "THEMETOKEN_LOG_LEVEL",
];

#[derive(Serialize)]
struct PlatformInfo {
    os: String,
    arch: String,
}

#[derive(Serialize)]
struct CodecInfo {
    backend: String,
    compress_command: String,
    decompress_command: String,
    timeout_ms: u128,
    zstd_level: i32,
}

#[derive(Serialize)]
struct EnvInfoOutput {
    version: String,
    target: String,
    platform: PlatformInfo,
    codec: CodecInfo,
    dependencies: BTreeMap<String, String>,
    environment: BTreeMap<String, Option<String>>,
}

pub fn run(_args: EnvinfoArgs, codec: &CodecArgs, format: OutputFormat) -> CliResult<i32> {
    let mut deps = BTreeMap::new();
    deps.insert("base64".to_string(), "0.21".to_string());
    deps.insert("clap".to_string(), "4.5".to_string());
    deps.insert("tokio".to_string(), "1".to_string());
    deps.insert("zstd-safe".to_string(), "7".to_string());

    let env = ENV_VARS
        .iter()
        .map(|name| (name.to_string(), std::env::var(name).ok()))
        .collect();

    let output = EnvInfoOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        target: target_triple(),
        platform: PlatformInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        },
        codec: CodecInfo {
            backend: codec.backend.to_string(),
            compress_command: codec.compress_cmd.clone(),
            decompress_command: codec.decompress_cmd.clone(),
            timeout_ms: codec.timeout.as_millis(),
            zstd_level: codec.zstd_level,
        },
        dependencies: deps,
        environment: env,
    };

    print_envinfo(&output, format);
    Ok(SUCCESS)
}

fn target_triple() -> String {
    if let Some(target) = option_env!("THEMETOKEN_BUILD_TARGET") {
        return target.to_string();
    }

    match (std::env::consts::ARCH, std::env::consts::OS) {
        ("aarch64", "macos") => "aarch64-apple-darwin".to_string(),
        ("x86_64", "macos") => "x86_64-apple-darwin".to_string(),
        ("aarch64", "linux") => "aarch64-unknown-linux-gnu".to_string(),
        ("x86_64", "linux") => "x86_64-unknown-linux-gnu".to_string(),
        ("x86_64", "windows") => "x86_64-pc-windows-msvc".to_string(),
        (arch, os) => format!("{arch}-unknown-{os}"),
    }
}

fn print_envinfo(output: &EnvInfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("themetoken environment\n");
            println!("  Version:    {}", output.version);
            println!("  Target:     {}", output.target);
            println!(
                "  Platform:   {} ({})",
                output.platform.os, output.platform.arch
            );
            println!("\n  Codec:");
            println!("    backend      {}", output.codec.backend);
            println!("    compress     {}", output.codec.compress_command);
            println!("    decompress   {}", output.codec.decompress_command);
            println!("    timeout      {}ms", output.codec.timeout_ms);
            println!("    zstd level   {}", output.codec.zstd_level);
            println!("\n  Dependencies:");
            for (k, v) in &output.dependencies {
                println!("    {:<12} {}", k, v);
            }
            println!("\n  Environment:");
            for (k, v) in &output.environment {
                println!("    {:<26} {}", k, v.as_deref().unwrap_or("(not set)"));
            }
        }
        OutputFormat::Raw => println!("{}", output.version),
    }
}
