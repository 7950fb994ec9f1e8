//! s5 - S3 shell with directory-style navigation
//!
//! Presents buckets and key prefixes as a folder tree that can be walked
//! with `chlocn`, listed with `list`, and copied to and from.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use s5_core::{ConfigManager, Session, SessionOptions};
use s5_s3::S3Client;
use s5_shell::commands::{Cli, Flow, PROMPT, Shell};
use s5_shell::exit_code::ExitCode;
use s5_shell::output::{Formatter, OutputConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --debug raises the default level; RUST_LOG still wins when set
    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::GeneralError
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let manager = match &cli.config_dir {
        Some(dir) => ConfigManager::with_dir(dir),
        None => ConfigManager::new().context("Failed to locate config directory")?,
    };
    let config = manager.load().with_context(|| {
        format!(
            "Failed to load configuration from {}",
            manager.config_path().display()
        )
    })?;

    let output_config = OutputConfig::resolve(cli.json, cli.no_color, cli.quiet, &config.defaults);
    let formatter = Formatter::new(output_config);

    let client = S3Client::new(&config.connection)
        .await
        .context("Failed to create S3 client")?;
    let session = Session::new(
        Arc::new(client),
        SessionOptions::from(&config.navigation),
    );
    let mut shell = Shell::new(session, formatter, config.connection.region.clone());

    if let Some(command) = cli.command {
        return Ok(match shell.execute(command).await {
            Flow::Continue(code) => code,
            Flow::Exit => ExitCode::Success,
        });
    }

    interactive(&mut shell).await
}

/// Read commands from stdin until `exit` or end of input
async fn interactive(shell: &mut Shell) -> anyhow::Result<ExitCode> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = ExitCode::Success;

    shell
        .formatter()
        .println("Welcome to the AWS S3 Storage Shell (S5)");
    loop {
        if !shell.formatter().is_quiet() {
            print!("{PROMPT}");
            std::io::stdout().flush().context("Failed to write prompt")?;
        }

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match shell.run_line(&line).await {
            Flow::Continue(code) => last = code,
            Flow::Exit => break,
        }
    }

    shell.formatter().println("Exiting");
    Ok(last)
}
