pub mod cli;
pub mod config;
pub mod error;
pub mod markdown;
pub mod monitor;
pub mod renderer;
pub mod repair;
pub mod stream;
pub mod table;
pub mod terminal;
pub mod theme;
pub mod utils;

use anyhow::Result;
use clap::ArgMatches;
use cli::Cli;
use config::Config;
use error::MdtailError;
use repair::Repairer;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use stream::{ReaderChunks, StreamPlayer};
use utils::strip_leading_bom;

const STDIN_READ_SIZE: usize = 4096;

/// Main entry point for the mdtail application
pub fn run(cli: Cli, matches: &ArgMatches) -> Result<()> {
    let mut config = Config::from_cli(&cli, matches)?;

    if cli.follow {
        if let Some(filename) = &cli.filename {
            return monitor::follow_file(filename, &config);
        }
    }

    if cli.repair_only {
        let content = read_whole_input(&cli)?;
        let repaired = Repairer::new(config.repairs).repair(&content);
        let mut stdout = io::stdout().lock();
        stdout.write_all(repaired.as_bytes())?;
        if !repaired.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        return Ok(());
    }

    if !config.raw && !config.no_stream && !io::stdout().is_terminal() {
        log::info!("stdout is not a terminal; rendering once at the end");
        config.no_stream = true;
    }

    let status: Box<dyn Write> = if io::stderr().is_terminal() {
        Box::new(io::stderr())
    } else {
        Box::new(io::sink())
    };

    let received = match input_file(&cli) {
        Some(filename) => {
            let content = read_file(filename)?;
            ensure_content(&content)?;
            StreamPlayer::new(&config, io::stdout())
                .with_status(status)
                .play(stream::chunks(&content, config.chunk_size))?
        }
        None => {
            // Stdin arrives at its own pace; no replay delay.
            let stdin_config = Config {
                delay_ms: 0,
                ..config.clone()
            };
            let mut read_error = None;
            let source = ReaderChunks::new(io::stdin().lock(), STDIN_READ_SIZE).map_while(
                |chunk| match chunk {
                    Ok(text) => Some(text),
                    Err(e) => {
                        read_error = Some(e);
                        None
                    }
                },
            );
            let received = StreamPlayer::new(&stdin_config, io::stdout())
                .with_status(status)
                .play(source)?;
            if let Some(e) = read_error {
                return Err(MdtailError::IoError(e).into());
            }
            received
        }
    };

    ensure_content(&received)
}

fn ensure_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(MdtailError::EmptyInput.into());
    }
    Ok(())
}

fn input_file(cli: &Cli) -> Option<&str> {
    cli.filename.as_deref().filter(|filename| *filename != "-")
}

fn read_file(filename: &str) -> Result<String> {
    let path = Path::new(filename);
    if !path.exists() {
        anyhow::bail!("File not found: {}", filename);
    }
    let mut content = std::fs::read_to_string(path)?;
    strip_leading_bom(&mut content);
    Ok(content)
}

fn read_whole_input(cli: &Cli) -> Result<String> {
    let content = match input_file(cli) {
        Some(filename) => read_file(filename)?,
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            strip_leading_bom(&mut content);
            content
        }
    };

    ensure_content(&content)?;
    Ok(content)
}
