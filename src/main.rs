mod cli;
mod registry;
mod report;
mod search_path;
mod tracker;

use std::{io::Write as _, path::Path, process::ExitCode};

use anyhow::{Context as _, Result};
use cli::{ColorOutput, Invocation, Options, parse_args};
use env_logger::{Builder, Env};
use log::info;
use registry::FileRegistry;
use report::write_report;
use tracker::scan_directory;

fn main() -> Result<ExitCode> {
    let options = match parse_args(std::env::args_os()) {
        Invocation::Scan(options) => options,
        Invocation::ExitSuccess(text) => {
            print!("{text}");
            return Ok(ExitCode::SUCCESS);
        }
        Invocation::ExitFailure(text) => {
            eprint!("{text}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let default_level = if options.verbose { "debug" } else { "warn" };
    let env = Env::new()
        .filter_or("FINDSHADOWED_LOG", default_level)
        .write_style("FINDSHADOWED_LOG_STYLE");
    Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match options.color {
        ColorOutput::Auto => {}
        ColorOutput::Always => owo_colors::set_override(true),
        ColorOutput::Never => owo_colors::set_override(false),
    }

    run(&options)?;
    Ok(ExitCode::SUCCESS)
}

/// Scan the directories in order. Each one is checked against everything
/// before it, so this is strictly sequential.
fn run(options: &Options) -> Result<()> {
    let mut registry = FileRegistry::new();
    let mut stdout = std::io::stdout().lock();

    for dir in &options.directories {
        info!("Scanning {}", Path::new(dir).display());
        match scan_directory(&mut registry, dir) {
            Ok(report) => write_report(&mut stdout, &report, options.mode)
                .context("Failed to write report")?,
            Err(err) if err.is_recoverable() => {
                // Keep the report and the error in the order they happened.
                stdout.flush()?;
                eprintln!("{err}");
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!("Scanned {} distinct file names", registry.len());
    Ok(())
}
