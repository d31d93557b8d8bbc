// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{anyhow, bail};
use clap::{CommandFactory, Parser};
use ffi_gen::{default_jobs, Config, ExprPolicy, GenerateError, WriteMode, DEFAULT_LINUX_SRC};
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ffi-gen")]
#[command(about = "Generate bitflags types from Linux UAPI header constants", long_about = None)]
struct Cli {
    /// Linux source tree
    #[arg(default_value = DEFAULT_LINUX_SRC)]
    linux_src: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "gen")]
    output: PathBuf,

    /// Fail on constant values that cannot be translated
    #[arg(long)]
    strict: bool,

    /// Write each module through a temporary file
    #[arg(long)]
    atomic: bool,

    /// Check that the generated modules are up to date (no generation)
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::default().set_policy(if cli.strict {
        ExprPolicy::Strict
    } else {
        ExprPolicy::Lenient
    });
    let mode = if cli.atomic {
        WriteMode::Atomic
    } else {
        WriteMode::Direct
    };
    let jobs = default_jobs()?;

    if cli.check {
        let mut stale = Vec::new();
        for job in &jobs {
            if !job.check(&cli.linux_src, &cli.output, &config)? {
                stale.push(job.output_path(&cli.output).display().to_string());
            }
        }
        if !stale.is_empty() {
            bail!("out of date: {}", stale.join(", "));
        }
        return Ok(());
    }

    fs::create_dir_all(&cli.output)
        .map_err(|e| anyhow!("failed to create \"{}\": {e}", cli.output.display()))?;
    for job in &jobs {
        job.run(&cli.linux_src, &cli.output, mode, &config)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Error messages already include their cause.
            error!("{e}");
            if let Some(GenerateError::SourceNotFound { .. }) = e.downcast_ref::<GenerateError>() {
                eprintln!("{}", Cli::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}
