#![forbid(unsafe_code)]

//! `wraps`: wrap text to the terminal width.

mod cli;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use lwrap_text::{ConfigError, LineWrap};
use tracing_subscriber::EnvFilter;

use crate::cli::{EOL, Opts};

/// Usage error, as in sysexits.h.
const EX_USAGE: u8 = 64;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(opts: &Opts) -> anyhow::Result<()> {
    let lw = LineWrap::new(opts.wrap_options(|key| std::env::var(key).ok())?)?;

    let mut out: Box<dyn Write> = match &opts.out_file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for input in opts.inputs() {
        let text = input.read()?;
        tracing::debug!(source = %input, bytes = text.len(), "wrapping");
        out.write_all(lw.wrap(&text).as_bytes())
            .and_then(|()| out.write_all(EOL.as_bytes()))
            .context("writing output")?;
    }
    out.flush().context("writing output")?;
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    if err.downcast_ref::<ConfigError>().is_some() {
        ExitCode::from(EX_USAGE)
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EX_USAGE),
            };
        }
    };
    init_tracing(opts.verbose);

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wraps: {err:#}");
            exit_code(&err)
        }
    }
}
