/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! mtc - render a template against values given on the command line

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mobject::Dict;
use mtemplate::Template;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod data;
mod define;
mod report;

#[derive(Parser, Debug)]
#[command(name = "mtc")]
#[command(version, about = "Render a template file", long_about = None)]
struct Cli {
    /// Define a namespace value (KEY=VALUE, KEY may be a path like a.b[2])
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    defines: Vec<OsString>,

    /// Load namespace values from a JSON or YAML file
    #[arg(short = 'd', long = "data", value_name = "FILE")]
    data: Vec<PathBuf>,

    /// Write output to FILE ('-' for stdout)
    #[arg(short = 'o', long, default_value = "-")]
    output: String,

    /// Template file ('-' for stdin)
    template: String,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mtc=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version go to stdout and are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mtc: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mut namespace = Dict::new();
    for path in &cli.data {
        data::load(&mut namespace, path)?;
    }
    for kv in &cli.defines {
        define::apply(&mut namespace, kv)?;
    }
    debug!(entries = namespace.len(), "namespace ready");

    let (name, source) = read_template(&cli.template)?;
    let color = io::stderr().is_terminal();

    let template = match Template::compile(&source) {
        Ok(template) => template,
        Err(e) => {
            eprint!("{}", report::compile_error(&name, &source, &e, color));
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut out: Box<dyn Write> = if cli.output == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        let file = File::create(&cli.output)
            .with_context(|| format!("Failed to create output file {}", cli.output))?;
        Box::new(BufWriter::new(file))
    };

    let rendered = template.render_to_writer(&namespace, &mut out);
    // Flush whatever was produced before a failure, as a streaming render would
    out.flush().context("Failed to write output")?;

    if let Err(e) = rendered {
        eprint!("{}", report::render_error(&name, &source, &e, color));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Read the template named on the command line, returning a display name
/// for diagnostics along with its bytes.
fn read_template(arg: &str) -> Result<(String, Vec<u8>)> {
    if arg == "-" {
        let mut source = Vec::new();
        io::stdin()
            .read_to_end(&mut source)
            .context("Failed to read template from stdin")?;
        return Ok(("<stdin>".to_string(), source));
    }
    let source =
        std::fs::read(arg).with_context(|| format!("Failed to read template {arg}"))?;
    Ok((arg.to_string(), source))
}
