//! weave - compile DOM templates against JSON data.

use camino::Utf8Path;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use weave_compiler::compile_with_options;
use weave_expr::Data;

mod cli;
mod config;
mod output;

use cli::Args;
use config::Config;
use output::ExpressionDiagnostic;

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up miette for nice error output
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(&args.template_dir(), &args)?;
    if let Some(path) = &config.path {
        tracing::info!(path = %path, "using configuration");
    }

    let template = std::fs::read_to_string(&args.template)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", args.template))?;

    let data = match &args.data {
        Some(path) => load_data(path)?,
        None => Data::new(),
    };

    let compiled = compile_with_options(template, data, &config.options)
        .map_err(ExpressionDiagnostic::new)
        .wrap_err_with(|| format!("Failed to compile {}", args.template))?;

    let html = output::render(&compiled.view, args.pretty);
    output::write_output(&html, args.output.as_deref())
}

fn load_data(path: &Utf8Path) -> Result<Data> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse {}", path))?;

    if !value.is_object() {
        miette::bail!("Data in {} must be a JSON object", path);
    }
    Ok(Data::from(value))
}
