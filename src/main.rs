use anyhow::Result;
use clap::Parser;
use colored::*;
use pagelint::cli::Cli;
use pagelint::{load_args, run};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pagelint=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagelint=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(e: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
    std::process::exit(1);
}

fn main() -> Result<()> {
    // Config can turn on verbose logging, so it is merged before the subscriber exists
    let args = load_args(Cli::parse()).unwrap_or_else(|e| exit_with(e));
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        exit_with(e);
    }

    Ok(())
}
