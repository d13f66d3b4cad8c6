use anyhow::Result;
use clap::Parser;
use lansweep::cli::{install_interrupt_handler, Cli};
use lansweep::error::CliError;
use lansweep::output;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();

    let filter = match cli.options.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let prepared = match cli.prepare(started).await {
        Ok(prepared) => prepared,
        Err(err) => fail(err),
    };

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone());

    if let Err(err) = prepared.execute(&cancel).await {
        fail(err);
    }

    Ok(())
}

fn fail(err: CliError) -> ! {
    output::print_error(&err.to_string());
    std::process::exit(err.exit_code());
}
