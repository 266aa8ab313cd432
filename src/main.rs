mod app;
mod cli;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Log to stderr so command output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VERSECRAFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.completions {
        cli::generate_completions(shell);
        return Ok(());
    }

    let Some(command) = args.command else {
        cli::Args::command().print_help()?;
        return Ok(());
    };

    let app = app::App::new()?;
    app.run(command)?;

    Ok(())
}
