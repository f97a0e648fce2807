//! imprint CLI - document-to-site compiler.
//!
//! Provides commands for:
//! - `build`: Compile the document store into a static artifact set
//! - `serve`: Build (unless `--no-build`) and serve the artifact set locally

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ServeArgs};
use output::Output;

/// Environment variable controlling log verbosity.
const LOG_ENV: &str = "IMPRINT_LOG";

/// imprint - document-to-site compiler.
#[derive(Parser)]
#[command(name = "imprint", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the document store into a static artifact set.
    Build(BuildArgs),
    /// Serve the artifact set locally, building it first unless --no-build.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // IMPRINT_LOG selects the tracing filter, defaulting to warnings only.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
