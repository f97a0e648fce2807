//! `imprint serve` command implementation.

use std::path::PathBuf;

use clap::Args;

use imprint_config::{CliSettings, Config};
use imprint_server::{ServeOptions, run_server};

use crate::commands::build::run_build;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover imprint.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve the existing artifact set without rebuilding.
    #[arg(long)]
    no_build: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the build, or the server fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if self.no_build {
            output.info("Skipping build (--no-build)");
        } else {
            run_build(&config, &output)?;
        }

        output.info(&format!(
            "Serving {} on http://{}:{}",
            config.build_resolved.output_dir.display(),
            config.server.host,
            config.server.port
        ));

        let options = ServeOptions {
            host: config.server.host.clone(),
            port: config.server.port,
            site_dir: config.build_resolved.output_dir.clone(),
        };
        run_server(options).await?;

        Ok(())
    }
}
