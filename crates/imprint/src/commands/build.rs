//! `imprint build` command implementation.

use std::path::PathBuf;

use clap::Args;

use imprint_config::{CliSettings, Config};
use imprint_emitter::{EmitOptions, ShellOptions, emit};
use imprint_search::SearchIndex;
use imprint_site::{CompileOptions, ExternalLink, SiteInfo, compile};
use imprint_storage::FsStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover imprint.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document source directory (overrides config).
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Artifact output directory (overrides config).
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source,
            output_dir: self.out,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        run_build(&config, &output)
    }
}

/// Run the full pipeline: compile the store, build the search index,
/// emit the artifact set. Shared with `imprint serve`.
pub(crate) fn run_build(config: &Config, output: &Output) -> Result<(), CliError> {
    if let Some(path) = &config.config_path {
        tracing::debug!(path = %path.display(), "Configuration loaded");
    }

    let source_dir = &config.build_resolved.source_dir;
    if !source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "source directory `{}` does not exist",
            source_dir.display()
        )));
    }

    output.info(&format!("Source: {}", source_dir.display()));
    output.info(&format!(
        "Output: {}",
        config.build_resolved.output_dir.display()
    ));

    let store = FsStore::new(source_dir.clone());
    let site = compile(&store, &compile_options(config))?;

    // Hidden pages keep their payloads but stay out of the search index.
    let pages = site
        .pages
        .iter()
        .filter(|page| !page.hidden)
        .map(|page| (page.route.as_str(), page.sections.as_slice()));
    let index = SearchIndex::build(&site.manifest.generation, pages);

    let emit_options = EmitOptions {
        output_dir: config.build_resolved.output_dir.clone(),
        shell: ShellOptions {
            logo: config.theme.logo.clone(),
            accent_color: config.theme.accent_color.clone(),
            analytics_id: config.analytics.as_ref().map(|a| a.id.clone()),
        },
    };
    let report = emit(&site, &index, &store, &emit_options)?;

    output.success(&format!(
        "Built {} pages, {} routes, {} search terms, generation {}",
        site.pages.len(),
        site.manifest.routes.len(),
        index.len(),
        site.manifest.generation
    ));

    let warnings: Vec<&String> = site.warnings.iter().chain(&report.warnings).collect();
    if !warnings.is_empty() {
        output.warning(&format!("{} warning(s):", warnings.len()));
        for warning in warnings {
            output.warning(&format!("  {warning}"));
        }
    }

    Ok(())
}

/// Map the loaded configuration onto compile options.
fn compile_options(config: &Config) -> CompileOptions {
    CompileOptions {
        site: SiteInfo {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            links: config
                .links
                .iter()
                .map(|link| ExternalLink {
                    label: link.label.clone(),
                    url: link.url.clone(),
                })
                .collect(),
        },
        extensions: config.pipeline.extensions.clone(),
    }
}
