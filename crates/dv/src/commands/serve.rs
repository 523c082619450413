//! `dv serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_viewer::{ServerConfig, run_server};

use crate::commands::fs_manifest;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// URL prefix to serve documentation under (overrides config).
    #[arg(long)]
    link_base: Option<String>,

    /// Enable verbose output (manifest build and request logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            link_base: self.link_base,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if config.entities_resolved.is_empty() {
            output.warning("No documentation registered (add [[entities]] to dv.toml)");
        }
        output.info(&format!(
            "Starting server on http://{}:{}/{}/",
            config.server.host,
            config.server.port,
            config.docs.link_base.trim_matches('/')
        ));
        for entity in &config.entities_resolved {
            output.detail(&format!("  {} -> {}", entity.key, entity.path.display()));
        }

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
        };
        run_server(server_config, Arc::new(fs_manifest(&config))).await?;

        Ok(())
    }
}
