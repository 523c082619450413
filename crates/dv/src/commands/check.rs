//! `dv check` command implementation.

use std::path::PathBuf;

use clap::Args;
use dv_config::Config;
use dv_manifest::ManifestState;

use crate::commands::fs_manifest;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load or the scan reports
    /// any warning.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let state = fs_manifest(&config).state();
        report(&state, &output)
    }
}

/// Print scan results; fail when there are warnings.
fn report(state: &ManifestState, output: &Output) -> Result<(), CliError> {
    for warning in state.warnings() {
        output.warning(&format!("warning: {warning}"));
    }

    let warnings = state.warnings().len();
    if warnings > 0 {
        return Err(CliError::Warnings(warnings));
    }

    output.success(&format!(
        "{} entities, {} pages, no warnings",
        state.entities().len(),
        state.page_count()
    ));
    Ok(())
}
