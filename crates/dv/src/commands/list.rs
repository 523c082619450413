//! `dv list` command implementation.

use std::path::PathBuf;

use clap::Args;
use dv_config::Config;

use crate::commands::fs_manifest;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print every page link.
    #[arg(long)]
    pages: bool,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let state = fs_manifest(&config).state();

        if state.entities().is_empty() {
            output.warning("No documentation registered");
            return Ok(());
        }

        for entity in state.entities() {
            output.highlight(&format!("{} ({})", entity.title(), entity.key()));
            for language in entity.languages() {
                for root in language.versions() {
                    let marker = if entity.is_stable(root.label()) {
                        " [stable]"
                    } else {
                        ""
                    };
                    output.info(&format!(
                        "  {}/{}{marker}  {} page(s)  {}",
                        language.language(),
                        root.label(),
                        root.pages().len(),
                        language.link(root.label())
                    ));
                    if self.pages {
                        for page in root.pages() {
                            output.detail(&format!(
                                "    {}  {}",
                                page.link(language),
                                page.path().display()
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
