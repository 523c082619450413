//! CLI error types.

use dv_config::ConfigError;
use dv_viewer::ViewerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Server(#[from] ViewerError),

    #[error("{0} scan warning(s) found")]
    Warnings(usize),
}
