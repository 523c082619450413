//! Application state.

use std::sync::Arc;

use dv_manifest::Manifest;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Documentation index; rebuilt in place on `?flush`.
    pub(crate) manifest: Arc<Manifest>,
}
