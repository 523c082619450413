//! HTTP request handlers.

pub(crate) mod index;
pub(crate) mod manifest;
pub(crate) mod pages;

use serde::Deserialize;

use crate::state::AppState;

/// Query parameters accepted by every route.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewQuery {
    /// Rebuild the manifest before answering (`?flush=1`).
    pub(crate) flush: Option<String>,
}

impl ViewQuery {
    fn wants_flush(&self) -> bool {
        self.flush.as_deref().is_some_and(|v| v != "0")
    }
}

/// Rebuild the manifest when the request asks for it.
pub(crate) fn flush_if_requested(state: &AppState, query: &ViewQuery) {
    if query.wants_flush() {
        tracing::info!("Manifest flush requested");
        state.manifest.force_rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_flush() {
        let query = |flush: Option<&str>| ViewQuery {
            flush: flush.map(str::to_owned),
        };

        assert!(query(Some("1")).wants_flush());
        assert!(query(Some("")).wants_flush());
        assert!(!query(Some("0")).wants_flush());
        assert!(!query(None).wants_flush());
    }
}
