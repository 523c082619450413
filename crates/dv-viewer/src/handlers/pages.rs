//! Documentation page endpoint.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Html;

use crate::error::ViewerError;
use crate::handlers::{ViewQuery, flush_if_requested};
use crate::layout::{self, VersionWarning};
use crate::state::AppState;

/// Handle GET /<base>/{*path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ViewerError> {
    flush_if_requested(&state, &query);

    let mut found = state
        .manifest
        .get_page(&path)
        .ok_or_else(|| ViewerError::PageNotFound(path.clone()))?;

    // A page that cannot be read still gets its shell.
    let rendered = found
        .render(state.manifest.storage().as_ref())
        .unwrap_or_default();
    let warning = VersionWarning::for_match(&found);

    tracing::debug!(
        path = %path,
        entity = found.entity().key(),
        version = found.version(),
        "Serving page"
    );
    Ok(Html(layout::page(&found, &rendered, warning.as_ref())))
}
