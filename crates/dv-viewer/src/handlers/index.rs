//! Entity index endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;

use crate::handlers::{ViewQuery, flush_if_requested};
use crate::layout;
use crate::state::AppState;

/// Handle GET /<base>/.
pub(crate) async fn get_index(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    flush_if_requested(&state, &query);
    Html(layout::index(&state.manifest.state()))
}
