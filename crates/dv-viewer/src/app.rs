//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use dv_manifest::Manifest;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Route prefix for a link base: `dev/docs` becomes `/dev/docs`, an empty
/// base serves from the root.
fn route_prefix(link_base: &str) -> String {
    let base = link_base.trim_matches('/');
    if base.is_empty() {
        String::new()
    } else {
        format!("/{base}")
    }
}

/// Create the viewer router, serving under the manifest's link base.
pub fn create_router(manifest: Arc<Manifest>) -> Router {
    let prefix = route_prefix(&manifest.config().link_base);
    let state = Arc::new(AppState { manifest });

    let mut router = Router::new()
        .route(&format!("{prefix}/"), get(handlers::index::get_index))
        .route(
            &format!("{prefix}/_manifest.json"),
            get(handlers::manifest::get_manifest),
        )
        .route(&format!("{prefix}/{{*path}}"), get(handlers::pages::get_page));
    if !prefix.is_empty() {
        router = router.route(&prefix, get(handlers::index::get_index));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::csp_layer())
                .layer(middleware::content_type_options_layer()),
        )
        .with_state(state)
}
