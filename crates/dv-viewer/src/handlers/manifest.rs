//! Manifest summary endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use dv_manifest::ManifestState;
use serde::Serialize;

use crate::handlers::{ViewQuery, flush_if_requested};
use crate::state::AppState;

/// Response for GET /<base>/_manifest.json.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ManifestSummary {
    link_base: String,
    entities: Vec<EntitySummary>,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntitySummary {
    key: String,
    title: String,
    stable_version: String,
    versions: Vec<String>,
    languages: Vec<LanguageSummary>,
}

#[derive(Debug, Serialize)]
struct LanguageSummary {
    language: String,
    link: String,
    versions: Vec<VersionSummary>,
}

#[derive(Debug, Serialize)]
struct VersionSummary {
    version: String,
    link: String,
    pages: usize,
}

impl From<&ManifestState> for ManifestSummary {
    fn from(state: &ManifestState) -> Self {
        let entities = state
            .entities()
            .iter()
            .map(|entity| EntitySummary {
                key: entity.key().to_owned(),
                title: entity.title().to_owned(),
                stable_version: entity.stable_version().to_owned(),
                versions: entity.versions().to_vec(),
                languages: entity
                    .languages()
                    .iter()
                    .map(|language| LanguageSummary {
                        language: language.language().to_owned(),
                        link: language.link(language.default_version()),
                        versions: language
                            .versions()
                            .iter()
                            .map(|root| VersionSummary {
                                version: root.label().to_owned(),
                                link: language.link(root.label()),
                                pages: root.pages().len(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            link_base: state.link_base().to_owned(),
            entities,
            warnings: state.warnings().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Handle GET /<base>/_manifest.json.
pub(crate) async fn get_manifest(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<ManifestSummary> {
    flush_if_requested(&state, &query);
    Json(ManifestSummary::from(state.manifest.state().as_ref()))
}
