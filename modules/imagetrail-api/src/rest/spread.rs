use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use imagetrail_graph::{build_graph, GraphOptions, ProvenanceGraph};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SpreadParams {
    pub max_nodes: Option<usize>,
    pub strict_filter: Option<bool>,
    pub min_evidence_score: Option<i64>,
    pub max_per_domain: Option<usize>,
}

impl SpreadParams {
    /// Missing parameters take the engine defaults; out-of-range values are
    /// clamped rather than rejected.
    pub fn to_options(&self) -> GraphOptions {
        let defaults = GraphOptions::default();
        GraphOptions {
            max_nodes: self.max_nodes.unwrap_or(defaults.max_nodes),
            strict_filter: self.strict_filter.unwrap_or(defaults.strict_filter),
            min_evidence_score: self.min_evidence_score.unwrap_or(defaults.min_evidence_score),
            max_per_domain: self.max_per_domain.unwrap_or(defaults.max_per_domain),
        }
        .clamped()
    }
}

/// Build a provenance graph for an uploaded image.
///
/// One outbound Vision call per request; any Vision failure aborts the whole
/// request with a structured error.
pub async fn spread_from_image(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpreadParams>,
    mut multipart: Multipart,
) -> Result<Json<ProvenanceGraph>, ApiError> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::invalid_image_upload())?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::invalid_image_upload())?;
            upload = Some((content_type, data.to_vec()));
            break;
        }
    }

    let (content_type, image_bytes) = upload.ok_or_else(ApiError::invalid_image_upload)?;
    if !content_type.as_deref().unwrap_or("").starts_with("image/") {
        return Err(ApiError::invalid_image_upload());
    }
    if image_bytes.is_empty() {
        return Err(ApiError::empty_upload());
    }

    let vision = state.vision.as_ref().ok_or_else(ApiError::missing_vision_api_key)?;

    let opts = params.to_options();
    info!(
        bytes = image_bytes.len(),
        max_nodes = opts.max_nodes,
        strict_filter = opts.strict_filter,
        "Spread request received"
    );

    let detection = vision.web_detection(&image_bytes).await.map_err(|e| {
        warn!(reason = %e.fallback_reason(), "Vision web detection failed");
        ApiError::from_vision(&e)
    })?;

    let graph = build_graph(&detection, &opts);
    info!(
        nodes = graph.nodes.len(),
        source_found = graph.summary.source_url_found,
        "Spread graph built"
    );

    Ok(Json(graph))
}
