use serde::{Deserialize, Serialize};

// --- Request wire types ---

#[derive(Debug, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct ImageContent {
    /// Base64-encoded image bytes.
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub max_results: u32,
}

// --- Response wire types ---

#[derive(Debug, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub web_detection: Option<WebDetection>,
    pub error: Option<RpcStatus>,
}

/// google.rpc.Status as embedded in error bodies and per-response errors.
#[derive(Debug, Deserialize)]
pub struct RpcStatus {
    pub code: Option<i32>,
    pub message: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebDetection {
    #[serde(default)]
    pub pages_with_matching_images: Vec<WebPage>,
    #[serde(default)]
    pub full_matching_images: Vec<WebImage>,
    #[serde(default)]
    pub partial_matching_images: Vec<WebImage>,
    #[serde(default)]
    pub visually_similar_images: Vec<WebImage>,
    #[serde(default)]
    pub best_guess_labels: Vec<BestGuessLabel>,
    #[serde(default)]
    pub web_entities: Vec<WebEntity>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    pub url: Option<String>,
    pub page_title: Option<String>,
    #[serde(default)]
    pub full_matching_images: Vec<WebImage>,
    #[serde(default)]
    pub partial_matching_images: Vec<WebImage>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct WebImage {
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BestGuessLabel {
    pub label: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebEntity {
    pub entity_id: Option<String>,
    pub score: Option<f32>,
    pub description: Option<String>,
}
