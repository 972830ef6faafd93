pub mod error;
pub mod types;

pub use error::{Result, VisionError};
pub use types::{
    AnnotateImageResponse, AnnotateResponse, BestGuessLabel, WebDetection, WebEntity, WebImage,
    WebPage,
};

use std::time::Duration;

use base64::Engine;

use error::sanitize_message;
use types::{AnnotateImageRequest, AnnotateRequest, Feature, ImageContent, RpcStatus};

const BASE_URL: &str = "https://vision.googleapis.com/v1";

/// Maximum number of results requested per web-detection annotation.
const MAX_RESULTS: u32 = 20;

/// Outbound request timeout. A call that exceeds this is surfaced the same
/// way as an immediate transport failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub struct VisionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl VisionClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Run WEB_DETECTION on an image and return its web-detection annotations.
    ///
    /// Exactly one outbound call is made; there is no retry policy here.
    pub async fn web_detection(&self, image_bytes: &[u8]) -> Result<WebDetection> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image_bytes),
                },
                features: vec![Feature {
                    feature_type: "WEB_DETECTION".to_string(),
                    max_results: MAX_RESULTS,
                }],
            }],
        };

        let endpoint = format!("{}/images:annotate", self.base_url);
        tracing::debug!(bytes = image_bytes.len(), "Sending web-detection request");

        let resp = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let raw = resp.bytes().await?;

        let detection = parse_annotate_response(status, &raw)?;
        tracing::info!(
            pages = detection.pages_with_matching_images.len(),
            full = detection.full_matching_images.len(),
            partial = detection.partial_matching_images.len(),
            similar = detection.visually_similar_images.len(),
            "Web detection completed"
        );

        Ok(detection)
    }
}

/// Interpret an `images:annotate` HTTP response body.
///
/// Handles the failure shapes the API is known to produce: a non-JSON body,
/// an HTTP error with a `{"error": {...}}` envelope, an empty `responses`
/// array, and a per-response `error` object.
pub fn parse_annotate_response(http_status: u16, body: &[u8]) -> Result<WebDetection> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| VisionError::api(Some("Vision API returned a non-JSON response")))?;

    if http_status >= 400 {
        let status: Option<RpcStatus> = payload
            .get("error")
            .and_then(|e| serde_json::from_value(e.clone()).ok());
        let status = status.unwrap_or(RpcStatus {
            code: None,
            message: None,
            status: None,
        });
        return Err(VisionError::Api {
            message: sanitize_message(status.message.as_deref()),
            status: status.status,
            code: status.code,
        });
    }

    let annotate: AnnotateResponse = serde_json::from_value(payload)
        .map_err(|_| VisionError::api(Some("Vision API returned an unexpected response shape")))?;

    let mut responses = annotate.responses;
    if responses.is_empty() {
        return Err(VisionError::api(Some("Vision API returned no responses")));
    }
    let first = responses.remove(0);

    if let Some(err) = first.error {
        return Err(VisionError::Api {
            message: sanitize_message(err.message.as_deref()),
            status: err.status,
            code: err.code,
        });
    }

    Ok(first.web_detection.unwrap_or_default())
}
