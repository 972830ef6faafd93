use thiserror::Error;

pub type Result<T> = std::result::Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    /// Network-level failure reaching the Vision API (DNS, connect, timeout).
    #[error("Unable to reach the Vision API: {0}")]
    Network(String),

    /// Error reported by the Vision API itself, either as an HTTP error body
    /// or as a per-response `error` object.
    #[error("Vision API error: {message}")]
    Api {
        message: String,
        status: Option<String>,
        code: Option<i32>,
    },
}

impl VisionError {
    pub fn api(message: Option<&str>) -> Self {
        VisionError::Api {
            message: sanitize_message(message),
            status: None,
            code: None,
        }
    }

    /// The gRPC-style status name reported by the service, if any.
    /// Transport failures are treated as `UNAVAILABLE`.
    pub fn status(&self) -> Option<&str> {
        match self {
            VisionError::Network(_) => Some("UNAVAILABLE"),
            VisionError::Api { status, .. } => status.as_deref(),
        }
    }

    pub fn service_code(&self) -> Option<i32> {
        match self {
            VisionError::Network(_) => None,
            VisionError::Api { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            VisionError::Network(message) => message,
            VisionError::Api { message, .. } => message,
        }
    }

    /// Map this error to a stable, user-safe reason code.
    ///
    /// Message substrings take precedence over the status name because the
    /// API reports billing/enablement problems under generic statuses.
    pub fn fallback_reason(&self) -> String {
        let status = self.status().unwrap_or_default().to_uppercase();
        let message = self.message().to_lowercase();

        if message.contains("bad image data") {
            return "vision_bad_image_data".to_string();
        }
        if message.contains("billing") {
            return "vision_billing_required".to_string();
        }
        if message.contains("disabled") || message.contains("not been used") {
            return "vision_api_disabled".to_string();
        }

        match status.as_str() {
            "PERMISSION_DENIED" => "vision_permission_denied".to_string(),
            "INVALID_ARGUMENT" => "vision_invalid_argument".to_string(),
            "UNAUTHENTICATED" => "vision_unauthenticated".to_string(),
            "RESOURCE_EXHAUSTED" => "vision_quota_exceeded".to_string(),
            "UNAVAILABLE" => "vision_unavailable".to_string(),
            "" => "vision_api_error".to_string(),
            other => format!("vision_{}", other.to_lowercase()),
        }
    }
}

impl From<reqwest::Error> for VisionError {
    fn from(err: reqwest::Error) -> Self {
        VisionError::Network(err.to_string())
    }
}

/// Collapse whitespace and cap length so upstream error text can be surfaced
/// to callers verbatim.
pub fn sanitize_message(message: Option<&str>) -> String {
    let raw = match message {
        Some(m) if !m.trim().is_empty() => m,
        _ => "Vision API error",
    };
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.len() > 260 {
        let cut: String = text.chars().take(257).collect();
        format!("{cut}...")
    } else {
        text
    }
}
