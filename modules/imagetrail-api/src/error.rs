use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use vision_client::error::sanitize_message;
use vision_client::VisionError;

/// User-safe error payload. Every failed request carries exactly one of
/// these; there are no partial graphs.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_code: Option<i32>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: StructuredError,
}

impl ApiError {
    fn plain(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            body: StructuredError {
                code: code.to_string(),
                message: message.to_string(),
                service_status: None,
                service_code: None,
            },
        }
    }

    pub fn invalid_image_upload() -> Self {
        Self::plain(StatusCode::BAD_REQUEST, "invalid_image_upload", "File must be an image")
    }

    pub fn empty_upload() -> Self {
        Self::plain(StatusCode::BAD_REQUEST, "empty_upload", "Uploaded file is empty")
    }

    pub fn missing_vision_api_key() -> Self {
        Self::plain(
            StatusCode::INTERNAL_SERVER_ERROR,
            "missing_vision_api_key",
            "Vision API key is missing",
        )
    }

    pub fn from_vision(err: &VisionError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            body: StructuredError {
                code: err.fallback_reason(),
                message: sanitize_message(Some(err.message())),
                service_status: err.status().map(String::from),
                service_code: err.service_code(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_errors_are_bad_requests() {
        assert_eq!(ApiError::invalid_image_upload().status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::empty_upload().status, StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::missing_vision_api_key().status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn vision_errors_become_bad_gateway_with_service_fields() {
        let err = VisionError::Api {
            message: "Quota exceeded".to_string(),
            status: Some("RESOURCE_EXHAUSTED".to_string()),
            code: Some(429),
        };
        let api = ApiError::from_vision(&err);

        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.body.code, "vision_quota_exceeded");
        assert_eq!(api.body.service_status.as_deref(), Some("RESOURCE_EXHAUSTED"));
        assert_eq!(api.body.service_code, Some(429));
    }

    #[test]
    fn plain_errors_omit_service_fields_in_json() {
        let json = serde_json::to_value(&ApiError::empty_upload().body).unwrap();
        assert_eq!(json["code"], "empty_upload");
        assert!(json.get("service_status").is_none());
        assert!(json.get("service_code").is_none());
    }
}
