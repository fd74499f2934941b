//! The `{success, message?, data}` envelope every endpoint answers with.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {self}");
        }
        (status, ApiResponse::failure(self.to_string())).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderRequestError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::InvalidInput("domain is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("No SERP results found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Provider(ProviderRequestError::new("moz", "fetch", "HTTP 500")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generic_and_config_errors_are_500() {
        // Arrange
        let errors = [
            Error::Generic("Text generation returned no keywords".into()),
            Error::Config("MOZ_TOKEN environment variable not set".into()),
        ];

        // Act
        let codes: Vec<StatusCode> = errors.iter().map(Error::status_code).collect();

        // Assert
        assert_eq!(codes, vec![StatusCode::INTERNAL_SERVER_ERROR; 2]);
        assert_eq!(
            errors[1].to_string(),
            "Configuration error: MOZ_TOKEN environment variable not set"
        );
    }

    #[test]
    fn test_failure_envelope_shape() {
        let value = serde_json::to_value(ApiResponse::failure("nope".to_string())).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "message": "nope", "data": null})
        );
    }

    #[test]
    fn test_success_envelope_omits_message() {
        let value = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "data": 3}));
    }
}
