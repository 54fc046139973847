use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

/// Error category labels sent to the browser in the `error` field.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ErrorMessage {
    MethodNotAllowed,
    MissingImages,
    InvalidImage,
    ProcessingFailed,
}

impl ErrorMessage {
    pub fn to_str(&self) -> &'static str {
        match self {
            ErrorMessage::MethodNotAllowed => "Method not allowed",
            ErrorMessage::MissingImages => "Missing images",
            ErrorMessage::InvalidImage => "Invalid image",
            ErrorMessage::ProcessingFailed => "Processing failed",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub error: ErrorMessage,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, error: ErrorMessage, message: impl Into<String>) -> Self {
        HttpError {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn bad_request(error: ErrorMessage, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, ErrorMessage::MethodNotAllowed, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, ErrorMessage::InvalidImage, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorMessage::ProcessingFailed, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, ErrorMessage::ProcessingFailed, message)
    }

    pub fn into_http_response(self) -> Response {
        let json_response = Json(ErrorResponse {
            success: false,
            error: self.error.to_string(),
            message: self.message,
            timestamp: Utc::now().to_rfc3339(),
        });

        (self.status, json_response).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HttpError: status: {}, error: {}, message: {}",
            self.status, self.error, self.message
        )
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
