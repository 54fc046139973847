use thiserror::Error;

use crate::{
    error::{ErrorMessage, HttpError},
    models::polaroidmodel::ImageSlot,
};
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload timeout")]
    Timeout,

    #[error("Upload failed with status: {0}")]
    Status(u16),

    #[error("Upload request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from {host}: {detail}")]
    InvalidResponse { host: &'static str, detail: String },
}

#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Polaroid API returned status: {0}")]
    Status(u16),

    #[error("Received empty image buffer from API")]
    EmptyBody,

    #[error("Refusing to call compositor with invalid image URL '{0}'")]
    InvalidUrl(String),

    #[error("Polaroid API request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum PolaroidError {
    #[error("Only POST requests are allowed")]
    InvalidMethod(String),

    #[error("Both img1 and img2 are required")]
    MissingImages,

    #[error("{slot} is not valid base64 image data: {reason}")]
    InvalidImage { slot: ImageSlot, reason: String },

    #[error("Failed to upload {slot}: {source}")]
    UploadFailed {
        slot: ImageSlot,
        #[source]
        source: UploadError,
    },

    #[error("{0}")]
    CompositionFailed(#[from] CompositorError),

    #[error("Request timeout - API took too long to respond")]
    CompositionTimeout,
}

impl PolaroidError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PolaroidError::InvalidMethod(_) => StatusCode::METHOD_NOT_ALLOWED,

            PolaroidError::MissingImages
            | PolaroidError::InvalidImage { .. } => StatusCode::BAD_REQUEST,

            PolaroidError::UploadFailed { .. }
            | PolaroidError::CompositionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,

            PolaroidError::CompositionTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<PolaroidError> for HttpError {
    fn from(error: PolaroidError) -> Self {
        match error {
            PolaroidError::InvalidMethod(_) => HttpError::method_not_allowed(error.to_string()),

            PolaroidError::MissingImages => HttpError::bad_request(ErrorMessage::MissingImages, error.to_string()),

            PolaroidError::InvalidImage { .. } => HttpError::bad_request(ErrorMessage::InvalidImage, error.to_string()),

            PolaroidError::CompositionTimeout => HttpError::gateway_timeout(error.to_string()),

            _ => HttpError::server_error(error.to_string()),
        }
    }
}
