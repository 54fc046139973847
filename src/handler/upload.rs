// handler/upload.rs
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Extension, Json, Router,
};

use crate::{
    dtos::uploaddtos::UploadRequestDto,
    error::{ErrorMessage, HttpError},
    service::error::PolaroidError,
    AppState,
};

pub fn polaroid_handler() -> Router {
    Router::new()
        .route("/upload", any(upload_polaroid))
}

/// `OPTIONS` answers the CORS preflight, `POST` runs the pipeline, anything
/// else is rejected. The body is only buffered on the `POST` path, so the
/// size limit never applies to a preflight or a rejected method.
pub async fn upload_polaroid(
    Extension(app_state): Extension<Arc<AppState>>,
    method: Method,
    body: Body,
) -> Result<Response, HttpError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    if method != Method::POST {
        return Err(PolaroidError::InvalidMethod(method.to_string()).into());
    }

    let limit = app_state.env.body_limit_bytes;
    let body = to_bytes(body, limit).await.map_err(|e| {
        tracing::warn!("Rejecting upload body over {} bytes: {}", limit, e);
        HttpError::payload_too_large(format!("Request body must not exceed {} bytes", limit))
    })?;

    let request: UploadRequestDto = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Rejecting unparsable upload body: {}", e);
        HttpError::bad_request(
            ErrorMessage::MissingImages,
            format!("Request body must be a JSON object with img1 and img2: {}", e),
        )
    })?;

    match app_state.pipeline.run(request).await {
        Ok(result) => Ok(Json(result.into_response_dto()).into_response()),
        Err(e) => {
            tracing::error!("Error in handler ({}): {}", e.status_code(), e);
            Err(e.into())
        }
    }
}
