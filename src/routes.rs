// routes.rs
use std::sync::Arc;

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue,
    },
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::{handler::upload::polaroid_handler, AppState};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .merge(polaroid_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    // Fixed CORS headers go on every response, errors and 404s included.
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,OPTIONS,POST"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{config::Config, service::test_helpers::*};

    fn router() -> Router {
        let host = Arc::new(MockImageHost::new(HostBehavior::Succeed));
        let compositor = Arc::new(MockCompositor::new(CompositorBehavior::Return(PNG_SIGNATURE.to_vec())));
        let pipeline = build_pipeline(host, compositor, test_settings());
        create_router(Arc::new(AppState::with_pipeline(Config::default(), pipeline)))
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_still_carries_cors_headers() {
        let response = router()
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let host = Arc::new(MockImageHost::new(HostBehavior::Succeed));
        let compositor = Arc::new(MockCompositor::new(CompositorBehavior::Return(PNG_SIGNATURE.to_vec())));
        let pipeline = build_pipeline(host.clone(), compositor, test_settings());
        let mut config = Config::default();
        config.body_limit_bytes = 16;
        let app = create_router(Arc::new(AppState::with_pipeline(config, pipeline)));

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"img1":"AAAAAAAA","img2":"BBBBBBBB"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid image");
        assert_eq!(body["message"], "Request body must not exceed 16 bytes");
        assert_eq!(host.calls(), 0);
    }
}
