// service/compositor.rs
use async_trait::async_trait;
use reqwest::{header, Client};

use crate::service::error::CompositorError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[async_trait]
pub trait Compositor: Send + Sync {
    /// Merges the images behind two public URLs into one polaroid and
    /// returns the raw image bytes.
    async fn compose(&self, url1: &str, url2: &str) -> Result<Vec<u8>, CompositorError>;
}

pub struct PolaroidApiClient {
    client: Client,
    endpoint: String,
}

impl PolaroidApiClient {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn request_url(&self, url1: &str, url2: &str) -> String {
        format!(
            "{}?img1={}&img2={}",
            self.endpoint,
            urlencoding::encode(url1),
            urlencoding::encode(url2)
        )
    }
}

fn ensure_public_url(url: &str) -> Result<(), CompositorError> {
    let trimmed = url.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .map(|(_, rest)| !rest.is_empty() && !rest.starts_with('/'))
        .unwrap_or(false);

    if trimmed.is_empty() || !has_scheme || !has_host {
        return Err(CompositorError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

#[async_trait]
impl Compositor for PolaroidApiClient {
    async fn compose(&self, url1: &str, url2: &str) -> Result<Vec<u8>, CompositorError> {
        ensure_public_url(url1)?;
        ensure_public_url(url2)?;

        let request_url = self.request_url(url1, url2);
        tracing::info!("Polaroid API URL: {}", request_url);

        let response = self.client
            .get(&request_url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompositorError::Status(status.as_u16()));
        }

        // Logged only; the declared type does not decide success.
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        tracing::debug!("Response content-type: {}", content_type);

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(CompositorError::EmptyBody);
        }

        tracing::info!("Image buffer size: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
