// service/image_host.rs
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{config::Config, models::polaroidmodel::ImageHostKind, service::error::UploadError};

/// Anything that can take raw image bytes and hand back a publicly
/// fetchable URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    fn name(&self) -> &'static str;

    async fn upload(&self, image: Vec<u8>) -> Result<String, UploadError>;
}

pub fn build_image_host(config: &Config, client: Client) -> Arc<dyn ImageHost> {
    match config.image_host {
        ImageHostKind::TmpFiles => Arc::new(TmpFilesHost::new(client, config.tmpfiles_upload_url.clone())),
        ImageHostKind::PostImages => Arc::new(PostImagesHost::new(client, config.postimages_upload_url.clone())),
    }
}

fn upload_file_name() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("polaroid-{}-{}.jpg", Utc::now().timestamp_millis(), &suffix[..9])
}

fn image_part(image: Vec<u8>) -> Result<Part, UploadError> {
    Ok(Part::bytes(image)
        .file_name(upload_file_name())
        .mime_str("image/jpeg")?)
}

/// Rewrites a viewer-page URL into its direct-download form by replacing the
/// first occurrence of `viewer` with `direct`. URLs already in direct form
/// are returned unchanged.
pub fn normalize_viewer_url(url: &str, viewer: &str, direct: &str) -> String {
    if url.contains(direct) {
        return url.to_string();
    }

    if !url.contains(viewer) {
        tracing::warn!(
            "Hosted URL '{}' does not contain '{}'; passing it through unchanged",
            url,
            viewer
        );
        return url.to_string();
    }

    url.replacen(viewer, direct, 1)
}

// tmpfiles.org

#[derive(Debug, Deserialize)]
struct TmpFilesResponse {
    status: Option<String>,
    data: Option<TmpFilesData>,
}

#[derive(Debug, Deserialize)]
struct TmpFilesData {
    url: Option<String>,
}

pub struct TmpFilesHost {
    client: Client,
    upload_url: String,
}

impl TmpFilesHost {
    pub const NAME: &'static str = "tmpfiles.org";

    pub fn new(client: Client, upload_url: String) -> Self {
        Self { client, upload_url }
    }

    /// Extracts the viewer URL from a `{status:"success", data:{url}}` body.
    pub fn parse_response(body: &str) -> Result<String, UploadError> {
        let parsed: TmpFilesResponse = serde_json::from_str(body).map_err(|e| UploadError::InvalidResponse {
            host: Self::NAME,
            detail: e.to_string(),
        })?;

        match (parsed.status.as_deref(), parsed.data.and_then(|d| d.url)) {
            (Some("success"), Some(url)) if !url.trim().is_empty() => Ok(url),
            _ => Err(UploadError::InvalidResponse {
                host: Self::NAME,
                detail: format!("unexpected body: {}", body),
            }),
        }
    }
}

#[async_trait]
impl ImageHost for TmpFilesHost {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn upload(&self, image: Vec<u8>) -> Result<String, UploadError> {
        tracing::debug!("Image buffer size: {} bytes", image.len());

        let form = Form::new().part("file", image_part(image)?);

        let response = self.client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("{} upload failed: {}", Self::NAME, status);
            return Err(UploadError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        tracing::debug!("{} response: {}", Self::NAME, body);

        let viewer_url = Self::parse_response(&body)?;
        let direct_url = normalize_viewer_url(&viewer_url, "tmpfiles.org/", "tmpfiles.org/dl/");
        tracing::info!("Direct download URL: {}", direct_url);

        Ok(direct_url)
    }
}

// postimages.org

fn postimg_link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| {
        Regex::new(r#"https?://postimg\.cc/[A-Za-z0-9_\-./]+"#).expect("postimg link regex is valid")
    })
}

pub struct PostImagesHost {
    client: Client,
    upload_url: String,
}

impl PostImagesHost {
    pub const NAME: &'static str = "postimages.org";

    pub fn new(client: Client, upload_url: String) -> Self {
        Self { client, upload_url }
    }

    /// Accepts a JSON body carrying `url`, `src` or `image.url`, or failing
    /// that, any body that embeds a `postimg.cc` link.
    pub fn parse_response(body: &str) -> Result<String, UploadError> {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            let candidates = [
                json.get("url"),
                json.get("src"),
                json.get("image").and_then(|image| image.get("url")),
            ];

            let found = candidates
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .find(|url| !url.trim().is_empty());

            if let Some(url) = found {
                return Ok(url.to_string());
            }
        }

        postimg_link_regex()
            .find(body)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| UploadError::InvalidResponse {
                host: Self::NAME,
                detail: "no image URL in response".to_string(),
            })
    }
}

#[async_trait]
impl ImageHost for PostImagesHost {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn upload(&self, image: Vec<u8>) -> Result<String, UploadError> {
        tracing::debug!("Image buffer size: {} bytes", image.len());

        let form = Form::new()
            .part("file", image_part(image)?)
            .text("expire", "0");

        let response = self.client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("{} upload failed: {}", Self::NAME, status);
            return Err(UploadError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let viewer_url = Self::parse_response(&body)?;
        let direct_url = normalize_viewer_url(&viewer_url, "postimg.cc/", "i.postimg.cc/");
        tracing::info!("Direct download URL: {}", direct_url);

        Ok(direct_url)
    }
}
