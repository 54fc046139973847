// service/pipeline.rs
//
// validate -> decode -> upload x2 -> compose -> encode
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use validator::Validate;

use crate::{
    config::Config,
    dtos::uploaddtos::{PolaroidMetadataDto, PolaroidResponseDto, UploadRequestDto},
    models::polaroidmodel::{ImageSlot, ResultMime},
    service::{
        compositor::Compositor,
        error::{PolaroidError, UploadError},
        image_host::ImageHost,
    },
    utils::data_url::{decode_image, encode_data_url},
};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub upload_timeout: Duration,
    pub compose_timeout: Duration,
    pub parallel_uploads: bool,
    pub result_mime: ResultMime,
    pub max_image_bytes: usize,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            upload_timeout: config.upload_timeout,
            compose_timeout: config.compose_timeout,
            parallel_uploads: config.parallel_uploads,
            result_mime: config.result_mime,
            max_image_bytes: config.max_image_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolaroidResult {
    pub image: String,
    pub img1_url: String,
    pub img2_url: String,
    pub size: usize,
    pub mime: ResultMime,
}

impl PolaroidResult {
    pub fn into_response_dto(self) -> PolaroidResponseDto {
        PolaroidResponseDto {
            success: true,
            image: self.image,
            metadata: PolaroidMetadataDto {
                img1_url: self.img1_url,
                img2_url: self.img2_url,
                size: self.size,
                mime_type: self.mime.to_str().to_string(),
                timestamp: Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Runs one request from raw base64 inputs to a composited data URL.
///
/// Holds no per-request state; a single instance is shared by every
/// request the server handles.
#[derive(Clone)]
pub struct PolaroidPipeline {
    image_host: Arc<dyn ImageHost>,
    compositor: Arc<dyn Compositor>,
    settings: PipelineSettings,
}

impl PolaroidPipeline {
    pub fn new(
        image_host: Arc<dyn ImageHost>,
        compositor: Arc<dyn Compositor>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            image_host,
            compositor,
            settings,
        }
    }

    pub async fn run(&self, request: UploadRequestDto) -> Result<PolaroidResult, PolaroidError> {
        request.validate().map_err(|_| PolaroidError::MissingImages)?;

        let (img1, img2) = match (request.img1, request.img2) {
            (Some(img1), Some(img2)) => (img1, img2),
            _ => return Err(PolaroidError::MissingImages),
        };

        let bytes1 = self.decode(ImageSlot::First, &img1)?;
        let bytes2 = self.decode(ImageSlot::Second, &img2)?;

        tracing::info!("Starting image upload process via {}...", self.image_host.name());

        // The compositor is only reached once both URLs are in hand.
        let (url1, url2) = if self.settings.parallel_uploads {
            tokio::try_join!(
                self.upload(ImageSlot::First, bytes1),
                self.upload(ImageSlot::Second, bytes2)
            )?
        } else {
            let url1 = self.upload(ImageSlot::First, bytes1).await?;
            let url2 = self.upload(ImageSlot::Second, bytes2).await?;
            (url1, url2)
        };

        let composite = self.compose(&url1, &url2).await?;
        let size = composite.len();
        let image = encode_data_url(self.settings.result_mime, &composite);

        tracing::info!("Successfully generated polaroid ({} bytes)", size);

        Ok(PolaroidResult {
            image,
            img1_url: url1,
            img2_url: url2,
            size,
            mime: self.settings.result_mime,
        })
    }

    fn decode(&self, slot: ImageSlot, input: &str) -> Result<Vec<u8>, PolaroidError> {
        let bytes = decode_image(slot, input)?;

        if bytes.len() > self.settings.max_image_bytes {
            return Err(PolaroidError::InvalidImage {
                slot,
                reason: format!(
                    "decoded size {} bytes exceeds the {} byte limit",
                    bytes.len(),
                    self.settings.max_image_bytes
                ),
            });
        }

        Ok(bytes)
    }

    async fn upload(&self, slot: ImageSlot, bytes: Vec<u8>) -> Result<String, PolaroidError> {
        tracing::info!("Uploading {} to {}...", slot, self.image_host.name());

        match timeout(self.settings.upload_timeout, self.image_host.upload(bytes)).await {
            Ok(Ok(url)) => {
                tracing::info!("{} uploaded: {}", slot, url);
                Ok(url)
            }
            Ok(Err(source)) => {
                tracing::error!("{} upload error: {}", self.image_host.name(), source);
                Err(PolaroidError::UploadFailed { slot, source })
            }
            Err(_) => {
                tracing::error!(
                    "{} upload timeout after {:?}",
                    self.image_host.name(),
                    self.settings.upload_timeout
                );
                Err(PolaroidError::UploadFailed {
                    slot,
                    source: UploadError::Timeout,
                })
            }
        }
    }

    async fn compose(&self, url1: &str, url2: &str) -> Result<Vec<u8>, PolaroidError> {
        tracing::info!("Generating polaroid...");

        match timeout(self.settings.compose_timeout, self.compositor.compose(url1, url2)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => {
                tracing::error!("Polaroid API error: {}", e);
                Err(PolaroidError::CompositionFailed(e))
            }
            Err(_) => {
                tracing::error!("Polaroid API timeout after {:?}", self.settings.compose_timeout);
                Err(PolaroidError::CompositionTimeout)
            }
        }
    }
}
