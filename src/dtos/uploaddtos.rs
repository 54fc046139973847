use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UploadRequestDto {
    #[validate(
        required(message = "img1 is required"),
        length(min = 1, message = "img1 is required")
    )]
    pub img1: Option<String>,

    #[validate(
        required(message = "img2 is required"),
        length(min = 1, message = "img2 is required")
    )]
    pub img2: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolaroidMetadataDto {
    pub img1_url: String,
    pub img2_url: String,
    pub size: usize,
    pub mime_type: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolaroidResponseDto {
    pub success: bool,
    pub image: String,
    pub metadata: PolaroidMetadataDto,
}
