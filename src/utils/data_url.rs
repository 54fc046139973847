// Helpers for `data:<mime>;base64,<payload>` strings
use std::sync::OnceLock;

use base64::{
    alphabet,
    engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use regex::Regex;

use crate::{
    models::polaroidmodel::{ImageSlot, ResultMime},
    service::error::PolaroidError,
};

fn prefix_regex() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^data:[A-Za-z0-9.+\-]+/[A-Za-z0-9.+\-]+(;[^;,]+)*;base64,")
            .expect("data url prefix regex is valid")
    })
}

// Browsers and most encoders emit canonical base64, but uploads from other
// clients may carry non-zero trailing bits or omit padding.
fn lenient_engine() -> GeneralPurpose {
    GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new()
            .with_decode_allow_trailing_bits(true)
            .with_decode_padding_mode(DecodePaddingMode::Indifferent),
    )
}

/// Removes a leading `data:<mime>[;param=value...];base64,` header. Payloads
/// without one are returned unchanged, so applying this twice is the same as applying it once.
pub fn strip_data_url_prefix(input: &str) -> &str {
    match prefix_regex().find(input) {
        Some(m) => &input[m.end()..],
        None => input,
    }
}

/// Strips any data-URL header and decodes the base64 payload.
pub fn decode_image(slot: ImageSlot, input: &str) -> Result<Vec<u8>, PolaroidError> {
    let payload: String = strip_data_url_prefix(input.trim())
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = lenient_engine()
        .decode(payload.as_bytes())
        .map_err(|e| PolaroidError::InvalidImage {
            slot,
            reason: e.to_string(),
        })?;

    if bytes.is_empty() {
        return Err(PolaroidError::InvalidImage {
            slot,
            reason: "decoded image is empty".to_string(),
        });
    }

    Ok(bytes)
}

pub fn encode_data_url(mime: ResultMime, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime.to_str(),
        general_purpose::STANDARD.encode(bytes)
    )
}
