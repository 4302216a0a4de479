use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::ApiError;
use crate::services::recommender::SUPPORTED_LANGUAGES;

const MAX_TOP_N: usize = 50;

pub fn validate_top_n(top_n: usize) -> Result<usize, ApiError> {
    if !(1..=MAX_TOP_N).contains(&top_n) {
        return Err(ApiError::validation(format!(
            "Invalid top_n: {}. Must be between 1 and {}",
            top_n, MAX_TOP_N
        )));
    }
    Ok(top_n)
}

/// Canonicalizes a requested language against the supported list.
/// Empty and missing values both mean "no preference".
pub fn validate_language(language: Option<&str>) -> Result<Option<&'static str>, ApiError> {
    let Some(requested) = language else {
        return Ok(None);
    };

    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    SUPPORTED_LANGUAGES
        .iter()
        .copied()
        .find(|l| l.eq_ignore_ascii_case(trimmed))
        .map(Some)
        .ok_or_else(|| {
            ApiError::validation(format!(
                "Unsupported language: {}. Supported: {}",
                trimmed,
                SUPPORTED_LANGUAGES.join(", ")
            ))
        })
}

/// Decodes a base64 image payload, accepting an optional data URL prefix
/// ("data:image/png;base64,...").
pub fn decode_image_data(image_data: &str, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let trimmed = image_data.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("No image data provided"));
    }

    let payload = trimmed.split_once(',').map_or(trimmed, |(_, rest)| rest);

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| ApiError::image(e.to_string()))?;

    if bytes.len() > max_bytes {
        return Err(ApiError::validation(format!(
            "Image too large: {} bytes (limit is {})",
            bytes.len(),
            max_bytes
        )));
    }

    Ok(bytes)
}
