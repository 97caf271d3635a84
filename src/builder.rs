use crate::analysis::{AnalysisRequest, GenerationConfig, ImagePayload};
use crate::config::AppConfig;
use crate::error::AppError;

/// Assembles an [`AnalysisRequest`] ready for transmission, rejecting bad
/// payloads before any network call happens.
pub fn build_request(
    config: &AppConfig,
    instruction: &str,
    payload: ImagePayload,
) -> Result<AnalysisRequest, AppError> {
    log::trace!(
        "Building analysis request for {} byte payload declared as {}",
        payload.bytes.len(),
        payload.mime_type
    );

    if payload.bytes.is_empty() {
        return Err(AppError::Validation("image payload is empty".into()));
    }

    if payload.bytes.len() > config.max_image_bytes {
        return Err(AppError::Validation(format!(
            "image payload is {} bytes, limit is {}",
            payload.bytes.len(),
            config.max_image_bytes
        )));
    }

    let mime: mime::Mime = payload
        .mime_type
        .parse()
        .map_err(|_| AppError::Validation(format!("unparseable MIME type: {}", payload.mime_type)))?;
    if !config.allowed_mime_types.contains(mime.essence_str()) {
        return Err(AppError::Validation(format!(
            "unsupported image type: {}",
            mime.essence_str()
        )));
    }

    // Magic-byte sniff only; the image is never decoded locally.
    if image::guess_format(&payload.bytes).is_err() {
        return Err(AppError::Validation(
            "payload does not look like a known raster image".into(),
        ));
    }

    log::debug!(
        "Payload accepted: {} bytes, {}",
        payload.bytes.len(),
        mime.essence_str()
    );

    Ok(AnalysisRequest {
        instruction: instruction.to_string(),
        payload,
        generation: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        },
    })
}
