//! Product photo analysis
//!
//! Best-effort, single-attempt extraction: the vision reply is parsed as
//! JSON directly, then by pulling the first balanced `{…}` block out of
//! the text; anything else surfaces an error and leaves the form fields
//! for manual entry.

use shared::models::ProductAnalysis;

use crate::assistant::client::AssistantClient;
use crate::assistant::prompt::PRODUCT_ANALYSIS_PROMPT;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Hard cap on images per analysis request
pub const MAX_ANALYSIS_IMAGES: usize = 10;

/// Normalize the inbound image list: cap at 10, strip data-URL prefixes,
/// drop entries that are not decodable base64 (the backend would reject
/// the whole request otherwise).
pub fn prepare_images(images: &[String]) -> Vec<String> {
    use base64::Engine;

    images
        .iter()
        .take(MAX_ANALYSIS_IMAGES)
        .map(|img| match img.find("base64,") {
            Some(idx) if img.starts_with("data:") => img[idx + "base64,".len()..].to_string(),
            _ => img.clone(),
        })
        .filter(|data| {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .is_ok()
        })
        .collect()
}

/// Run the analysis call and parse the reply
pub async fn analyze_photos(
    client: &AssistantClient,
    images: &[String],
) -> AppResult<ProductAnalysis> {
    if images.is_empty() {
        return Err(AppError::validation("images required"));
    }

    let prepared = prepare_images(images);
    if prepared.is_empty() {
        return Err(AppError::validation("no decodable images in request"));
    }

    let raw = client
        .analyze_images(&prepared, PRODUCT_ANALYSIS_PROMPT)
        .await?;

    extract_analysis(&raw)
}

/// Parse the reply text into a [`ProductAnalysis`].
///
/// Direct parse first; on failure, the first balanced `{…}` substring is
/// tried. Not a grammar-validated parse — just lenient enough for replies
/// wrapped in prose or markdown fences.
pub fn extract_analysis(raw: &str) -> AppResult<ProductAnalysis> {
    if let Ok(parsed) = serde_json::from_str::<ProductAnalysis>(raw) {
        return Ok(parsed);
    }

    let candidate = first_balanced_object(raw).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::AssistantInvalidReply,
            "IA não retornou JSON válido",
        )
    })?;

    serde_json::from_str::<ProductAnalysis>(candidate).map_err(|_| {
        AppError::with_message(
            ErrorCode::AssistantInvalidReply,
            "IA não retornou JSON válido",
        )
    })
}

/// Locate the first balanced `{…}` substring, string-literal aware
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
