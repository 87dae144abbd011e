//! Image Upload Handler
//!
//! Handles product photo uploads from authenticated merchants. Accepts
//! PNG/JPEG/WebP, recompresses to JPEG and deduplicates by content hash.
//! Files are served back from `/images/{filename}`.

use axum::Json;
use axum::extract::{Multipart, State};
use image::DynamicImage;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::{fs, io::Cursor};
use uuid::Uuid;

use crate::auth::CurrentMerchant;
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};
use shared::client::UploadResponse;

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for product photos (85% keeps fabric detail while
/// controlling file size)
const JPEG_QUALITY: u8 = 85;

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Find existing file by content hash
fn find_file_by_hash(images_dir: &Path, hash: &str) -> Option<String> {
    let hash_dir = images_dir.join("by_hash");
    if !hash_dir.exists() {
        return None;
    }

    // Hash directory uses first 2 chars as subdir (e.g., "ab/abc123...")
    let prefix = &hash[..2];
    let hash_path = hash_dir.join(format!("{}/{}", prefix, hash));

    if hash_path.exists() {
        // Read the symlink to get original filename
        if let Ok(target) = fs::read_link(&hash_path) {
            return target.file_name().map(|s| s.to_string_lossy().to_string());
        }
    }
    None
}

/// Create hash-based symlink for deduplication
fn create_hash_symlink(images_dir: &Path, hash: &str, filename: &str) -> Result<(), AppError> {
    let hash_dir = images_dir.join("by_hash");
    let prefix = &hash[..2];
    let hash_subdir = hash_dir.join(prefix);
    fs::create_dir_all(&hash_subdir)
        .map_err(|e| AppError::internal(format!("Failed to create hash subdir: {}", e)))?;

    let hash_path = hash_subdir.join(hash);
    let target_path = PathBuf::from("../../").join(filename);

    symlink::symlink_auto(&target_path, &hash_path)
        .map_err(|e| AppError::internal(format!("Failed to create symlink: {}", e)))?;

    Ok(())
}

/// Process and compress image to JPEG
fn process_and_compress_image(data: Vec<u8>) -> Result<(DynamicImage, Vec<u8>), AppError> {
    let img = image::load_from_memory(&data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {}", e),
            )
        })?;
    }

    Ok((img, buffer))
}

/// Validate image payload before processing
fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext_lower,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    // The content-type guess is advisory; loading is what actually
    // validates the bytes
    let _ = mime_guess::from_ext(&ext_lower).first_or_octet_stream();
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({}): {}", ext_lower, e),
        ));
    }

    Ok(())
}

/// POST /api/upload - 上传商品图片 (multipart, field "file")
pub async fn upload(
    State(state): State<ServerState>,
    merchant: CurrentMerchant,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let images_dir = state.config.images_dir();
    fs::create_dir_all(&images_dir)
        .map_err(|e| AppError::internal(format!("Failed to create images directory: {}", e)))?;

    // Find the file field
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(f) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = f.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = f.file_name().map(|s| s.to_string());
            field_data = Some(
                f.bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data
        .ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }

    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {}", filename)))?;

    validate_image(&data, &ext)?;

    let (_original_img, compressed_data) = process_and_compress_image(data)?;

    // Deduplicate by content hash
    let file_hash = calculate_hash(&compressed_data);
    if let Some(existing) = find_file_by_hash(&images_dir, &file_hash) {
        tracing::info!(
            merchant = %merchant.id,
            original_name = %filename,
            existing_file = %existing,
            "Duplicate image detected, returning existing file"
        );
        return Ok(Json(UploadResponse {
            url: format!("/images/{}", existing),
            size: compressed_data.len(),
            format: "jpg".to_string(),
        }));
    }

    // Store as {uuid}.jpg + hash symlink
    let stored_name = format!("{}.jpg", Uuid::new_v4());
    let stored_path = images_dir.join(&stored_name);
    fs::write(&stored_path, &compressed_data).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to store image: {}", e),
        )
    })?;
    create_hash_symlink(&images_dir, &file_hash, &stored_name)?;

    tracing::info!(
        merchant = %merchant.id,
        file = %stored_name,
        size = compressed_data.len(),
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        url: format!("/images/{}", stored_name),
        size: compressed_data.len(),
        format: "jpg".to_string(),
    }))
}
