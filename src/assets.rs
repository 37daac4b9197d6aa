//! Profile photo intake and storage
//!
//! Uploads are validated against a fixed MIME allow-list, given a fresh
//! millisecond-timestamp filename, and written under the uploads directory.
//! Assets are append-only; nothing here ever overwrites or deletes a stored
//! photo. The stored filename is what gets persisted on the record and later
//! resolved to bytes by the static file route.

use std::path::{Path, PathBuf};

use crate::error::{Result, ServiceError};

/// MIME types accepted for profile photos
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// One uploaded attachment as received from the transport layer
#[derive(Debug, Clone)]
pub struct AssetUpload {
    /// Client-declared filename (used only for its extension)
    pub filename: String,
    /// Client-declared MIME type
    pub content_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

/// Stores accepted uploads under a single directory
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory stored assets are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an upload, returning the stored filename
    ///
    /// A MIME type outside the allow-list rejects the whole request before
    /// any record is persisted. Timestamp collisions between concurrent
    /// uploads are accepted as negligible; there is no retry.
    pub async fn store(&self, upload: AssetUpload) -> Result<String> {
        if !ALLOWED_MIME_TYPES.contains(&upload.content_type.as_str()) {
            return Err(ServiceError::UnsupportedMediaType(upload.content_type));
        }

        let filename = unique_filename(&upload.filename, chrono::Utc::now().timestamp_millis());
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(ServiceError::AssetStorage)?;

        tracing::debug!("Stored profile photo: {}", path.display());
        Ok(filename)
    }
}

/// Derive the unique stored name: `<unix-millis><original-extension>`
fn unique_filename(original: &str, timestamp_millis: i64) -> String {
    match Path::new(original).extension() {
        Some(ext) => format!("{}.{}", timestamp_millis, ext.to_string_lossy()),
        None => timestamp_millis.to_string(),
    }
}
