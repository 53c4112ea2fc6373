//! Audio upload storage.
//!
//! # Responsibilities
//! - Name recordings `audio_<YYYYMMDDHHMMSS>.webm` from local time
//! - Write the bytes into the configured directory
//!
//! # Design Decisions
//! - Names have one-second resolution. Two uploads in the same second map
//!   to the same file and the later write replaces the earlier one; no lock,
//!   no suffixing.
//! - Bytes are written as received; the `.webm` extension is not checked
//!   against the content.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;

pub const FILE_PREFIX: &str = "audio_";
pub const FILE_EXTENSION: &str = ".webm";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("multipart body could not be read: {0}")]
    Multipart(String),

    #[error("multipart field 'audio' is missing")]
    MissingField,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Recording name for a given instant.
pub fn file_name_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}{}", FILE_PREFIX, at.format("%Y%m%d%H%M%S"), FILE_EXTENSION)
}

/// Directory recordings are written to.
#[derive(Debug, Clone)]
pub struct UploadStore {
    directory: PathBuf,
}

impl UploadStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_directory(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.directory).await
    }

    /// Write a recording, returning the generated file name.
    pub async fn save(&self, bytes: &[u8]) -> Result<String, UploadError> {
        let file_name = file_name_at(&Local::now());
        let path = self.directory.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| UploadError::Write { path: path.clone(), source })?;

        tracing::info!(path = %path.display(), size = bytes.len(), "Audio file saved");
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_file_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(file_name_at(&at), "audio_20240309070501.webm");
    }

    #[tokio::test]
    async fn test_save_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let name = store.save(&[0x00, 0x01]).await.unwrap();
        assert!(name.starts_with(FILE_PREFIX) && name.ends_with(FILE_EXTENSION));
        assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), vec![0x00, 0x01]);
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("absent"));

        let err = store.save(b"x").await.unwrap_err();
        assert!(matches!(err, UploadError::Write { .. }));
    }

    #[tokio::test]
    async fn test_ensure_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("a").join("b"));
        store.ensure_directory().await.unwrap();
        assert!(store.directory().is_dir());
    }
}
