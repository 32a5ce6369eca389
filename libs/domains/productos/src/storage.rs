//! Photo storage for uploaded producto images

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductoResult;

/// Keep only the last path component of a client-supplied filename and
/// strip spaces, colons and backslashes from it
pub fn sanitize_filename(original: &str) -> String {
    Path::new(original)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| !matches!(c, ' ' | ':' | '\\'))
        .collect()
}

/// Build the stored name for an upload: `<uuid-v4>-<sanitized original>`
pub fn photo_filename(original: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_filename(original))
}

/// Destination for uploaded photo bytes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist `bytes` under `name`, replacing any previous file of that name
    async fn store(&self, name: &str, bytes: &[u8]) -> ProductoResult<()>;
}

/// Writes photos beneath a base directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn store(&self, name: &str, bytes: &[u8]) -> ProductoResult<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        let target = self.base_path.join(name);
        tokio::fs::write(&target, bytes).await?;
        tracing::debug!(path = %target.display(), "Stored photo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_sanitize_filename_strips_forbidden_characters() {
        assert_eq!(sanitize_filename("my file:name\\.png"), "myfilename.png");
        assert_eq!(sanitize_filename("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn test_photo_filename_has_uuid_prefix() {
        let name = photo_filename("my file:name\\.png");
        let pattern = Regex::new(r"^[\w-]{36}-myfilename.png$").unwrap();
        assert!(pattern.is_match(&name), "unexpected filename {}", name);
    }

    #[test]
    fn test_sanitize_filename_drops_directories() {
        assert_eq!(sanitize_filename("fotos/a.png"), "a.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/mi foto.png"), "mifoto.png");
        assert_eq!(sanitize_filename(".."), "");
    }

    #[test]
    fn test_photo_filename_from_nested_path() {
        let name = photo_filename("fotos/a.png");
        let pattern = Regex::new(r"^[\w-]{36}-a\.png$").unwrap();
        assert!(pattern.is_match(&name), "unexpected filename {}", name);
    }

    #[test]
    fn test_photo_filenames_are_unique() {
        assert_ne!(photo_filename("a.png"), photo_filename("a.png"));
    }

    #[tokio::test]
    async fn test_local_storage_creates_directory_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("uploads"));

        storage.store("foto.png", b"png-bytes").await.unwrap();

        let written = tokio::fs::read(dir.path().join("uploads").join("foto.png"))
            .await
            .unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn test_local_storage_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        storage.store("foto.png", b"first").await.unwrap();
        storage.store("foto.png", b"second").await.unwrap();

        let written = tokio::fs::read(dir.path().join("foto.png")).await.unwrap();
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_nested_upload_name_lands_in_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("uploads"));

        let name = photo_filename("fotos/a.png");
        storage.store(&name, b"png-bytes").await.unwrap();

        let written = tokio::fs::read(dir.path().join("uploads").join(&name))
            .await
            .unwrap();
        assert_eq!(written, b"png-bytes");
        assert!(!dir.path().join("uploads").join("fotos").exists());
    }
}
