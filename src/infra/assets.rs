//! Asset storage for product and category images.
//!
//! The admin mutation flows talk to [`AssetStore`]; the cache layer never
//! touches assets. The bundled adapter stores files under a local root with
//! sanitized, collision-free names. Deleting a missing file is success —
//! retries after a partial cleanup must not fail.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use slug::slugify;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("invalid asset path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("asset payload is empty")]
    EmptyPayload,
}

/// Result of storing one payload.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// Opaque reference handed back to the catalog record. For the
    /// filesystem adapter this is the root-relative path.
    pub url: String,
    pub content_type: String,
    pub checksum: String,
    pub size_bytes: u64,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `data` under `prefix` and return a reference to it.
    async fn upload(
        &self,
        original_name: &str,
        data: Bytes,
        prefix: &str,
    ) -> Result<StoredAsset, AssetStoreError>;

    /// Remove a previously stored asset. Missing files are treated as
    /// success.
    async fn delete(&self, url: &str) -> Result<(), AssetStoreError>;
}

/// Filesystem-backed asset storage.
#[derive(Debug)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Initialise storage rooted at the provided directory, creating it if
    /// necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Absolute filesystem path for a stored asset reference.
    pub fn absolute_path(&self, url: &str) -> Result<PathBuf, AssetStoreError> {
        self.resolve(url)
    }

    fn resolve(&self, stored_path: &str) -> Result<PathBuf, AssetStoreError> {
        let relative = Path::new(stored_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(AssetStoreError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }

    fn build_stored_path(&self, prefix: &str, original_name: &str) -> String {
        let (year, month, day) = time::OffsetDateTime::now_utc().to_calendar_date();
        let identifier = Uuid::new_v4();
        let filename = sanitize_filename(original_name);
        format!("{prefix}/{year}/{:02}/{:02}/{identifier}-{filename}", month as u8, day)
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn upload(
        &self,
        original_name: &str,
        data: Bytes,
        prefix: &str,
    ) -> Result<StoredAsset, AssetStoreError> {
        if data.is_empty() {
            return Err(AssetStoreError::EmptyPayload);
        }

        let stored_path = self.build_stored_path(prefix, original_name);
        let absolute = self.resolve(&stored_path)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&absolute, &data).await?;

        let checksum = hex::encode(Sha256::digest(&data));
        let content_type = mime_guess::from_path(original_name)
            .first_or_octet_stream()
            .to_string();

        Ok(StoredAsset {
            url: stored_path,
            content_type,
            checksum,
            size_bytes: data.len() as u64,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), AssetStoreError> {
        let absolute = self.resolve(url)?;
        match fs::remove_file(&absolute).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AssetStoreError::Io(err)),
        }
    }
}

fn sanitize_filename(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("asset");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "asset".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsAssetStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FsAssetStore::new(dir.path().to_path_buf()).expect("asset store");
        (dir, store)
    }

    #[tokio::test]
    async fn upload_then_delete_round_trip() {
        let (_dir, store) = store();

        let stored = store
            .upload("Robot Photo.JPG", Bytes::from_static(b"jpeg-bytes"), "products")
            .await
            .expect("upload");

        assert!(stored.url.starts_with("products/"));
        assert!(stored.url.ends_with(".jpg"));
        assert_eq!(stored.size_bytes, 10);
        assert_eq!(stored.content_type, "image/jpeg");

        let absolute = store.absolute_path(&stored.url).expect("absolute path");
        assert!(absolute.exists());

        store.delete(&stored.url).await.expect("delete");
        assert!(!absolute.exists());
    }

    #[tokio::test]
    async fn deleting_a_missing_asset_succeeds() {
        let (_dir, store) = store();
        store
            .delete("products/2026/01/01/gone.png")
            .await
            .expect("idempotent delete");
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let (_dir, store) = store();
        let err = store
            .upload("empty.png", Bytes::new(), "products")
            .await
            .expect_err("empty payload");
        assert!(matches!(err, AssetStoreError::EmptyPayload));
    }

    #[tokio::test]
    async fn path_escapes_are_rejected() {
        let (_dir, store) = store();
        let err = store
            .delete("../outside.png")
            .await
            .expect_err("escape rejected");
        assert!(matches!(err, AssetStoreError::InvalidPath));
    }

    #[tokio::test]
    async fn filenames_are_sanitized() {
        let (_dir, store) = store();
        let stored = store
            .upload("Fotos Niños (1).png", Bytes::from_static(b"png"), "categories")
            .await
            .expect("upload");
        let filename = stored.url.rsplit('/').next().expect("filename");
        let (_, rest) = filename.split_at(37); // uuid + '-'
        assert_eq!(rest, "fotos-ninos-1.png");
    }
}
