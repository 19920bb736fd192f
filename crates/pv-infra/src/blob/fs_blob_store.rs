//! Content-addressed document store on the local filesystem.
//! 基于内容寻址的本地文件文档存储。

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use pv_core::extract::RawExtractUpload;
use pv_core::ports::ExtractBlobStorePort;

const BLOBS_DIR: &str = "blobs";

/// Stores extract documents under `<root>/blobs/<hh>/<hash>`, keyed by the
/// blake3 digest of the payload. Re-uploading identical content is a no-op,
/// which makes the upload safe to retry.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(BLOBS_DIR))
            .with_context(|| format!("failed to create blob root: {}", root.display()))?;
        Ok(Self { root })
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        self.root.join(BLOBS_DIR).join(&hash[..2]).join(hash)
    }
}

#[async_trait]
impl ExtractBlobStorePort for FsBlobStore {
    async fn upload(&self, upload: &RawExtractUpload) -> Result<()> {
        let hash = blake3::hash(&upload.content).to_hex().to_string();
        let path = self.blob_path(&hash);

        if fs::try_exists(&path).await? {
            debug!(content_hash = %hash, "Blob already present; skipping write");
            return Ok(());
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        // Stage under a unique name and rename into place, so a crashed
        // upload never leaves a partial blob at the final path.
        let staging = path.with_file_name(format!("{hash}.{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&staging, &upload.content)
            .await
            .with_context(|| format!("failed to write blob staging file: {}", staging.display()))?;
        fs::rename(&staging, &path).await?;

        debug!(
            content_hash = %hash,
            size_bytes = upload.content.len(),
            "Blob written"
        );
        Ok(())
    }
}
