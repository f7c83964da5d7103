//! Filesystem storage for uploaded post images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::domain::PostImage;
use crate::domain::ports::{MediaStore, MediaStoreError};

/// Sub-directory of the media root holding post images.
pub const POST_IMAGE_DIR: &str = "posts";

/// Writes images below a media root served at `/media/`.
///
/// Files get a fresh UUID name so uploads never overwrite each other and
/// client-supplied names never reach the filesystem.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn write_error(err: std::io::Error) -> MediaStoreError {
    MediaStoreError::write(err.to_string())
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn store(&self, image: &PostImage) -> Result<String, MediaStoreError> {
        let name = format!("{}.{}", Uuid::new_v4(), image.format().extension());
        let dir = self.root.join(POST_IMAGE_DIR);
        fs::create_dir_all(&dir).await.map_err(write_error)?;
        fs::write(dir.join(&name), image.bytes())
            .await
            .map_err(write_error)?;
        debug!(file = %name, bytes = image.bytes().len(), "image written");
        Ok(format!("{POST_IMAGE_DIR}/{name}"))
    }
}
