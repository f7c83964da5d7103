//! Port for storing uploaded post images.
use async_trait::async_trait;

use super::define_port_error;
use crate::domain::PostImage;

define_port_error! {
    /// Errors raised by media storage adapters.
    pub enum MediaStoreError {
        /// The file could not be written.
        Write { message: String } => "media write failed: {message}",
    }
}

impl From<MediaStoreError> for crate::domain::Error {
    fn from(err: MediaStoreError) -> Self {
        crate::domain::Error::internal(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist `image` and return its path relative to the media root,
    /// e.g. `posts/7c9e6679.png`.
    async fn store(&self, image: &PostImage) -> Result<String, MediaStoreError>;
}
