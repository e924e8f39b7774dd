//! Port for persisting uploaded post images.
use async_trait::async_trait;

use crate::domain::{ImagePath, ImageUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by media storage adapters.
    pub enum MediaStoreError {
        /// The storage backend could not be reached or opened.
        Unavailable { message: String } => "media storage unavailable: {message}",
        /// Writing the file failed.
        Write { message: String } => "media write failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an image under a fresh path and return that path.
    async fn store(&self, image: &ImageUpload) -> Result<ImagePath, MediaStoreError>;

    /// Delete a stored image. Removing a path that holds nothing succeeds.
    async fn remove(&self, path: &ImagePath) -> Result<(), MediaStoreError>;
}
