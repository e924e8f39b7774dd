//! On-disk storage for uploaded post images.
//!
//! Files are written beneath the configured media root through a `cap-std`
//! directory handle, so a stored path can never escape the root. File I/O
//! runs on the blocking pool.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{MediaStore, MediaStoreError};
use crate::domain::image::POST_IMAGE_DIR;
use crate::domain::{ImagePath, ImageUpload};

/// Media store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    /// Store files under `root`; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn write_blocking(
        root: &Path,
        path: &ImagePath,
        bytes: &[u8],
    ) -> Result<(), MediaStoreError> {
        let image_root = root.join(POST_IMAGE_DIR);
        Dir::create_ambient_dir_all(&image_root, ambient_authority())
            .map_err(|err| MediaStoreError::unavailable(err.to_string()))?;
        let dir = Dir::open_ambient_dir(&image_root, ambient_authority())
            .map_err(|err| MediaStoreError::unavailable(err.to_string()))?;
        dir.write(path.file_name(), bytes)
            .map_err(|err| MediaStoreError::write(err.to_string()))
    }

    fn read_blocking(root: &Path, name: &str) -> Result<Option<Vec<u8>>, MediaStoreError> {
        let dir = match Dir::open_ambient_dir(root.join(POST_IMAGE_DIR), ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(MediaStoreError::unavailable(err.to_string())),
        };
        match dir.read(name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MediaStoreError::unavailable(err.to_string())),
        }
    }

    fn remove_blocking(root: &Path, name: &str) -> Result<(), MediaStoreError> {
        let dir = match Dir::open_ambient_dir(root.join(POST_IMAGE_DIR), ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(MediaStoreError::unavailable(err.to_string())),
        };
        match dir.remove_file(name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(MediaStoreError::write(err.to_string())),
        }
    }

    /// Read a stored image back; `None` when nothing is stored at `path`.
    pub async fn read(&self, path: &ImagePath) -> Result<Option<Vec<u8>>, MediaStoreError> {
        let root = self.root.clone();
        let name = path.file_name().to_owned();
        tokio::task::spawn_blocking(move || Self::read_blocking(&root, &name))
            .await
            .map_err(|err| MediaStoreError::unavailable(err.to_string()))?
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, image: &ImageUpload) -> Result<ImagePath, MediaStoreError> {
        let path = ImagePath::generate(image.format());
        let root = self.root.clone();
        let bytes = image.bytes().to_vec();
        let target = path.clone();

        tokio::task::spawn_blocking(move || Self::write_blocking(&root, &target, &bytes))
            .await
            .map_err(|err| MediaStoreError::write(err.to_string()))??;

        debug!(path = %path.as_str(), "stored post image");
        Ok(path)
    }

    async fn remove(&self, path: &ImagePath) -> Result<(), MediaStoreError> {
        let root = self.root.clone();
        let name = path.file_name().to_owned();
        tokio::task::spawn_blocking(move || Self::remove_blocking(&root, &name))
            .await
            .map_err(|err| MediaStoreError::write(err.to_string()))??;
        debug!(path = %path.as_str(), "removed post image");
        Ok(())
    }
}
