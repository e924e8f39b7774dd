//! Uploaded post images.
//!
//! An upload is accepted only when its filename carries an image extension
//! and its leading bytes match a known image signature. The stored file takes
//! its extension from the detected format, not from the client.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directory under the media root that holds post images.
pub const POST_IMAGE_DIR: &str = "posts";

/// Image formats recognised by content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    /// Detect a format from the file's leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'B', b'M', ..] if bytes.len() > 14 => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }
}

/// Reasons an upload is not an acceptable image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    #[error("file extension is not an image type")]
    NotImageExtension,
    #[error("file content is not a recognised image")]
    UnrecognisedContent,
}

/// A validated image upload awaiting storage.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate an uploaded file by name and content.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::{ImageFormat, ImageUpload};
    ///
    /// let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec();
    /// let upload = ImageUpload::from_upload("small.gif", gif).expect("valid gif");
    /// assert_eq!(upload.format(), ImageFormat::Gif);
    /// assert!(ImageUpload::from_upload("notes.txt", b"GIF89a".to_vec()).is_err());
    /// ```
    pub fn from_upload(filename: &str, bytes: Vec<u8>) -> Result<Self, ImageValidationError> {
        let is_image_name = mime_guess::from_path(filename)
            .iter()
            .any(|guess| guess.type_() == mime::IMAGE);
        if !is_image_name {
            return Err(ImageValidationError::NotImageExtension);
        }
        let format =
            ImageFormat::sniff(&bytes).ok_or(ImageValidationError::UnrecognisedContent)?;
        Ok(Self { format, bytes })
    }

    /// Detected format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Raw file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Errors raised when an image path fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImagePathError {
    #[error("image path must be a relative path under the posts directory")]
    Invalid,
}

/// Media-root-relative location of a stored post image, e.g.
/// `posts/0c7e...png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePath(String);

impl ImagePath {
    /// Allocate a fresh, collision-free path for an image of `format`.
    pub fn generate(format: ImageFormat) -> Self {
        Self(format!(
            "{POST_IMAGE_DIR}/{}.{}",
            Uuid::new_v4().simple(),
            format.extension()
        ))
    }

    /// Validate a stored path.
    pub fn new(path: impl Into<String>) -> Result<Self, ImagePathError> {
        let path = path.into();
        let Some(name) = path
            .strip_prefix(POST_IMAGE_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Err(ImagePathError::Invalid);
        };
        let well_formed = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'));
        if !well_formed {
            return Err(ImagePathError::Invalid);
        }
        Ok(Self(path))
    }

    /// File name within the posts directory.
    pub fn file_name(&self) -> &str {
        self.0
            .strip_prefix(POST_IMAGE_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(self.0.as_str())
    }

    /// Borrow the relative path.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ImagePath> for String {
    fn from(value: ImagePath) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImagePath {
    type Error = ImagePathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
