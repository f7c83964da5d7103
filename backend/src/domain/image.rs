//! Images attached to posts.
//!
//! Uploads are accepted by content rather than by file name: the leading
//! bytes must carry a JPEG, PNG, GIF or WebP signature.

use std::fmt;

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Validation errors for uploaded images.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    #[error("the submitted file is empty")]
    Empty,
    #[error(
        "upload a valid image; the file you uploaded was either not an image or a corrupted image"
    )]
    NotAnImage,
    #[error("image must be at most {max} bytes")]
    TooLarge { max: usize },
}

/// Raster formats accepted for post images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Detect the format from the file signature.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::sniff(b"GIF89a\x01\x00"), Some(ImageFormat::Gif));
    /// assert_eq!(ImageFormat::sniff(b"plain text"), None);
    /// ```
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(PNG) {
            Some(Self::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// A file field as submitted by the browser, before validation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Validate the upload.
    ///
    /// Browsers submit an unnamed, empty part when no file was chosen; that
    /// yields `Ok(None)`.
    pub fn validate(self) -> Result<Option<PostImage>, ImageValidationError> {
        if self.bytes.is_empty() {
            return if self.file_name.is_empty() {
                Ok(None)
            } else {
                Err(ImageValidationError::Empty)
            };
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageValidationError::TooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }
        let format = ImageFormat::sniff(&self.bytes).ok_or(ImageValidationError::NotAnImage)?;
        Ok(Some(PostImage {
            format,
            bytes: self.bytes,
        }))
    }
}

/// A validated image waiting to be stored.
#[derive(Clone, PartialEq, Eq)]
pub struct PostImage {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl fmt::Debug for PostImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl PostImage {
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
