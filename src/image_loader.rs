//! Thumbnail rendering.

use crate::config::THUMBNAIL_SIZE;
use crate::error::{AppError, Result};
use std::path::Path;

/// Downscaled RGBA8 preview of an image file.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Produces thumbnails from image files.
///
/// Rendering must be pure: rendering the same file twice gives equivalent
/// thumbnails, so callers are free to cache the result.
pub trait ThumbnailRenderer: Send + Sync {
    fn render(&self, path: &Path) -> Result<Thumbnail>;
}

/// Renders thumbnails by decoding with the `image` crate.
pub struct ImageThumbnailRenderer {
    size: u32,
}

impl ImageThumbnailRenderer {
    /// Creates a renderer fitting thumbnails into a `size` x `size` box.
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl Default for ImageThumbnailRenderer {
    fn default() -> Self {
        Self::new(THUMBNAIL_SIZE)
    }
}

impl ThumbnailRenderer for ImageThumbnailRenderer {
    fn render(&self, path: &Path) -> Result<Thumbnail> {
        let image = image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
            .decode()?;

        let rgba = image.thumbnail(self.size, self.size).to_rgba8();
        Ok(Thumbnail {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn renders_within_bounds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::from_pixel(300, 200, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let thumb = ImageThumbnailRenderer::new(64).render(&path).unwrap();
        assert_eq!(thumb.width, 64);
        assert!(thumb.height <= 64 && thumb.height > 0);
        assert_eq!(thumb.data.len(), (thumb.width * thumb.height * 4) as usize);
        assert_eq!(&thumb.data[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn undecodable_file_is_an_image_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let result = ImageThumbnailRenderer::default().render(&path);
        assert!(matches!(result, Err(AppError::ImageLoad(_))));
    }
}
