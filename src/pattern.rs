//! Image patterns (templates) to look for on screen

use crate::error::{FinderError, FinderResult};
use image::{DynamicImage, GrayImage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An immutable image template together with its matching parameters.
///
/// The size always comes from the loaded (and scaled) image so it can never
/// disagree with the pixels the matcher compares against.
#[derive(Clone)]
pub struct Pattern {
    path: Option<PathBuf>,
    name: String,
    similarity: Option<f32>,
    scale: f32,
    source: Arc<GrayImage>,
    image: Arc<GrayImage>,
}

impl Pattern {
    /// Load a pattern from an image file
    pub fn new(path: impl AsRef<Path>) -> FinderResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?;

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut pattern = Self::from_image(name, &image)?;
        pattern.path = Some(path.to_path_buf());
        Ok(pattern)
    }

    /// Build a pattern from an in-memory image
    pub fn from_image(name: impl Into<String>, image: &DynamicImage) -> FinderResult<Self> {
        Self::from_gray(name, image.to_luma8())
    }

    pub fn from_gray(name: impl Into<String>, image: GrayImage) -> FinderResult<Self> {
        let name = name.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(FinderError::invalid_argument(format!(
                "pattern {name} has an empty image"
            )));
        }
        let image = Arc::new(image);
        Ok(Self {
            path: None,
            name,
            similarity: None,
            scale: 1.0,
            source: Arc::clone(&image),
            image,
        })
    }

    /// Same pattern with a minimum similarity (0.0-1.0) for a match
    pub fn similar(mut self, similarity: f32) -> Self {
        if similarity.is_nan() {
            log::warn!("Ignoring NaN similarity for pattern {}", self.name);
            return self;
        }
        self.similarity = Some(similarity.clamp(0.0, 1.0));
        self
    }

    /// Same pattern requiring a (near) pixel-perfect match
    pub fn exact(self) -> Self {
        self.similar(0.99)
    }

    /// Same pattern resized by `scale` relative to the original image
    pub fn with_scale(mut self, scale: f32) -> FinderResult<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(FinderError::invalid_argument(format!(
                "invalid scale {scale} for pattern {}",
                self.name
            )));
        }

        if (scale - 1.0).abs() <= 0.01 {
            self.image = Arc::clone(&self.source);
            self.scale = 1.0;
            return Ok(self);
        }

        let new_width = (self.source.width() as f32 * scale) as u32;
        let new_height = (self.source.height() as f32 * scale) as u32;
        if new_width == 0 || new_height == 0 {
            return Err(FinderError::invalid_argument(format!(
                "scale {scale} shrinks pattern {} to nothing",
                self.name
            )));
        }

        self.image = Arc::new(image::imageops::resize(
            self.source.as_ref(),
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        ));
        self.scale = scale;
        Ok(self)
    }

    /// File name (or given name) of the pattern
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Explicit similarity, `None` when the matcher default applies
    pub fn min_similarity(&self) -> Option<f32> {
        self.similarity
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Grayscale pixels the matcher compares against
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// (width, height) of the pattern as matched
    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Target description used in error messages
    pub fn describe(&self) -> String {
        format!("image {}", self.name)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("similarity", &self.similarity)
            .field("scale", &self.scale)
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn gray(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 31 + y * 17) % 256) as u8]))
    }

    #[test]
    fn test_pattern_size_follows_image() {
        let pattern = Pattern::from_gray("button.png", gray(40, 20)).unwrap();
        assert_eq!(pattern.size(), (40, 20));
        assert_eq!(pattern.name(), "button.png");
        assert_eq!(pattern.describe(), "image button.png");
        assert_eq!(pattern.min_similarity(), None);
        assert!(pattern.path().is_none());
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let err = Pattern::from_gray("empty", GrayImage::new(0, 10)).unwrap_err();
        assert!(matches!(err, FinderError::InvalidArgument { .. }));
    }

    #[test]
    fn test_similarity_is_clamped() {
        let pattern = Pattern::from_gray("p", gray(4, 4)).unwrap();
        assert_eq!(pattern.clone().similar(0.9).min_similarity(), Some(0.9));
        assert_eq!(pattern.clone().similar(1.5).min_similarity(), Some(1.0));
        assert_eq!(pattern.clone().similar(-0.2).min_similarity(), Some(0.0));
        assert_eq!(pattern.clone().similar(f32::NAN).min_similarity(), None);
        assert_eq!(pattern.exact().min_similarity(), Some(0.99));
    }

    #[test]
    fn test_scale_resizes_from_source() {
        let pattern = Pattern::from_gray("p", gray(40, 20)).unwrap();
        let half = pattern.with_scale(0.5).unwrap();
        assert_eq!(half.size(), (20, 10));
        assert_eq!(half.scale(), 0.5);

        // Rescaling starts again from the original pixels
        let back = half.with_scale(1.0).unwrap();
        assert_eq!(back.size(), (40, 20));
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let pattern = Pattern::from_gray("p", gray(4, 4)).unwrap();
        assert!(pattern.clone().with_scale(0.0).is_err());
        assert!(pattern.clone().with_scale(-1.0).is_err());
        assert!(pattern.with_scale(0.1).is_err());
    }

    #[test]
    fn test_pattern_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("button.png");
        gray(12, 8).save(&path).unwrap();

        let pattern = Pattern::new(&path).unwrap();
        assert_eq!(pattern.name(), "button.png");
        assert_eq!(pattern.path(), Some(path.as_path()));
        assert_eq!(pattern.size(), (12, 8));
    }

    #[test]
    fn test_missing_file_is_image_error() {
        let err = Pattern::new("does/not/exist.png").unwrap_err();
        assert!(matches!(err, FinderError::Image { .. }));
    }
}
