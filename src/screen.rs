//! Screen sources the matcher captures pixels from
//!
//! Live capture devices are outside this crate; a caller plugs one in by
//! implementing [`ScreenSource`]. The sources here serve screenshots from
//! memory or disk.

use crate::error::{FinderError, FinderResult};
use image::GrayImage;
use std::cell::Cell;
use std::path::Path;

/// Something that can produce the current screen contents
pub trait ScreenSource {
    /// Capture the whole screen as grayscale pixels
    fn capture(&self) -> FinderResult<GrayImage>;

    /// Screen size as (width, height)
    fn dimensions(&self) -> (u32, u32);
}

impl<S: ScreenSource + ?Sized> ScreenSource for &S {
    fn capture(&self) -> FinderResult<GrayImage> {
        (**self).capture()
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}

/// A screen that never changes, e.g. a saved screenshot
#[derive(Debug, Clone)]
pub struct StaticScreen {
    image: GrayImage,
}

impl StaticScreen {
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    /// Load a screenshot file (PNG/JPEG)
    pub fn from_file(path: impl AsRef<Path>) -> FinderResult<Self> {
        let image = image::open(path.as_ref())?;
        Ok(Self::new(image.to_luma8()))
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }
}

impl ScreenSource for StaticScreen {
    fn capture(&self) -> FinderResult<GrayImage> {
        Ok(self.image.clone())
    }

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Replays a recorded series of frames, one per capture.
///
/// Once the last frame is reached it keeps being returned.
#[derive(Debug)]
pub struct ReplayScreen {
    frames: Vec<GrayImage>,
    next: Cell<usize>,
}

impl ReplayScreen {
    pub fn new(frames: Vec<GrayImage>) -> FinderResult<Self> {
        let Some(first) = frames.first() else {
            return Err(FinderError::invalid_argument("replay needs at least one frame"));
        };
        let dims = first.dimensions();
        if frames.iter().any(|f| f.dimensions() != dims) {
            return Err(FinderError::invalid_argument(
                "replay frames must share the same dimensions",
            ));
        }
        Ok(Self {
            frames,
            next: Cell::new(0),
        })
    }

    /// Number of captures served so far
    pub fn captures(&self) -> usize {
        self.next.get()
    }
}

impl ScreenSource for ReplayScreen {
    fn capture(&self) -> FinderResult<GrayImage> {
        let index = self.next.get();
        self.next.set(index + 1);
        let frame = index.min(self.frames.len() - 1);
        log::debug!("Replaying frame {}/{}", frame + 1, self.frames.len());
        Ok(self.frames[frame].clone())
    }

    fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }
}
