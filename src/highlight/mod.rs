//! Highlight overlays for found regions
//!
//! The finder collects rectangles into an [`Overlay`] and hands it to a
//! [`Highlighter`] backend. Keeping the overlay on screen for its duration
//! is the finder's job, the backend only has to show it.

pub mod snapshot;

pub use snapshot::SnapshotHighlighter;

use crate::error::FinderResult;
use crate::geometry::Region;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    White,
    Black,
}

impl Color {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Color::Red => [255, 0, 0],
            Color::Green => [0, 200, 0],
            Color::Blue => [0, 0, 255],
            Color::Yellow => [255, 255, 0],
            Color::Orange => [255, 165, 0],
            Color::White => [255, 255, 255],
            Color::Black => [0, 0, 0],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            "orange" => Some(Color::Orange),
            "white" => Some(Color::White),
            "black" => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// One highlighted rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRect {
    pub region: Region,
    pub color: Color,
    /// Caption drawn at the top-left corner
    pub label: Option<String>,
}

impl HighlightRect {
    pub fn new(region: Region, color: Color) -> Self {
        Self {
            region,
            color,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Set of rectangles shown together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    rectangles: Vec<HighlightRect>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_rectangle(&mut self, rect: HighlightRect) {
        self.rectangles.push(rect);
    }

    pub fn rectangles(&self) -> &[HighlightRect] {
        &self.rectangles
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }
}

/// Backend that makes an overlay visible
pub trait Highlighter {
    /// Show `overlay`; it should stay visible for `duration`
    fn render(&self, overlay: &Overlay, duration: Duration) -> FinderResult<()>;
}

impl<H: Highlighter + ?Sized> Highlighter for &H {
    fn render(&self, overlay: &Overlay, duration: Duration) -> FinderResult<()> {
        (**self).render(overlay, duration)
    }
}

/// Reports highlights through the log instead of drawing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHighlighter;

impl Highlighter for LogHighlighter {
    fn render(&self, overlay: &Overlay, duration: Duration) -> FinderResult<()> {
        for rect in overlay.rectangles() {
            log::info!(
                "🟥 Highlight {} {} for {}ms{}",
                rect.region,
                rect.color,
                duration.as_millis(),
                rect.label
                    .as_deref()
                    .map(|l| format!(" ({l})"))
                    .unwrap_or_default()
            );
        }
        Ok(())
    }
}
