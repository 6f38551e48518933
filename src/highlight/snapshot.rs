//! Highlighter that draws the overlay onto a screenshot and saves it as PNG

use super::{HighlightRect, Highlighter, Overlay};
use crate::error::{FinderError, FinderResult};
use crate::screen::ScreenSource;
use ab_glyph::FontVec;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BORDER_THICKNESS: i32 = 2;
const LABEL_HEIGHT: u32 = 6;
const LABEL_FONT_SCALE: f32 = 14.0;

const SYSTEM_FONTS: [&str; 3] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub struct SnapshotHighlighter<S> {
    screen: S,
    output: PathBuf,
    /// Font for rectangle labels, labels become plain tabs without one
    font: Option<FontVec>,
}

impl<S: ScreenSource> SnapshotHighlighter<S> {
    pub fn new(screen: S, output: impl Into<PathBuf>) -> Self {
        Self {
            screen,
            output: output.into(),
            font: None,
        }
    }

    /// Label rectangles with a font loaded from `font_path`
    pub fn with_font_path(mut self, font_path: &Path) -> FinderResult<Self> {
        let data = std::fs::read(font_path).map_err(|e| FinderError::Highlight {
            description: format!("cannot read font {}: {}", font_path.display(), e),
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| FinderError::Highlight {
            description: format!("cannot parse font {}", font_path.display()),
        })?;
        self.font = Some(font);
        Ok(self)
    }

    /// Label rectangles with the first common system font that loads
    pub fn with_system_font(mut self) -> Self {
        for path in SYSTEM_FONTS {
            if let Ok(data) = std::fs::read(path)
                && let Ok(font) = FontVec::try_from_vec(data)
            {
                log::debug!("Loaded label font {}", path);
                self.font = Some(font);
                return self;
            }
        }
        log::debug!("No system font found, labels are drawn as tabs");
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Draw the overlay onto the current screen contents
    pub fn draw(&self, overlay: &Overlay) -> FinderResult<RgbImage> {
        let screen = self.screen.capture()?;
        let mut canvas = DynamicImage::ImageLuma8(screen).to_rgb8();
        for rect in overlay.rectangles() {
            draw_rect(&mut canvas, rect, self.font.as_ref());
        }
        Ok(canvas)
    }
}

fn draw_rect(canvas: &mut RgbImage, rect: &HighlightRect, font: Option<&FontVec>) {
    let color = Rgb(rect.color.rgb());
    let region = rect.region;
    if !region.is_valid() {
        return;
    }

    for thickness in 0..BORDER_THICKNESS {
        let thick_rect = Rect::at(region.x as i32 - thickness, region.y as i32 - thickness)
            .of_size(
                region.width + (2 * thickness) as u32,
                region.height + (2 * thickness) as u32,
            );
        draw_hollow_rect_mut(canvas, thick_rect, color);
    }

    let Some(label) = rect.label.as_deref() else {
        return;
    };
    match font {
        Some(font) => {
            // Caption sits above the box, or inside it at the top screen edge
            let text_height = LABEL_FONT_SCALE as i32;
            let y = if region.y as i32 >= text_height + BORDER_THICKNESS {
                region.y as i32 - text_height - BORDER_THICKNESS
            } else {
                region.y as i32 + BORDER_THICKNESS
            };
            let x = region.x as i32 + BORDER_THICKNESS;
            draw_text_mut(canvas, color, x, y, LABEL_FONT_SCALE, font, label);
        }
        None => {
            let tab_width = region.width.min(48);
            let tab = Rect::at(region.x as i32, region.y as i32 - LABEL_HEIGHT as i32)
                .of_size(tab_width, LABEL_HEIGHT);
            draw_filled_rect_mut(canvas, tab, color);
        }
    }
}

impl<S: ScreenSource> Highlighter for SnapshotHighlighter<S> {
    fn render(&self, overlay: &Overlay, duration: Duration) -> FinderResult<()> {
        let canvas = self.draw(overlay)?;
        canvas.save(&self.output)?;
        log::info!(
            "🖍️ Highlight snapshot with {} rectangle(s) saved to {} (shown {}ms)",
            overlay.rectangles().len(),
            self.output.display(),
            duration.as_millis()
        );
        Ok(())
    }
}
