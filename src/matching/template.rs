//! Template matching implementation
//!
//! Normalized cross-correlation over a captured screen, restricted to a search
//! region, with overlapping hits collapsed to the best one.

use super::Matcher;
use crate::error::{FinderError, FinderResult};
use crate::geometry::{Location, Region};
use crate::pattern::Pattern;
use crate::screen::ScreenSource;
use crate::settings::Settings;
use image::GrayImage;
use imageproc::template_matching::{MatchTemplateMethod, match_template};
use std::time::Duration;

/// A single match result
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Top-left corner of the matched window in screen coordinates
    pub location: Location,
    /// Correlation score (0.0-1.0)
    pub score: f32,
}

impl Match {
    /// Format match as string with correlation percentage
    pub fn describe(&self, pattern: &Pattern) -> String {
        let correlation_pct = (self.score * 100.0) as u32;
        format!(
            "{} at {} - {}%",
            pattern.name(),
            self.location,
            correlation_pct
        )
    }
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Similarity threshold for patterns without their own (0.0 to 1.0)
    pub confidence_threshold: f32,
    /// Pause between attempts while waiting
    pub scan_interval: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl MatchConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            confidence_threshold: settings.min_similarity,
            scan_interval: settings.scan_interval(),
        }
    }
}

/// Template matcher for finding patterns on a screen source
pub struct TemplateMatcher<S> {
    screen: S,
    config: MatchConfig,
}

impl<S: ScreenSource> TemplateMatcher<S> {
    pub fn new(screen: S, config: MatchConfig) -> Self {
        Self { screen, config }
    }

    pub fn with_settings(screen: S, settings: &Settings) -> Self {
        Self::new(screen, MatchConfig::from_settings(settings))
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find matches with their scores, best-first, at most `limit`
    ///
    /// Ties on score are ordered top-to-bottom, then left-to-right, so the
    /// order is stable for an unchanged screen.
    pub fn matches(
        &self,
        pattern: &Pattern,
        region: Option<&Region>,
        limit: usize,
    ) -> FinderResult<Vec<Match>> {
        let screen = self.screen.capture()?;
        self.matches_in(&screen, pattern, region, limit)
    }

    fn matches_in(
        &self,
        screen: &GrayImage,
        pattern: &Pattern,
        region: Option<&Region>,
        limit: usize,
    ) -> FinderResult<Vec<Match>> {
        let area = resolve_search_area(region, screen.width(), screen.height())?;
        let (pattern_width, pattern_height) = pattern.size();

        // Skip if pattern is larger than search area
        if pattern_width > area.width || pattern_height > area.height {
            log::debug!(
                "Pattern {} ({}x{}) larger than search area {}",
                pattern.name(),
                pattern_width,
                pattern_height,
                area
            );
            return Ok(Vec::new());
        }

        let threshold = pattern
            .min_similarity()
            .unwrap_or(self.config.confidence_threshold);

        log::debug!(
            "🔍 Matching {} ({}x{}) in {} with threshold {:.2}",
            pattern.name(),
            pattern_width,
            pattern_height,
            area,
            threshold
        );

        let cropped =
            image::imageops::crop_imm(screen, area.x, area.y, area.width, area.height).to_image();
        let scores = match_template(
            &cropped,
            pattern.image(),
            MatchTemplateMethod::CrossCorrelationNormalized,
        );

        let mut candidates: Vec<Match> = scores
            .enumerate_pixels()
            .filter_map(|(x, y, pixel)| {
                let score = pixel[0];
                // Flat (all black) windows give NaN
                (score.is_finite() && score >= threshold).then(|| Match {
                    location: Location::new(area.x + x, area.y + y),
                    score: score.min(1.0),
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.location.y.cmp(&b.location.y))
                .then_with(|| a.location.x.cmp(&b.location.x))
        });

        let matches = suppress_overlaps(candidates, pattern_width, pattern_height, limit);

        for m in &matches {
            log::debug!("  ✅ {}", m.describe(pattern));
        }

        Ok(matches)
    }
}

/// Greedy non-maximum suppression over best-first candidates: a window that
/// overlaps an already kept window is the same on-screen object.
fn suppress_overlaps(candidates: Vec<Match>, width: u32, height: u32, limit: usize) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::new();
    for candidate in candidates {
        if kept.len() >= limit {
            break;
        }
        let window = Region::at(candidate.location, width, height);
        if kept
            .iter()
            .all(|k| !Region::at(k.location, width, height).overlaps(&window))
        {
            kept.push(candidate);
        }
    }
    kept
}

/// The on-screen part of the requested region (full screen when none given)
fn resolve_search_area(
    region: Option<&Region>,
    screen_width: u32,
    screen_height: u32,
) -> FinderResult<Region> {
    let Some(region) = region else {
        return Ok(Region::full_screen(screen_width, screen_height));
    };
    if !region.is_valid() {
        return Err(FinderError::invalid_argument(format!(
            "search region {region} has zero size"
        )));
    }
    region.clip_to(screen_width, screen_height).ok_or_else(|| {
        FinderError::invalid_argument(format!(
            "search region {region} lies outside the {screen_width}x{screen_height} screen"
        ))
    })
}

impl<S: ScreenSource> Matcher for TemplateMatcher<S> {
    fn single(&self, pattern: &Pattern, region: Option<&Region>) -> FinderResult<Vec<Location>> {
        Ok(self
            .matches(pattern, region, 1)?
            .into_iter()
            .map(|m| m.location)
            .collect())
    }

    fn multiple(
        &self,
        pattern: &Pattern,
        region: Option<&Region>,
    ) -> FinderResult<Vec<Location>> {
        Ok(self
            .matches(pattern, region, usize::MAX)?
            .into_iter()
            .map(|m| m.location)
            .collect())
    }

    fn scan_interval(&self) -> Duration {
        self.config.scan_interval
    }
}
