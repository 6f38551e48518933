//! Finder operations: one lookup or wait, optional highlight, uniform errors

use super::target::Target;
use crate::error::{FinderError, FinderResult};
use crate::geometry::{Location, Region};
use crate::highlight::{Color, HighlightRect, Highlighter, LogHighlighter, Overlay};
use crate::matching::{Matcher, TextSearch};
use crate::pattern::Pattern;
use crate::settings::Settings;
use std::time::Duration;

/// What to draw in [`Finder::highlight`]
#[derive(Debug, Clone, Default)]
pub struct HighlightRequest<'a> {
    region: Option<Region>,
    matches: Option<(&'a Pattern, &'a [Location])>,
    duration: Option<Duration>,
    color: Option<Color>,
}

impl<'a> HighlightRequest<'a> {
    /// Highlight a whole region, labelled "Region"
    pub fn region(region: Region) -> Self {
        Self {
            region: Some(region),
            ..Self::default()
        }
    }

    /// Highlight a pattern-sized box at every location
    pub fn matches(pattern: &'a Pattern, locations: &'a [Location]) -> Self {
        Self {
            matches: Some((pattern, locations)),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Locates patterns and text on screen through the configured collaborators.
///
/// Every operation runs synchronously on the calling thread. Waits end on
/// success or timeout, highlights block for their duration.
pub struct Finder<M, H = LogHighlighter> {
    matcher: M,
    highlighter: H,
    text_search: Option<Box<dyn TextSearch>>,
    settings: Settings,
}

impl<M: Matcher> Finder<M> {
    pub fn new(matcher: M, settings: Settings) -> Self {
        Self {
            matcher,
            highlighter: LogHighlighter,
            text_search: None,
            settings,
        }
    }
}

impl<M: Matcher, H: Highlighter> Finder<M, H> {
    /// Replace the highlight backend
    pub fn with_highlighter<H2: Highlighter>(self, highlighter: H2) -> Finder<M, H2> {
        Finder {
            matcher: self.matcher,
            highlighter,
            text_search: self.text_search,
            settings: self.settings,
        }
    }

    /// Enable text targets in `verify`/`exists`
    pub fn with_text_search(mut self, text_search: impl TextSearch + 'static) -> Self {
        self.text_search = Some(Box::new(text_search));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Look for the best match of a pattern, one pass, no waiting
    pub fn find(&self, pattern: &Pattern, region: Option<&Region>) -> FinderResult<Location> {
        let found = self.matcher.single(pattern, region)?;
        let Some(&first) = found.first() else {
            log::debug!("No match for {}", pattern.name());
            return Err(FinderError::not_found(pattern.describe()));
        };

        log::info!("Found {} at {}", pattern.name(), first);
        self.highlight_found(pattern, region, &found)?;
        Ok(first)
    }

    /// Look for every match of a pattern, one pass, no waiting
    pub fn find_all(
        &self,
        pattern: &Pattern,
        region: Option<&Region>,
    ) -> FinderResult<Vec<Location>> {
        let found = self.matcher.multiple(pattern, region)?;
        if found.is_empty() {
            log::debug!("No match for {}", pattern.name());
            return Err(FinderError::not_found(pattern.describe()));
        }

        log::info!("Found {} match(es) of {}", found.len(), pattern.name());
        self.highlight_found(pattern, region, &found)?;
        Ok(found)
    }

    /// Wait for a pattern to appear and return where it was found
    pub fn wait(
        &self,
        pattern: &Pattern,
        timeout: Option<Duration>,
        region: Option<&Region>,
    ) -> FinderResult<Location> {
        let timeout = timeout.unwrap_or(self.settings.auto_wait_timeout);
        match self.matcher.wait_found(pattern, timeout, region)? {
            Some(location) => {
                log::info!("Found {} at {}", pattern.name(), location);
                self.highlight_found(pattern, region, &[location])?;
                Ok(location)
            }
            None => {
                log::warn!(
                    "⏱️ {} not found within {}ms",
                    pattern.name(),
                    timeout.as_millis()
                );
                Err(FinderError::not_found(pattern.describe()))
            }
        }
    }

    /// Wait until a pattern or text appears.
    ///
    /// Returns `Ok(true)` when found, `NotFound` on timeout and
    /// `InvalidArgument` for a target that cannot be searched for.
    pub fn verify<'t>(
        &self,
        target: impl Into<Target<'t>>,
        timeout: Option<Duration>,
        region: Option<&Region>,
    ) -> FinderResult<bool> {
        let timeout = timeout.unwrap_or(self.settings.auto_wait_timeout);
        match target.into() {
            Target::Pattern(pattern) => {
                self.wait(pattern, Some(timeout), region)?;
                Ok(true)
            }
            target @ Target::Text(text) => {
                if text.trim().is_empty() {
                    return Err(FinderError::invalid_argument("text target is empty"));
                }
                if let Some(region) = region
                    && !region.is_valid()
                {
                    return Err(FinderError::invalid_argument(format!(
                        "search region {region} has zero size"
                    )));
                }
                let Some(text_search) = &self.text_search else {
                    return Err(FinderError::invalid_argument(
                        "text targets need a text search backend",
                    ));
                };

                match text_search.find_text(text, Some(timeout), region)? {
                    Some(location) => {
                        log::info!("Found text '{}' at {}", text, location);
                        Ok(true)
                    }
                    None => {
                        log::warn!(
                            "⏱️ Text '{}' not found within {}ms",
                            text,
                            timeout.as_millis()
                        );
                        Err(FinderError::not_found(target.describe()))
                    }
                }
            }
        }
    }

    /// Like [`verify`](Self::verify), but a target that did not show up is `Ok(false)`
    pub fn exists<'t>(
        &self,
        target: impl Into<Target<'t>>,
        timeout: Option<Duration>,
        region: Option<&Region>,
    ) -> FinderResult<bool> {
        match self.verify(target, timeout, region) {
            Ok(found) => Ok(found),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Wait until a pattern is no longer on screen
    pub fn wait_vanish(
        &self,
        pattern: &Pattern,
        timeout: Option<Duration>,
        region: Option<&Region>,
    ) -> FinderResult<bool> {
        let timeout = timeout.unwrap_or(self.settings.auto_wait_timeout);
        if self.matcher.wait_vanished(pattern, timeout, region)? {
            log::info!("{} vanished", pattern.name());
            Ok(true)
        } else {
            log::warn!(
                "⏱️ {} still present after {}ms",
                pattern.name(),
                timeout.as_millis()
            );
            Err(FinderError::not_vanished(pattern.name()))
        }
    }

    /// Show a highlight and block until its duration has passed
    pub fn highlight(&self, request: HighlightRequest<'_>) -> FinderResult<()> {
        let color = request.color.unwrap_or(self.settings.highlight_color);
        let duration = request
            .duration
            .unwrap_or(self.settings.highlight_duration);

        let mut overlay = Overlay::new();
        if let Some(region) = request.region {
            overlay.draw_rectangle(HighlightRect::new(region, color).with_label("Region"));
        }
        if let Some((pattern, locations)) = request.matches {
            let (width, height) = pattern.size();
            for &location in locations {
                overlay.draw_rectangle(HighlightRect::new(
                    Region::at(location, width, height),
                    color,
                ));
            }
        }

        self.highlighter.render(&overlay, duration)?;
        // Keep the caller here so the overlay is seen before control returns
        std::thread::sleep(duration);
        Ok(())
    }

    fn highlight_found(
        &self,
        pattern: &Pattern,
        region: Option<&Region>,
        locations: &[Location],
    ) -> FinderResult<()> {
        if !self.settings.highlight_enabled {
            return Ok(());
        }
        self.highlight(HighlightRequest::matches(pattern, locations).with_region(region.copied()))
    }
}
