//! Matching collaborators used by the finder
//!
//! - [`Matcher`]: one-shot image search plus the polling waits built on it
//! - [`TextSearch`]: on-screen text lookup (OCR engines plug in here)
//! - [`TemplateMatcher`]: normalized cross-correlation matcher over a [`ScreenSource`]
//!
//! [`ScreenSource`]: crate::screen::ScreenSource

pub mod template;
pub mod wait;

pub use template::{Match, MatchConfig, TemplateMatcher};
pub use wait::poll_until;

use crate::error::FinderResult;
use crate::geometry::{Location, Region};
use crate::pattern::Pattern;
use crate::settings::DEFAULT_WAIT_SCAN_RATE;
use std::time::Duration;

/// Image pattern search on the current screen
pub trait Matcher {
    /// One pass; candidates above the pattern's similarity, best-first
    fn single(&self, pattern: &Pattern, region: Option<&Region>) -> FinderResult<Vec<Location>>;

    /// One pass; every match above the pattern's similarity
    fn multiple(&self, pattern: &Pattern, region: Option<&Region>)
    -> FinderResult<Vec<Location>>;

    /// Pause between attempts in the waiting operations
    fn scan_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / DEFAULT_WAIT_SCAN_RATE)
    }

    /// Poll until the pattern shows up; `None` on timeout
    fn wait_found(
        &self,
        pattern: &Pattern,
        timeout: Duration,
        region: Option<&Region>,
    ) -> FinderResult<Option<Location>> {
        poll_until(timeout, self.scan_interval(), || {
            Ok(self.single(pattern, region)?.into_iter().next())
        })
    }

    /// Poll until the pattern is gone; `false` if it is still there at the timeout
    fn wait_vanished(
        &self,
        pattern: &Pattern,
        timeout: Duration,
        region: Option<&Region>,
    ) -> FinderResult<bool> {
        let vanished = poll_until(timeout, self.scan_interval(), || {
            Ok(self.single(pattern, region)?.is_empty().then_some(()))
        })?;
        Ok(vanished.is_some())
    }
}

impl<M: Matcher + ?Sized> Matcher for &M {
    fn single(&self, pattern: &Pattern, region: Option<&Region>) -> FinderResult<Vec<Location>> {
        (**self).single(pattern, region)
    }

    fn multiple(
        &self,
        pattern: &Pattern,
        region: Option<&Region>,
    ) -> FinderResult<Vec<Location>> {
        (**self).multiple(pattern, region)
    }

    fn scan_interval(&self) -> Duration {
        (**self).scan_interval()
    }

    fn wait_found(
        &self,
        pattern: &Pattern,
        timeout: Duration,
        region: Option<&Region>,
    ) -> FinderResult<Option<Location>> {
        (**self).wait_found(pattern, timeout, region)
    }

    fn wait_vanished(
        &self,
        pattern: &Pattern,
        timeout: Duration,
        region: Option<&Region>,
    ) -> FinderResult<bool> {
        (**self).wait_vanished(pattern, timeout, region)
    }
}

/// Text lookup on the current screen
pub trait TextSearch {
    /// Find `text`; with `wait` set, keep looking for up to that long.
    /// `None` when the text was not found.
    fn find_text(
        &self,
        text: &str,
        wait: Option<Duration>,
        region: Option<&Region>,
    ) -> FinderResult<Option<Location>>;
}
