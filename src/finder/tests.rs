//! Tests for the finder operations
//
// Scripted collaborators drive the coordination logic; the scenario tests at
// the bottom run the real template matcher on synthetic screens.

use crate::error::{FinderError, FinderResult, Miss};
use crate::finder::{Finder, HighlightRequest};
use crate::geometry::{Location, Region};
use crate::highlight::{Color, Highlighter, Overlay};
use crate::matching::{Matcher, TemplateMatcher, TextSearch};
use crate::pattern::Pattern;
use crate::screen::{ReplayScreen, StaticScreen};
use crate::settings::Settings;
use image::{GrayImage, Luma};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ============================================================
// SCRIPTED COLLABORATORS
// ============================================================

/// Matcher answering one-shot lookups with a fixed result and waits with scripted outcomes
#[derive(Default)]
struct ScriptedMatcher {
    found: Vec<Location>,
    wait_found: RefCell<VecDeque<FinderResult<Option<Location>>>>,
    vanished: Option<bool>,
    single_calls: Cell<usize>,
    multiple_calls: Cell<usize>,
    last_timeout: Cell<Option<Duration>>,
    last_region: Cell<Option<Region>>,
}

impl ScriptedMatcher {
    fn finding(found: Vec<Location>) -> Self {
        Self {
            found,
            ..Self::default()
        }
    }

    fn waiting(outcome: FinderResult<Option<Location>>) -> Self {
        let matcher = Self::default();
        matcher.wait_found.borrow_mut().push_back(outcome);
        matcher
    }

    fn vanishing(vanished: bool) -> Self {
        Self {
            vanished: Some(vanished),
            ..Self::default()
        }
    }
}

impl Matcher for ScriptedMatcher {
    fn single(&self, _pattern: &Pattern, region: Option<&Region>) -> FinderResult<Vec<Location>> {
        self.single_calls.set(self.single_calls.get() + 1);
        self.last_region.set(region.copied());
        Ok(self.found.iter().take(1).copied().collect())
    }

    fn multiple(
        &self,
        _pattern: &Pattern,
        region: Option<&Region>,
    ) -> FinderResult<Vec<Location>> {
        self.multiple_calls.set(self.multiple_calls.get() + 1);
        self.last_region.set(region.copied());
        Ok(self.found.clone())
    }

    fn wait_found(
        &self,
        _pattern: &Pattern,
        timeout: Duration,
        region: Option<&Region>,
    ) -> FinderResult<Option<Location>> {
        self.last_timeout.set(Some(timeout));
        self.last_region.set(region.copied());
        self.wait_found
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(None))
    }

    fn wait_vanished(
        &self,
        _pattern: &Pattern,
        timeout: Duration,
        _region: Option<&Region>,
    ) -> FinderResult<bool> {
        self.last_timeout.set(Some(timeout));
        Ok(self.vanished.unwrap_or(true))
    }
}

#[derive(Default)]
struct RecordingHighlighter {
    rendered: RefCell<Vec<(Overlay, Duration)>>,
}

impl Highlighter for RecordingHighlighter {
    fn render(&self, overlay: &Overlay, duration: Duration) -> FinderResult<()> {
        self.rendered.borrow_mut().push((overlay.clone(), duration));
        Ok(())
    }
}

/// Text search that knows a fixed set of words
struct ScriptedText {
    known: Vec<(&'static str, Location)>,
    waits: WaitLog,
}

impl TextSearch for ScriptedText {
    fn find_text(
        &self,
        text: &str,
        wait: Option<Duration>,
        _region: Option<&Region>,
    ) -> FinderResult<Option<Location>> {
        self.waits.borrow_mut().push(wait);
        Ok(self
            .known
            .iter()
            .find(|(known, _)| *known == text)
            .map(|(_, loc)| *loc))
    }
}

type WaitLog = Rc<RefCell<Vec<Option<Duration>>>>;

fn scripted_text(known: Vec<(&'static str, Location)>) -> (ScriptedText, WaitLog) {
    let waits = Rc::new(RefCell::new(Vec::new()));
    (
        ScriptedText {
            known,
            waits: Rc::clone(&waits),
        },
        waits,
    )
}

fn button() -> GrayImage {
    GrayImage::from_fn(40, 20, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 { Luma([230]) } else { Luma([10]) }
    })
}

fn pattern() -> Pattern {
    Pattern::from_gray("button.png", button()).unwrap().similar(0.9)
}

fn settings() -> Settings {
    Settings::quick().with_highlight_duration(Duration::from_millis(1))
}

// ============================================================
// FIND / FIND_ALL
// ============================================================

#[test]
fn test_find_returns_first_match() {
    let matcher = ScriptedMatcher::finding(vec![Location::new(100, 100), Location::new(300, 50)]);
    let finder = Finder::new(&matcher, settings());

    let region = Region::new(0, 0, 800, 600);
    let found = finder.find(&pattern(), Some(&region)).unwrap();

    assert_eq!(found, Location::new(100, 100));
    assert_eq!(matcher.single_calls.get(), 1, "find must be a single pass");
    assert_eq!(matcher.last_region.get(), Some(region));
}

#[test]
fn test_find_without_match_names_the_pattern() {
    let matcher = ScriptedMatcher::finding(Vec::new());
    let finder = Finder::new(&matcher, settings());

    let err = finder.find(&pattern(), None).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Unable to find image button.png");
}

#[test]
fn test_find_all_returns_full_sequence() {
    let locations = vec![Location::new(300, 50), Location::new(100, 100)];
    let matcher = ScriptedMatcher::finding(locations.clone());
    let finder = Finder::new(&matcher, settings());

    assert_eq!(finder.find_all(&pattern(), None).unwrap(), locations);
    assert_eq!(matcher.multiple_calls.get(), 1);
}

#[test]
fn test_find_all_without_match_is_not_found() {
    let matcher = ScriptedMatcher::finding(Vec::new());
    let finder = Finder::new(&matcher, settings());

    let err = finder.find_all(&pattern(), None).unwrap_err();
    assert!(matches!(
        err,
        FinderError::NotFound { ref target, miss: Miss::Absent } if target == "image button.png"
    ));
}

#[test]
fn test_find_highlights_matches_when_enabled() {
    let matcher = ScriptedMatcher::finding(vec![Location::new(100, 100), Location::new(300, 50)]);
    let highlighter = RecordingHighlighter::default();
    let finder =
        Finder::new(&matcher, settings().with_highlight(true)).with_highlighter(&highlighter);

    let region = Region::new(0, 0, 800, 600);
    finder.find_all(&pattern(), Some(&region)).unwrap();

    let rendered = highlighter.rendered.borrow();
    assert_eq!(rendered.len(), 1);
    let (overlay, duration) = &rendered[0];
    assert_eq!(*duration, Duration::from_millis(1));

    let rects = overlay.rectangles();
    assert_eq!(rects.len(), 3);
    assert_eq!(rects[0].region, region);
    assert_eq!(rects[0].label.as_deref(), Some("Region"));
    assert_eq!(rects[1].region, Region::new(100, 100, 40, 20));
    assert_eq!(rects[2].region, Region::new(300, 50, 40, 20));
    assert!(rects.iter().all(|r| r.color == Color::Red));
}

#[test]
fn test_no_highlight_when_disabled() {
    let matcher = ScriptedMatcher::finding(vec![Location::new(100, 100)]);
    let highlighter = RecordingHighlighter::default();
    let finder = Finder::new(&matcher, settings()).with_highlighter(&highlighter);

    finder.find(&pattern(), None).unwrap();
    assert!(highlighter.rendered.borrow().is_empty());
}

// ============================================================
// VERIFY / EXISTS / WAIT
// ============================================================

#[test]
fn test_verify_pattern_uses_default_timeout() {
    let matcher = ScriptedMatcher::waiting(Ok(Some(Location::new(5, 5))));
    let settings = settings().with_auto_wait_timeout(Duration::from_secs(7));
    let finder = Finder::new(&matcher, settings);

    assert!(finder.verify(&pattern(), None, None).unwrap());
    assert_eq!(matcher.last_timeout.get(), Some(Duration::from_secs(7)));
}

#[test]
fn test_verify_pattern_explicit_timeout_wins() {
    let matcher = ScriptedMatcher::waiting(Ok(Some(Location::new(5, 5))));
    let finder = Finder::new(&matcher, settings());

    finder
        .verify(&pattern(), Some(Duration::from_millis(1500)), None)
        .unwrap();
    assert_eq!(matcher.last_timeout.get(), Some(Duration::from_millis(1500)));
}

#[test]
fn test_verify_pattern_timeout_is_not_found() {
    let matcher = ScriptedMatcher::waiting(Ok(None));
    let finder = Finder::new(&matcher, settings());

    let err = finder.verify(&pattern(), None, None).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_wait_returns_location() {
    let matcher = ScriptedMatcher::waiting(Ok(Some(Location::new(42, 24))));
    let finder = Finder::new(&matcher, settings());

    assert_eq!(
        finder.wait(&pattern(), None, None).unwrap(),
        Location::new(42, 24)
    );
}

#[test]
fn test_verify_text_passes_timeout_to_text_search() {
    let (text, waits) = scripted_text(vec![("OK", Location::new(10, 10))]);
    let matcher = ScriptedMatcher::default();
    let finder = Finder::new(&matcher, settings()).with_text_search(text);

    assert!(finder.verify("OK", None, None).unwrap());
    assert_eq!(
        waits.borrow().as_slice(),
        &[Some(Settings::quick().auto_wait_timeout)]
    );
}

#[test]
fn test_verify_text_not_found() {
    let (text, _) = scripted_text(vec![("OK", Location::new(10, 10))]);
    let matcher = ScriptedMatcher::default();
    let finder = Finder::new(&matcher, settings()).with_text_search(text);

    let wanted = String::from("Cancel");
    let err = finder.verify(&wanted, None, None).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Unable to find text Cancel");
}

#[test]
fn test_verify_unsearchable_targets_are_invalid_arguments() {
    let matcher = ScriptedMatcher::default();
    let finder = Finder::new(&matcher, settings());

    // No text backend configured
    let err = finder.verify("OK", None, None).unwrap_err();
    assert!(matches!(err, FinderError::InvalidArgument { .. }));

    let (text, waits) = scripted_text(Vec::new());
    let finder = Finder::new(&matcher, settings()).with_text_search(text);

    let err = finder.verify("  ", None, None).unwrap_err();
    assert!(matches!(err, FinderError::InvalidArgument { .. }));

    let err = finder
        .verify("OK", None, Some(&Region::new(0, 0, 0, 0)))
        .unwrap_err();
    assert!(matches!(err, FinderError::InvalidArgument { .. }));

    assert!(waits.borrow().is_empty(), "text search must not run");
}

#[test]
fn test_exists_converts_not_found_to_false() {
    let matcher = ScriptedMatcher::waiting(Ok(None));
    let finder = Finder::new(&matcher, settings());
    assert!(!finder.exists(&pattern(), None, None).unwrap());

    let matcher = ScriptedMatcher::waiting(Ok(Some(Location::new(1, 1))));
    let finder = Finder::new(&matcher, settings());
    assert!(finder.exists(&pattern(), None, None).unwrap());
}

#[test]
fn test_exists_uses_default_timeout() {
    let matcher = ScriptedMatcher::waiting(Ok(None));
    let settings = settings().with_auto_wait_timeout(Duration::from_secs(4));
    let finder = Finder::new(&matcher, settings);

    assert!(!finder.exists(&pattern(), None, None).unwrap());
    assert_eq!(matcher.last_timeout.get(), Some(Duration::from_secs(4)));
}

#[test]
fn test_exists_text_not_found_is_false() {
    let (text, waits) = scripted_text(vec![("OK", Location::new(10, 10))]);
    let matcher = ScriptedMatcher::default();
    let finder = Finder::new(&matcher, settings()).with_text_search(text);

    assert!(!finder.exists("Cancel", None, None).unwrap());
    assert!(finder.exists("OK", None, None).unwrap());
    let default_wait = Some(finder.settings().auto_wait_timeout);
    assert_eq!(waits.borrow().as_slice(), &[default_wait, default_wait]);
}

#[test]
fn test_exists_propagates_other_errors() {
    let matcher = ScriptedMatcher::waiting(Err(FinderError::Capture {
        description: "device gone".to_string(),
    }));
    let finder = Finder::new(&matcher, settings());
    let err = finder.exists(&pattern(), None, None).unwrap_err();
    assert!(matches!(err, FinderError::Capture { .. }));

    let finder = Finder::new(&matcher, settings());
    let err = finder.exists("OK", None, None).unwrap_err();
    assert!(matches!(err, FinderError::InvalidArgument { .. }));
}

#[test]
fn test_exists_agrees_with_verify() {
    for outcome in [None, Some(Location::new(3, 4))] {
        let verify_matcher = ScriptedMatcher::waiting(Ok(outcome));
        let exists_matcher = ScriptedMatcher::waiting(Ok(outcome));
        let verified = Finder::new(&verify_matcher, settings()).verify(&pattern(), None, None);
        let exists = Finder::new(&exists_matcher, settings())
            .exists(&pattern(), None, None)
            .unwrap();
        assert_eq!(exists, verified.is_ok());
    }
}

// ============================================================
// WAIT_VANISH / HIGHLIGHT
// ============================================================

#[test]
fn test_wait_vanish_success() {
    let matcher = ScriptedMatcher::vanishing(true);
    let finder = Finder::new(&matcher, settings());
    assert!(
        finder
            .wait_vanish(&pattern(), Some(Duration::from_secs(5)), None)
            .unwrap()
    );
    assert_eq!(matcher.last_timeout.get(), Some(Duration::from_secs(5)));
}

#[test]
fn test_wait_vanish_timeout_names_pattern() {
    let matcher = ScriptedMatcher::vanishing(false);
    let finder = Finder::new(&matcher, settings());
    let err = finder.wait_vanish(&pattern(), None, None).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        FinderError::NotFound {
            miss: Miss::StillPresent,
            ..
        }
    ));
    assert_eq!(err.to_string(), "button.png did not vanish");
    assert_eq!(
        matcher.last_timeout.get(),
        Some(finder.settings().auto_wait_timeout)
    );
}

#[test]
fn test_highlight_blocks_for_duration() {
    let matcher = ScriptedMatcher::default();
    let highlighter = RecordingHighlighter::default();
    let finder = Finder::new(&matcher, settings()).with_highlighter(&highlighter);

    let start = Instant::now();
    finder
        .highlight(
            HighlightRequest::region(Region::new(0, 0, 100, 100))
                .with_duration(Duration::from_millis(80))
                .with_color(Color::Blue),
        )
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(80));

    let rendered = highlighter.rendered.borrow();
    let (overlay, duration) = &rendered[0];
    assert_eq!(*duration, Duration::from_millis(80));
    assert_eq!(overlay.rectangles()[0].color, Color::Blue);
}

#[test]
fn test_highlight_uses_settings_defaults() {
    let matcher = ScriptedMatcher::default();
    let highlighter = RecordingHighlighter::default();
    let settings = settings().with_highlight_color(Color::Yellow);
    let finder = Finder::new(&matcher, settings).with_highlighter(&highlighter);

    let p = pattern();
    let locations = [Location::new(1, 2), Location::new(50, 60)];
    finder
        .highlight(HighlightRequest::matches(&p, &locations))
        .unwrap();

    let rendered = highlighter.rendered.borrow();
    let (overlay, duration) = &rendered[0];
    assert_eq!(*duration, Duration::from_millis(1));
    assert_eq!(overlay.rectangles().len(), 2);
    assert_eq!(overlay.rectangles()[1].region, Region::new(50, 60, 40, 20));
    assert!(overlay.rectangles().iter().all(|r| r.color == Color::Yellow));
}

// ============================================================
// SCENARIOS WITH THE TEMPLATE MATCHER
// ============================================================

fn screen_with(at: &[(u32, u32)]) -> GrayImage {
    screen_sized(400, 300, at)
}

fn screen_sized(width: u32, height: u32, at: &[(u32, u32)]) -> GrayImage {
    let mut screen = GrayImage::from_pixel(width, height, Luma([60]));
    for &(x, y) in at {
        image::imageops::replace(&mut screen, &button(), x as i64, y as i64);
    }
    screen
}

#[test]
fn test_scenario_single_button() {
    let screen = StaticScreen::new(screen_sized(800, 600, &[(100, 100)]));
    let matcher = TemplateMatcher::with_settings(screen, &settings());
    let finder = Finder::new(matcher, settings());
    let region = Region::new(0, 0, 800, 600);

    assert_eq!(
        finder.find(&pattern(), Some(&region)).unwrap(),
        Location::new(100, 100)
    );
    assert_eq!(
        finder.find_all(&pattern(), Some(&region)).unwrap(),
        vec![Location::new(100, 100)]
    );
}

#[test]
fn test_scenario_find_is_first_of_find_all() {
    let screen = screen_with(&[(300, 200), (100, 100), (200, 250)]);
    let matcher = TemplateMatcher::with_settings(StaticScreen::new(screen), &settings());
    let finder = Finder::new(matcher, settings());

    let all = finder.find_all(&pattern(), None).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(finder.find(&pattern(), None).unwrap(), all[0]);
    assert_eq!(finder.find_all(&pattern(), None).unwrap(), all);
}

#[test]
fn test_scenario_missing_button_times_out() {
    let matcher =
        TemplateMatcher::with_settings(StaticScreen::new(screen_with(&[])), &settings());
    let finder = Finder::new(matcher, settings());
    let timeout = Duration::from_millis(200);

    let start = Instant::now();
    let err = finder.verify(&pattern(), Some(timeout), None).unwrap_err();
    assert!(err.is_not_found());
    assert!(start.elapsed() >= timeout);

    let start = Instant::now();
    assert!(!finder.exists(&pattern(), Some(timeout), None).unwrap());
    assert!(start.elapsed() >= timeout);

    assert!(finder.find(&pattern(), None).unwrap_err().is_not_found());
    assert!(finder.find_all(&pattern(), None).unwrap_err().is_not_found());
}

#[test]
fn test_scenario_button_vanishes_mid_wait() {
    let frames = vec![
        screen_with(&[(100, 100)]),
        screen_with(&[(100, 100)]),
        screen_with(&[]),
    ];
    let screen = ReplayScreen::new(frames).unwrap();
    let matcher = TemplateMatcher::with_settings(&screen, &settings());
    let finder = Finder::new(matcher, settings());

    let start = Instant::now();
    assert!(
        finder
            .wait_vanish(&pattern(), Some(Duration::from_secs(5)), None)
            .unwrap()
    );
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_scenario_button_stays() {
    let matcher =
        TemplateMatcher::with_settings(StaticScreen::new(screen_with(&[(100, 100)])), &settings());
    let finder = Finder::new(matcher, settings());

    let err = finder
        .wait_vanish(&pattern(), Some(Duration::from_millis(100)), None)
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "button.png did not vanish");
}

#[test]
fn test_scenario_invalid_region_is_not_a_find_failure() {
    let matcher =
        TemplateMatcher::with_settings(StaticScreen::new(screen_with(&[(100, 100)])), &settings());
    let finder = Finder::new(matcher, settings());

    let outside = Region::new(1000, 1000, 10, 10);
    let err = finder.exists(&pattern(), None, Some(&outside)).unwrap_err();
    assert!(matches!(err, FinderError::InvalidArgument { .. }));
}
