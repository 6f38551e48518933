pub mod error;
pub mod finder;
pub mod geometry;
pub mod highlight;
pub mod matching;
pub mod pattern;
pub mod screen;
pub mod settings;

pub use error::{FinderError, FinderResult, Miss};
pub use finder::{Finder, HighlightRequest, Target};
pub use geometry::{Location, Region};
pub use highlight::{Color, Highlighter, LogHighlighter, SnapshotHighlighter};
pub use matching::{Matcher, TemplateMatcher, TextSearch};
pub use pattern::Pattern;
pub use screen::{ScreenSource, StaticScreen};
pub use settings::Settings;
