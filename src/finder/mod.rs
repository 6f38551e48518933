//! Public finder API: find, find_all, wait, verify, exists, wait_vanish, highlight

pub mod api;
pub mod target;

#[cfg(test)]
mod tests;

pub use api::{Finder, HighlightRequest};
pub use target::Target;
