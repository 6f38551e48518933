use crate::pattern::Pattern;

/// What `verify`/`exists` look for: an image pattern or a piece of text
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Pattern(&'a Pattern),
    Text(&'a str),
}

impl Target<'_> {
    /// Target description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Target::Pattern(pattern) => pattern.describe(),
            Target::Text(text) => format!("text {text}"),
        }
    }
}

impl<'a> From<&'a Pattern> for Target<'a> {
    fn from(pattern: &'a Pattern) -> Self {
        Target::Pattern(pattern)
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(text: &'a str) -> Self {
        Target::Text(text)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(text: &'a String) -> Self {
        Target::Text(text.as_str())
    }
}
