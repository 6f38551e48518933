use thiserror::Error;

/// A specialized `Result` type for finder operations.
pub type FinderResult<T> = Result<T, FinderError>;

/// What a failed find was waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// The target never showed up
    Absent,
    /// The target was still on screen when the wait ended
    StillPresent,
}

fn not_found_message(target: &str, miss: &Miss) -> String {
    match miss {
        Miss::Absent => format!("Unable to find {target}"),
        Miss::StillPresent => format!("{target} did not vanish"),
    }
}

/// The error type for all finder operations.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("{}", not_found_message(.target, .miss))]
    NotFound { target: String, miss: Miss },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Image load/save failed: {source}")]
    Image {
        #[from]
        source: image::ImageError,
    },

    #[error("Screen capture failed: {description}")]
    Capture { description: String },

    #[error("Highlight rendering failed: {description}")]
    Highlight { description: String },
}

impl FinderError {
    pub fn not_found(target: impl Into<String>) -> Self {
        FinderError::NotFound {
            target: target.into(),
            miss: Miss::Absent,
        }
    }

    /// Not found flavour for a target that would not go away
    pub fn not_vanished(target: impl Into<String>) -> Self {
        FinderError::NotFound {
            target: target.into(),
            miss: Miss::StillPresent,
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        FinderError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Check if this error is a find outcome (not located, or did not vanish)
    /// rather than a failure of the caller or of a backend
    pub fn is_not_found(&self) -> bool {
        matches!(self, FinderError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_target() {
        assert_eq!(
            FinderError::not_found("image button.png").to_string(),
            "Unable to find image button.png"
        );
        assert_eq!(
            FinderError::not_vanished("button.png").to_string(),
            "button.png did not vanish"
        );
    }

    #[test]
    fn test_error_classification() {
        let not_found = FinderError::not_found("text OK");
        assert!(not_found.is_not_found());

        let not_vanished = FinderError::not_vanished("spinner.png");
        assert!(not_vanished.is_not_found());
        assert!(matches!(
            not_vanished,
            FinderError::NotFound {
                miss: Miss::StillPresent,
                ..
            }
        ));

        let invalid = FinderError::invalid_argument("empty text");
        assert!(!invalid.is_not_found());
    }
}
