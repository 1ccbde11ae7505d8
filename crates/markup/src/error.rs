use markdown::message::{Message, Place};
use thiserror::Error;

/// Failure of the strict content parser.
///
/// The forgiving entry points never surface this; they fall back to text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {line}:{column}: {message}")]
pub struct ContentParseError {
    /// Parser message
    pub message: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl ContentParseError {
    /// Creates an error at a location.
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    pub(crate) fn from_message(message: &Message) -> Self {
        let (line, column) = match &message.place {
            Some(place) => match place.as_ref() {
                Place::Point(point) => (point.line, point.column),
                Place::Position(position) => (position.start.line, position.start.column),
            },
            None => (1, 1),
        };
        Self::new(message.reason.clone(), line, column)
    }
}

impl From<lol_html::errors::RewritingError> for ContentParseError {
    fn from(err: lol_html::errors::RewritingError) -> Self {
        Self::new(err.to_string(), 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = ContentParseError::new("Unexpected closing tag", 2, 5);
        assert_eq!(err.to_string(), "Parse error at 2:5: Unexpected closing tag");
    }
}
