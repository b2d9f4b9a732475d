use std::fmt;
use std::ops::Range;

//===========================================================================//

/// A span of byte offsets within a source file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SrcSpan {
    start: usize,
    end: usize,
}

impl SrcSpan {
    /// Constructs a span from the given the byte range.
    pub fn from_byte_range(range: Range<usize>) -> SrcSpan {
        assert!(range.start <= range.end);
        SrcSpan { start: range.start, end: range.end }
    }

    /// Returns the byte range represented by this span.
    pub fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub(crate) fn end_span(&self) -> SrcSpan {
        SrcSpan { start: self.end, end: self.end }
    }
}

impl fmt::Display for SrcSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

//===========================================================================//

/// A specialized `Result` type for parsing operations.
pub type ParseResult<V> = Result<V, Vec<ParseError>>;

//===========================================================================//

/// An error encountered while parsing a source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    /// The primary location in the file where the error occurred.
    pub span: SrcSpan,
    /// The error message to report to the user.
    pub message: String,
    /// Any additional label annotations for this error.
    pub labels: Vec<ParseErrorLabel>,
}

impl ParseError {
    /// Constructs a parse error with the given span and message, and other
    /// fields initially empty.
    pub fn new(span: SrcSpan, message: String) -> ParseError {
        ParseError { span, message, labels: Vec::new() }
    }

    /// Adds an additional label to the error.
    pub fn with_label(mut self, span: SrcSpan, message: String) -> ParseError {
        self.labels.push(ParseErrorLabel { span, message });
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)?;
        for label in self.labels.iter() {
            write!(f, " ({}: {})", label.span, label.message)?;
        }
        Ok(())
    }
}

//===========================================================================//

/// An additional label annotation for a [`ParseError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseErrorLabel {
    /// The location in the file to which the label applies.
    pub span: SrcSpan,
    /// The message to attach to the label.
    pub message: String,
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{ParseError, SrcSpan};

    #[test]
    fn end_span_is_empty() {
        let span = SrcSpan::from_byte_range(3..7);
        assert_eq!(span.byte_range(), 3..7);
        assert_eq!(span.end_span().byte_range(), 7..7);
    }

    #[test]
    fn display_with_labels() {
        let span = SrcSpan::from_byte_range(4..9);
        let other = SrcSpan::from_byte_range(0..3);
        let error = ParseError::new(span, "bad word".to_string())
            .with_label(other, "cursor set here".to_string());
        assert_eq!(error.to_string(), "4..9: bad word (0..3: cursor set here)");
    }
}

//===========================================================================//
