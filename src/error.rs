//! Facilities for reporting errors at the host boundary of a node.

use crate::parse::ParseError;
use std::io;
use thiserror::Error;

//===========================================================================//

/// A specialized `Result` type for host-facing node operations.
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors that can occur while setting up or driving a simulated node.
///
/// The modeled hardware itself never fails; these errors only arise at the
/// host boundary (loading images, bounded waits in a test harness).
#[derive(Debug, Error)]
pub enum NodeError {
    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// A hex memory listing could not be parsed.
    #[error("{}", describe_parse_errors(.0))]
    Parse(Vec<ParseError>),
    /// An image holds more words than the node's memory.
    #[error("image holds {words} words, but memory only has {capacity}")]
    ImageTooLarge {
        /// The number of words in the image.
        words: usize,
        /// The number of words in memory.
        capacity: usize,
    },
    /// A binary image's length isn't a multiple of four bytes.
    #[error("image ends with a partial word ({0} trailing bytes)")]
    PartialWord(usize),
    /// A bounded wait gave up before its condition became true.
    #[error("condition not reached within {cycles} cycles")]
    Timeout {
        /// The number of clock cycles that were simulated before giving up.
        cycles: u64,
    },
}

impl From<Vec<ParseError>> for NodeError {
    fn from(errors: Vec<ParseError>) -> NodeError {
        NodeError::Parse(errors)
    }
}

fn describe_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|error| format!("parse error at {error}"))
        .collect::<Vec<String>>()
        .join("\n")
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::NodeError;
    use crate::parse::{ParseError, SrcSpan};

    #[test]
    fn display_parse_errors() {
        let errors = vec![
            ParseError::new(SrcSpan::from_byte_range(0..2), "foo".to_string()),
            ParseError::new(SrcSpan::from_byte_range(5..9), "bar".to_string()),
        ];
        assert_eq!(
            NodeError::from(errors).to_string(),
            "parse error at 0..2: foo\nparse error at 5..9: bar"
        );
    }

    #[test]
    fn display_timeout() {
        assert_eq!(
            NodeError::Timeout { cycles: 64 }.to_string(),
            "condition not reached within 64 cycles"
        );
    }
}

//===========================================================================//
