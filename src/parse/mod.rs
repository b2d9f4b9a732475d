//! Facilities for parsing hex memory listings.

mod atom;
mod lex;
mod listing;
mod types;

pub use lex::{Token, TokenLexer, TokenValue};
pub use listing::{ListingAst, ListingEntryAst};
pub use types::{ParseError, ParseErrorLabel, ParseResult, SrcSpan};

//===========================================================================//
