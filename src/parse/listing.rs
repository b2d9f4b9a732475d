//! Facilities for parsing hex memory listings.

use super::atom::{PError, tokenize};
use super::lex::{Token, TokenValue};
use super::types::{ParseError, ParseResult, SrcSpan};
use chumsky::{self, IterParser, Parser};

//===========================================================================//

/// The abstract syntax tree for a hex memory listing, in the style of
/// `$readmemh` input files.
#[derive(Debug, Eq, PartialEq)]
pub struct ListingAst {
    /// The entries in the listing, in source order.
    pub entries: Vec<ListingEntryAst>,
}

impl ListingAst {
    /// Parses a hex memory listing.
    pub fn parse_source(source: &str) -> ParseResult<ListingAst> {
        let tokens = tokenize(source)?;
        ListingAst::parser()
            .parse(tokens.as_slice())
            .into_result()
            .map_err(|errors| {
                errors
                    .into_iter()
                    .map(|error| {
                        let span = match tokens.get(error.span().start) {
                            Some(token) => token.span,
                            None => tokens.last().map_or_else(
                                || SrcSpan::from_byte_range(0..0),
                                |token| token.span.end_span(),
                            ),
                        };
                        ParseError::new(span, error.reason().to_string())
                    })
                    .collect()
            })
    }

    fn parser<'a>() -> impl Parser<'a, &'a [Token], ListingAst, PError<'a>> {
        ListingEntryAst::parser()
            .repeated()
            .collect::<Vec<_>>()
            .map(|entries| ListingAst { entries })
    }
}

//===========================================================================//

/// One entry in a hex memory listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListingEntryAst {
    /// Moves the load cursor to the given word index.
    Origin(SrcSpan, u8),
    /// Stores a word at the load cursor, then advances the cursor.
    Word(SrcSpan, u32),
}

impl ListingEntryAst {
    /// Returns the location in the source code of this entry.
    pub fn span(&self) -> SrcSpan {
        match *self {
            ListingEntryAst::Origin(span, _) => span,
            ListingEntryAst::Word(span, _) => span,
        }
    }

    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], ListingEntryAst, PError<'a>> + Clone {
        chumsky::prelude::any()
            .validate(|token: Token, extra, emitter| match token.value {
                TokenValue::Origin(index) => match u8::try_from(index) {
                    Ok(index) => ListingEntryAst::Origin(token.span, index),
                    Err(_) => {
                        let message = format!(
                            "address @{index:x} is beyond the end of memory"
                        );
                        emitter.emit(chumsky::error::Rich::custom(
                            extra.span(),
                            message,
                        ));
                        ListingEntryAst::Origin(token.span, 0)
                    }
                },
                TokenValue::Word(word) => match u32::try_from(word) {
                    Ok(word) => ListingEntryAst::Word(token.span, word),
                    Err(_) => {
                        let message =
                            format!("hex word {word:x} is wider than 32 bits");
                        emitter.emit(chumsky::error::Rich::custom(
                            extra.span(),
                            message,
                        ));
                        ListingEntryAst::Word(token.span, 0)
                    }
                },
            })
            .labelled("listing entry")
    }
}

//===========================================================================//


//===========================================================================//
