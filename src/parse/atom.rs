use super::lex::{Token, TokenLexer};
use super::types::ParseResult;

//===========================================================================//

/// The error type used for `chumsky::Parser`s in this crate.
pub(crate) type PError<'a> =
    chumsky::extra::Err<chumsky::error::Rich<'a, Token>>;

//===========================================================================//

/// Runs the lexer over the whole input, stopping at the first lexical error.
pub(crate) fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    TokenLexer::new(source).collect::<Result<_, _>>().map_err(|error| vec![error])
}

//===========================================================================//
