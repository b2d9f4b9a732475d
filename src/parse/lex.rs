use super::types::{ParseError, SrcSpan};
use logos::{self, Logos};
use std::fmt;

//===========================================================================//

#[derive(Clone, Debug, Default, PartialEq)]
enum LexerError {
    #[default]
    InvalidToken,
    ParseError(ParseError),
}

impl std::convert::From<ParseError> for LexerError {
    fn from(value: ParseError) -> LexerError {
        LexerError::ParseError(value)
    }
}

//===========================================================================//

fn hex_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u64, LexerError> {
    let slice = lexer.slice();
    let digits: String =
        slice.trim_start_matches('@').chars().filter(|&chr| chr != '_').collect();
    u64::from_str_radix(&digits, 16).map_err(|_| {
        let span = SrcSpan::from_byte_range(lexer.span());
        let message = format!("hex literal is too long: {slice}");
        LexerError::ParseError(ParseError::new(span, message))
    })
}

#[derive(Debug, Eq, Logos, PartialEq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t\r\n]+")] // whitespace
#[logos(skip r"//[^\n]*")] // comments
enum TokenKind {
    #[regex(r"@[0-9A-Fa-f][0-9A-Fa-f_]*", hex_literal_callback)]
    Origin(u64),
    #[regex(r"[0-9A-Fa-f][0-9A-Fa-f_]*", hex_literal_callback)]
    Word(u64),
}

impl TokenKind {
    fn into_token(self, lexer: &logos::Lexer<TokenKind>) -> Token {
        let span = SrcSpan::from_byte_range(lexer.span());
        let value = match self {
            TokenKind::Origin(index) => TokenValue::Origin(index),
            TokenKind::Word(word) => TokenValue::Word(word),
        };
        Token { span, value }
    }
}

//===========================================================================//

/// The contents of a single lexical token in a memory listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenValue {
    /// An `@` directive that moves the load cursor to the given word index.
    Origin(u64),
    /// A hex literal for one memory word.  The value has not yet been
    /// checked to fit in 32 bits.
    Word(u64),
}

impl TokenValue {
    /// Returns the human-readable name for this kind of token.
    pub fn name(&self) -> &str {
        match &self {
            TokenValue::Origin(_) => "address directive",
            TokenValue::Word(_) => "hex word",
        }
    }
}

//===========================================================================//

/// A single lexical token, including location information.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// The location in the file of this token.
    pub span: SrcSpan,
    /// The contents of the token.
    pub value: TokenValue,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value.name())
    }
}

//===========================================================================//

/// A lexer for tokenizing a memory listing.
pub struct TokenLexer<'a> {
    lexer: logos::Lexer<'a, TokenKind>,
}

impl<'a> TokenLexer<'a> {
    /// Constructs a new lexer in its initial state.
    pub fn new(input: &'a str) -> TokenLexer<'a> {
        TokenLexer { lexer: TokenKind::lexer(input) }
    }
}

impl Iterator for TokenLexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Result<Token, ParseError>> {
        match self.lexer.next()? {
            Err(LexerError::ParseError(error)) => Some(Err(error)),
            Err(LexerError::InvalidToken) => {
                let span = SrcSpan::from_byte_range(self.lexer.span());
                let message = format!(
                    "invalid character: {}",
                    self.lexer.slice().escape_default()
                );
                Some(Err(ParseError::new(span, message)))
            }
            Ok(kind) => Some(Ok(kind.into_token(&self.lexer))),
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{ParseError, Token, TokenLexer, TokenValue};
    use crate::parse::SrcSpan;

    fn token(start: usize, end: usize, value: TokenValue) -> Token {
        Token { span: SrcSpan::from_byte_range(start..end), value }
    }

    fn read_all(input: &str) -> Vec<Token> {
        TokenLexer::new(input).collect::<Result<_, _>>().unwrap()
    }

    fn expect_error(input: &str) -> ParseError {
        for result in TokenLexer::new(input) {
            if let Err(error) = result {
                return error;
            }
        }
        panic!("no error occurred");
    }

    #[test]
    fn empty_input() {
        assert_eq!(read_all(""), vec![]);
        assert_eq!(read_all("  \n\t\r\n"), vec![]);
    }

    #[test]
    fn comment() {
        assert_eq!(read_all("// seed program"), vec![]);
        assert_eq!(
            read_all("13 // nop\n6f"),
            vec![
                token(0, 2, TokenValue::Word(0x13)),
                token(10, 12, TokenValue::Word(0x6f)),
            ]
        );
    }

    #[test]
    fn origin_and_words() {
        assert_eq!(
            read_all("@1f\nDEAD_BEEF cafebabe"),
            vec![
                token(0, 3, TokenValue::Origin(0x1f)),
                token(4, 13, TokenValue::Word(0xdead_beef)),
                token(14, 22, TokenValue::Word(0xcafe_babe)),
            ]
        );
    }

    #[test]
    fn literal_too_long() {
        let error = expect_error("0 11112222333344445");
        assert_eq!(error.span, SrcSpan::from_byte_range(2..19));
        assert_eq!(error.message, "hex literal is too long: 11112222333344445");
    }

    #[test]
    fn invalid_character() {
        let error = expect_error("00000013 xx");
        assert_eq!(error.span, SrcSpan::from_byte_range(9..10));
        assert_eq!(error.message, "invalid character: x");
    }
}

//===========================================================================//
