pub mod error;
pub mod token;

use error::LexerError;
use nom::Parser;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{anychar, char},
    combinator::{map, recognize},
    multi::many0_count,
    sequence::preceded,
};
use nom_locate::LocatedSpan;
use token::{Token, TokenKind};

type Span<'a> = LocatedSpan<&'a str>;

/// Characters that end a bare scalar.
const DELIMITERS: &str = "=,{}[]\"";

macro_rules! define_token_parser {
    ($name:ident, $tag:expr, $kind:expr) => {
        fn $name(input: Span) -> IResult<Span, Token> {
            map(tag($tag), |span: Span| token_from_span(span, $kind)).parse(input)
        }
    };
}

#[inline(always)]
fn token_from_span(span: Span, kind: TokenKind) -> Token {
    let start = span.location_offset();
    Token::new(start, start + span.fragment().len(), kind)
}

define_token_parser!(equals, "=", TokenKind::Equals);
define_token_parser!(comma, ",", TokenKind::Comma);
define_token_parser!(tuple_open, "{", TokenKind::TupleOpen);
define_token_parser!(tuple_close, "}", TokenKind::TupleClose);
define_token_parser!(array_open, "[", TokenKind::ArrayOpen);
define_token_parser!(array_close, "]", TokenKind::ArrayClose);

fn punctuations(input: Span) -> IResult<Span, Token> {
    alt((equals, comma, tuple_open, tuple_close, array_open, array_close)).parse(input)
}

fn quoted_scalar(input: Span) -> IResult<Span, Token> {
    map(
        recognize((
            char('"'),
            many0_count(alt((recognize(preceded(char('\\'), anychar)), is_not("\\\"")))),
            char('"'),
        )),
        |span: Span| token_from_span(span, TokenKind::Scalar),
    )
    .parse(input)
}

fn bare_scalar(input: Span) -> IResult<Span, Token> {
    map(is_not(DELIMITERS), |span: Span| {
        token_from_span(span, TokenKind::Scalar)
    })
    .parse(input)
}

fn token(input: Span) -> IResult<Span, Token> {
    alt((punctuations, quoted_scalar, bare_scalar)).parse(input)
}

/// Lexes the token starting at byte offset `pos` of `line`.
///
/// Returns `Ok(None)` at end of input. The only lexical error is a quoted scalar
/// without its closing quote.
pub fn next_token(line: &str, pos: usize) -> Result<Option<Token>, LexerError> {
    let rest = line.get(pos..).ok_or(LexerError::InvalidOffset(pos))?;

    if rest.is_empty() {
        return Ok(None);
    }

    match token(Span::new(rest)) {
        Ok((_, token)) => Ok(Some(Token::new(
            token.start + pos,
            token.end + pos,
            token.kind,
        ))),
        Err(_) => Err(LexerError::UnterminatedString(pos)),
    }
}

/// Streaming tokenizer over one line.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    line: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self::at(line, 0)
    }

    pub fn at(line: &'a str, pos: usize) -> Self {
        Self {
            line,
            pos,
            failed: false,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn tokenize(line: &str) -> Result<Vec<Token>, LexerError> {
        Lexer::new(line).collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match next_token(self.line, self.pos) {
            Ok(Some(token)) => {
                self.pos = token.end;
                Some(Ok(token))
            }
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("",
        Ok(vec![]))]
    #[case("number=\"1\"",
        Ok(vec![
          Token{start: 0, end: 6, kind: TokenKind::Scalar},
          Token{start: 6, end: 7, kind: TokenKind::Equals},
          Token{start: 7, end: 10, kind: TokenKind::Scalar}]))]
    #[case("bkpt={number=\"1\",type=\"breakpoint\"}",
        Ok(vec![
          Token{start: 0, end: 4, kind: TokenKind::Scalar},
          Token{start: 4, end: 5, kind: TokenKind::Equals},
          Token{start: 5, end: 6, kind: TokenKind::TupleOpen},
          Token{start: 6, end: 12, kind: TokenKind::Scalar},
          Token{start: 12, end: 13, kind: TokenKind::Equals},
          Token{start: 13, end: 16, kind: TokenKind::Scalar},
          Token{start: 16, end: 17, kind: TokenKind::Comma},
          Token{start: 17, end: 21, kind: TokenKind::Scalar},
          Token{start: 21, end: 22, kind: TokenKind::Equals},
          Token{start: 22, end: 34, kind: TokenKind::Scalar},
          Token{start: 34, end: 35, kind: TokenKind::TupleClose}]))]
    #[case("[\"eax\",\"\"]",
        Ok(vec![
          Token{start: 0, end: 1, kind: TokenKind::ArrayOpen},
          Token{start: 1, end: 6, kind: TokenKind::Scalar},
          Token{start: 6, end: 7, kind: TokenKind::Comma},
          Token{start: 7, end: 9, kind: TokenKind::Scalar},
          Token{start: 9, end: 10, kind: TokenKind::ArrayClose}]))]
    #[case("msg=\"a \\\"quoted\\\" ,{word}\"",
        Ok(vec![
          Token{start: 0, end: 3, kind: TokenKind::Scalar},
          Token{start: 3, end: 4, kind: TokenKind::Equals},
          Token{start: 4, end: 26, kind: TokenKind::Scalar}]))]
    #[case("name with spaces=x",
        Ok(vec![
          Token{start: 0, end: 16, kind: TokenKind::Scalar},
          Token{start: 16, end: 17, kind: TokenKind::Equals},
          Token{start: 17, end: 18, kind: TokenKind::Scalar}]))]
    #[case("msg=\"unterminated",
        Err(LexerError::UnterminatedString(4)))]
    #[case("msg=\"ends with backslash\\\"",
        Err(LexerError::UnterminatedString(4)))]
    fn test_tokenize(#[case] input: &str, #[case] expected: Result<Vec<Token>, LexerError>) {
        assert_eq!(Lexer::tokenize(input), expected);
    }

    #[test]
    fn test_next_token_from_offset() {
        let line = "^done,value=\"42\"";
        let token = next_token(line, 6).unwrap().unwrap();
        assert_eq!(token, Token::new(6, 11, TokenKind::Scalar));
        assert_eq!(token.text(line), "value");

        let token = next_token(line, 12).unwrap().unwrap();
        assert_eq!(token.text(line), "42");
        assert_eq!(next_token(line, line.len()), Ok(None));
    }

    #[test]
    fn test_next_token_invalid_offset() {
        assert_eq!(next_token("abc", 10), Err(LexerError::InvalidOffset(10)));
    }

    #[test]
    fn test_lexer_stops_after_error() {
        let mut lexer = Lexer::new("a=\"b");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert_eq!(lexer.next(), Some(Err(LexerError::UnterminatedString(2))));
        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.position(), 2);
    }
}
