use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub enum TokenKind {
    /// Quoted (`"..."`) or bare scalar text.
    Scalar,
    Equals,
    Comma,
    TupleOpen,
    TupleClose,
    ArrayOpen,
    ArrayClose,
}

/// A lexed token. Only byte offsets into the source line are stored; the text is
/// materialized on demand with [`Token::text`].
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(start: usize, end: usize, kind: TokenKind) -> Self {
        Self { start, end, kind }
    }

    #[inline(always)]
    pub fn raw<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }

    #[inline(always)]
    pub fn is_quoted(&self, line: &str) -> bool {
        self.kind == TokenKind::Scalar && self.raw(line).starts_with('"')
    }

    /// Returns the scalar text with enclosing quotes removed.
    ///
    /// A run of backslashes followed by a quote, or by the closing quote, is
    /// halved and the escaped quote kept. Other backslash sequences are kept as
    /// written.
    pub fn text<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let raw = self.raw(line);

        if !self.is_quoted(line) {
            return Cow::Borrowed(raw);
        }

        let inner = &raw[1..raw.len() - 1];
        if !inner.contains("\\\"") && !inner.ends_with('\\') {
            return Cow::Borrowed(inner);
        }

        Cow::Owned(unescape_scalar(inner))
    }
}

fn push_backslashes(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n('\\', count));
}

fn unescape_scalar(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run = 0;

    for c in s.chars() {
        match c {
            '\\' => run += 1,
            '"' => {
                push_backslashes(&mut out, run / 2);
                out.push('"');
                run = 0;
            }
            _ => {
                push_backslashes(&mut out, run);
                out.push(c);
                run = 0;
            }
        }
    }

    push_backslashes(&mut out, run / 2);
    out
}

/// Quotes `s` so that [`Token::text`] gives it back unchanged.
pub(crate) fn quote_scalar(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    let mut run = 0;

    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => run += 1,
            '"' => {
                push_backslashes(&mut out, run * 2 + 1);
                out.push('"');
                run = 0;
            }
            _ => {
                push_backslashes(&mut out, run);
                out.push(c);
                run = 0;
            }
        }
    }
    push_backslashes(&mut out, run * 2);
    out.push('"');

    out
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            TokenKind::Scalar => write!(f, "scalar"),
            TokenKind::Equals => write!(f, "="),
            TokenKind::Comma => write!(f, ","),
            TokenKind::TupleOpen => write!(f, "{{"),
            TokenKind::TupleClose => write!(f, "}}"),
            TokenKind::ArrayOpen => write!(f, "["),
            TokenKind::ArrayClose => write!(f, "]"),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}@{}..{}", self.kind, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bare("main", Token::new(0, 4, TokenKind::Scalar), "main")]
    #[case::quoted("\"main\"", Token::new(0, 6, TokenKind::Scalar), "main")]
    #[case::empty_quoted("\"\"", Token::new(0, 2, TokenKind::Scalar), "")]
    #[case::escaped_quote(r#""say \"hi\"""#, Token::new(0, 12, TokenKind::Scalar), "say \"hi\"")]
    #[case::backslash_kept(r#""C:\\dir""#, Token::new(0, 9, TokenKind::Scalar), r"C:\\dir")]
    #[case::escaped_backslash_then_quote(r#""a\\\"b""#, Token::new(0, 8, TokenKind::Scalar), r#"a\"b"#)]
    #[case::trailing_backslash(r#""C:\dir\\""#, Token::new(0, 10, TokenKind::Scalar), r"C:\dir\")]
    #[case::newline_escape_kept(r#""line\n""#, Token::new(0, 8, TokenKind::Scalar), r"line\n")]
    fn test_token_text(#[case] line: &str, #[case] token: Token, #[case] expected: &str) {
        assert_eq!(token.text(line), expected);
    }

    #[test]
    fn test_token_text_borrows_when_nothing_to_unescape() {
        let line = "\"plain\"";
        let token = Token::new(0, line.len(), TokenKind::Scalar);
        assert!(matches!(token.text(line), Cow::Borrowed("plain")));
    }

    #[rstest]
    #[case::plain("main", r#""main""#)]
    #[case::quote(r#"say "hi""#, r#""say \"hi\"""#)]
    #[case::backslash_in_the_middle(r"C:\dir", r#""C:\dir""#)]
    #[case::trailing_backslash(r"C:\dir\", r#""C:\dir\\""#)]
    #[case::backslash_before_quote(r#"a\"b"#, r#""a\\\"b""#)]
    #[case::backslashes_only(r"\\", r#""\\\\""#)]
    fn test_quote_scalar(#[case] text: &str, #[case] expected: &str) {
        let quoted = quote_scalar(text);
        assert_eq!(quoted, expected);

        let token = Token::new(0, quoted.len(), TokenKind::Scalar);
        assert_eq!(token.text(&quoted), text);
    }
}
