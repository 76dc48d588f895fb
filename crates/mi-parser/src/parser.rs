pub mod error;

use error::{ParseError, ParseFailure};
use smol_str::SmolStr;

use crate::lexer::next_token;
use crate::lexer::token::{Token, TokenKind};
use crate::value::{Field, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Tuple,
    Array,
}

impl Container {
    fn closing(self) -> char {
        match self {
            Container::Tuple => '}',
            Container::Array => ']',
        }
    }

    fn wrap(self, fields: Vec<Field>) -> Value {
        match self {
            Container::Tuple => Value::Tuple(fields),
            Container::Array => Value::Array(fields),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Nothing,
    Name,
    Equal,
    Value,
}

/// Parses `name=value,...` starting at `pos` of `line` into a tuple.
///
/// With `want_closing_brace` the sequence must be terminated by `}`; otherwise end
/// of input completes it. On success the offset after the last consumed token is
/// returned alongside the tree.
pub fn parse_value_sequence(
    line: &str,
    pos: usize,
    want_closing_brace: bool,
) -> Result<(Value, usize), ParseFailure> {
    let mut parser = Parser::new(line, pos);
    let mut fields = Vec::new();

    match parser.sequence(Container::Tuple, want_closing_brace, &mut fields) {
        Ok(()) => Ok((Value::Tuple(fields), parser.pos)),
        Err(error) => Err(ParseFailure {
            error,
            partial: Value::Tuple(fields),
        }),
    }
}

/// Parses a complete results list such as `bkpt={number="1"},thread-id="1"`.
pub fn parse_value(input: &str) -> Result<Value, ParseFailure> {
    parse_value_sequence(input, 0, false).map(|(value, _)| value)
}

struct Parser<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(line: &'a str, pos: usize) -> Self {
        Self { line, pos }
    }

    fn next(&mut self) -> Result<Option<Token>, ParseError> {
        let token = next_token(self.line, self.pos)?;
        if let Some(token) = &token {
            self.pos = token.end;
        }
        Ok(token)
    }

    fn text(&self, token: &Token) -> String {
        token.text(self.line).into_owned()
    }

    /// Completed children are pushed to `out` as soon as they are complete, so on
    /// error `out` holds the partial tree. A nested container that fails is dropped.
    fn sequence(
        &mut self,
        container: Container,
        want_closing: bool,
        out: &mut Vec<Field>,
    ) -> Result<(), ParseError> {
        let mut step = Step::Nothing;
        let mut name: Option<(SmolStr, usize)> = None;
        let mut last: Option<Token> = None;

        while let Some(token) = self.next()? {
            match token.kind {
                TokenKind::Scalar => match step {
                    Step::Nothing => {
                        name = Some((self.text(&token).into(), token.start));
                        step = Step::Name;
                    }
                    Step::Equal => {
                        let (field_name, _) = name.take().unwrap_or_default();
                        out.push(Field::named(field_name, Value::Scalar(self.text(&token))));
                        step = Step::Value;
                    }
                    Step::Name | Step::Value => return Err(ParseError::UnexpectedToken(token)),
                },
                TokenKind::Equals => {
                    if step != Step::Name {
                        return Err(ParseError::UnexpectedToken(token));
                    }
                    step = Step::Equal;
                }
                TokenKind::Comma => {
                    match step {
                        Step::Value => {}
                        Step::Name if container == Container::Array => {
                            push_bare(out, name.take());
                        }
                        Step::Name | Step::Equal => {
                            return Err(ParseError::MissingValue(pending_start(&name, &token)));
                        }
                        Step::Nothing => return Err(ParseError::UnexpectedToken(token)),
                    }
                    step = Step::Nothing;
                }
                TokenKind::TupleOpen | TokenKind::ArrayOpen => {
                    let field_name = match step {
                        Step::Equal => name.take().map(|(n, _)| n).unwrap_or_default(),
                        Step::Nothing if container == Container::Array => SmolStr::default(),
                        _ => return Err(ParseError::UnexpectedToken(token)),
                    };
                    let inner = if token.kind == TokenKind::TupleOpen {
                        Container::Tuple
                    } else {
                        Container::Array
                    };

                    let mut children = Vec::new();
                    self.sequence(inner, true, &mut children)?;
                    out.push(Field::named(field_name, inner.wrap(children)));
                    step = Step::Value;
                }
                TokenKind::TupleClose | TokenKind::ArrayClose => {
                    let closes = if token.kind == TokenKind::TupleClose {
                        Container::Tuple
                    } else {
                        Container::Array
                    };
                    if !want_closing || closes != container {
                        return Err(ParseError::MismatchedClose(token));
                    }

                    return match step {
                        Step::Value => Ok(()),
                        Step::Nothing if last.is_none() => Ok(()),
                        Step::Nothing => Err(ParseError::TrailingComma(
                            last.map(|t| t.start).unwrap_or(token.start),
                        )),
                        Step::Name if container == Container::Array => {
                            push_bare(out, name.take());
                            Ok(())
                        }
                        Step::Name | Step::Equal => {
                            Err(ParseError::MissingValue(pending_start(&name, &token)))
                        }
                    };
                }
            }

            last = Some(token);
        }

        if want_closing {
            return Err(ParseError::UnexpectedEof(container.closing()));
        }

        match (step, last) {
            (Step::Value, _) | (Step::Nothing, None) => Ok(()),
            (Step::Nothing, Some(last)) => Err(ParseError::TrailingComma(last.start)),
            (Step::Name | Step::Equal, Some(last)) => {
                Err(ParseError::MissingValue(pending_start(&name, &last)))
            }
            (Step::Name | Step::Equal, None) => Err(ParseError::MissingValue(self.pos)),
        }
    }
}

fn push_bare(out: &mut Vec<Field>, name: Option<(SmolStr, usize)>) {
    let (text, _) = name.unwrap_or_default();
    out.push(Field::unnamed(Value::Scalar(text.to_string())));
}

fn pending_start(name: &Option<(SmolStr, usize)>, fallback: &Token) -> usize {
    name.as_ref().map(|(_, start)| *start).unwrap_or(fallback.start)
}
