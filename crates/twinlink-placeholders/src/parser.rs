//! Recursive-descent parser for placeholder templates.
//!
//! A template is split into literal text and placeholder expressions
//! delimited by `{{` and `}}`. The content of one expression follows
//!
//! ```text
//! expression := reference ( '|' call )*
//! reference  := prefix ':' name
//! call       := 'fn' ':' function '(' params ')'
//! params     := ( argument ( ',' argument )* )?
//! argument   := quoted | reference
//! ```
//!
//! The parameter text of a call is kept raw; each function parses it with
//! [`parse_arguments`] against its own signature.

use crate::error::{PlaceholderError, Result};
use std::fmt;
use twinlink_core::config::placeholder::{END_MARKER, START_MARKER};

/// Prefix every pipeline function call must use.
pub const FUNCTION_PREFIX: &str = "fn";

/// A piece of a scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'t> {
    Literal(&'t str),
    Placeholder {
        /// Full text including the markers.
        raw: &'t str,
        /// Text between the markers.
        content: &'t str,
    },
}

/// `prefix:name` reference to a placeholder value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderRef {
    pub prefix: String,
    pub name: String,
}

impl fmt::Display for PlaceholderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.name)
    }
}

/// One `fn:name(params)` stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    /// Parameter text between the parentheses, untrimmed.
    pub params: String,
}

/// A parsed placeholder expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub source: String,
    pub placeholder: PlaceholderRef,
    pub functions: Vec<FunctionCall>,
}

/// A parsed function argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Quoted string constant, without its quotes.
    Literal(String),
    /// Unquoted placeholder reference.
    Reference(PlaceholderRef),
}

/// Split a template into literal text and placeholder expressions.
pub(crate) fn scan(template: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut offset = 0;

    while let Some(found) = template[offset..].find(START_MARKER) {
        let start = offset + found;
        if start > offset {
            segments.push(Segment::Literal(&template[offset..start]));
        }
        let content_start = start + START_MARKER.len();
        let end = find_end_marker(template, start, content_start)?;
        segments.push(Segment::Placeholder {
            raw: &template[start..end + END_MARKER.len()],
            content: &template[content_start..end],
        });
        offset = end + END_MARKER.len();
    }

    if offset < template.len() {
        segments.push(Segment::Literal(&template[offset..]));
    }
    Ok(segments)
}

/// Byte offset of the `}}` closing the expression opened at `start`.
/// Markers inside quotes belong to string constants.
fn find_end_marker(template: &str, start: usize, from: usize) -> Result<usize> {
    let bytes = template.as_bytes();
    let mut quote: Option<u8> = None;

    for i in from..bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'}' if bytes.get(i + 1) == Some(&b'}') => return Ok(i),
                b'{' if bytes.get(i + 1) == Some(&b'{') => {
                    return Err(PlaceholderError::invalid_expression(
                        &template[start..],
                        "placeholders must not be nested",
                    ))
                }
                _ => {}
            },
        }
    }

    Err(PlaceholderError::invalid_expression(
        &template[start..],
        format!("missing closing '{}'", END_MARKER),
    ))
}

/// Parse the content of one placeholder expression.
///
/// Fails with `FunctionChainTooComplex` as soon as more than
/// `max_functions` stages are chained or parentheses nest deeper than that.
pub(crate) fn parse_expression(content: &str, max_functions: usize) -> Result<Expression> {
    let mut cursor = Cursor::new(content);
    cursor.skip_whitespace();
    if cursor.is_eof() {
        return Err(cursor.error("the placeholder is empty"));
    }

    let placeholder = cursor.reference()?;
    let mut functions = Vec::new();

    cursor.skip_whitespace();
    while !cursor.is_eof() {
        if !cursor.eat('|') {
            return Err(cursor.error(format!("unexpected '{}'", cursor.rest())));
        }
        if functions.len() >= max_functions {
            return Err(cursor.too_complex(max_functions));
        }
        cursor.skip_whitespace();
        functions.push(cursor.function_call(max_functions)?);
        cursor.skip_whitespace();
    }

    Ok(Expression {
        source: content.trim().to_string(),
        placeholder,
        functions,
    })
}

/// Parse the raw parameter text of a function call.
///
/// Returns `None` when the text is not a comma separated list of quoted
/// constants and placeholder references.
pub fn parse_arguments(params: &str) -> Option<Vec<Argument>> {
    let mut cursor = Cursor::new(params);
    let mut arguments = Vec::new();

    cursor.skip_whitespace();
    if cursor.is_eof() {
        return Some(arguments);
    }

    loop {
        let argument = match cursor.peek()? {
            q @ ('\'' | '"') => {
                cursor.bump();
                Argument::Literal(cursor.quoted(q)?.to_string())
            }
            _ => Argument::Reference(cursor.reference().ok()?),
        };
        arguments.push(argument);

        cursor.skip_whitespace();
        if cursor.is_eof() {
            return Some(arguments);
        }
        if !cursor.eat(',') {
            return None;
        }
        cursor.skip_whitespace();
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '|' | ',' | '(' | ')' | '\'' | '"' | '{' | '}')
}

struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn error(&self, reason: impl Into<String>) -> PlaceholderError {
        PlaceholderError::invalid_expression(self.src.trim(), reason)
    }

    fn too_complex(&self, max: usize) -> PlaceholderError {
        PlaceholderError::FunctionChainTooComplex {
            expression: self.src.trim().to_string(),
            max,
        }
    }

    fn reference(&mut self) -> Result<PlaceholderRef> {
        let prefix = self.take_while(is_identifier_char);
        if prefix.is_empty() {
            return Err(self.error("expected a placeholder prefix"));
        }
        if !self.eat(':') {
            return Err(self.error(format!("expected ':' after '{}'", prefix)));
        }
        let name = self.take_while(is_name_char);
        if name.is_empty() {
            return Err(self.error(format!("expected a name after '{}:'", prefix)));
        }
        Ok(PlaceholderRef {
            prefix: prefix.to_string(),
            name: name.to_string(),
        })
    }

    fn function_call(&mut self, max_depth: usize) -> Result<FunctionCall> {
        let prefix = self.take_while(is_identifier_char);
        if prefix.is_empty() {
            return Err(self.error("empty pipeline stage"));
        }
        if !self.eat(':') || prefix != FUNCTION_PREFIX {
            return Err(self.error(format!(
                "pipeline stages must start with '{}:'",
                FUNCTION_PREFIX
            )));
        }
        let name = self.take_while(is_identifier_char);
        if name.is_empty() {
            return Err(self.error("expected a function name"));
        }
        self.skip_whitespace();
        if !self.eat('(') {
            return Err(self.error(format!("expected '(' after 'fn:{}'", name)));
        }

        let params_start = self.pos;
        self.parenthesized(1, max_depth)?;
        let params_end = self.pos - ')'.len_utf8();

        Ok(FunctionCall {
            name: name.to_string(),
            params: self.src[params_start..params_end].to_string(),
        })
    }

    /// Consume up to and including the `)` matching an already consumed `(`.
    fn parenthesized(&mut self, depth: usize, max_depth: usize) -> Result<()> {
        if depth > max_depth {
            return Err(self.too_complex(max_depth));
        }
        loop {
            match self.bump() {
                None => return Err(self.error("unbalanced parentheses")),
                Some(')') => return Ok(()),
                Some('(') => self.parenthesized(depth + 1, max_depth)?,
                Some(q @ ('\'' | '"')) => {
                    if self.quoted(q).is_none() {
                        return Err(self.error("unterminated string constant"));
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Consume a string constant whose opening quote was already consumed.
    fn quoted(&mut self, quote: char) -> Option<&'s str> {
        let start = self.pos;
        let len = self.rest().find(quote)?;
        self.pos += len + quote.len_utf8();
        Some(&self.src[start..start + len])
    }
}
