//! Pattern grammar → anchored matcher.
//!
//! # Grammar
//! - literal text matches itself
//! - `:name` matches one segment (no `/`, no `?`)
//! - `*name` matches everything up to the query string
//! - `( ... )` makes its contents optional
//! - an optional `?key=value&...` query may follow any match

use std::fmt;

use regex::Regex;
use thiserror::Error;

const NAMED_CAPTURE: &str = "([^/?]+)";
const SPLAT_CAPTURE: &str = "([^?]*)";
const QUERY_SUFFIX: &str = r"(?:\?([^/]*))?";

/// Errors reported by [`compile_strict`].
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `)` without a matching `(`.
    #[error("unbalanced ')' at offset {0}")]
    UnexpectedClose(usize),

    /// A `(` that is never closed.
    #[error("optional group opened at offset {0} is never closed")]
    UnclosedGroup(usize),

    /// The generated matcher was rejected by the regex engine.
    #[error("invalid matcher: {0}")]
    Regex(#[from] regex::Error),
}

/// A capturing token of a pattern, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// `:name`, a single path segment.
    Named(String),
    /// `*name`, the rest of the path.
    Splat(String),
}

impl Capture {
    /// Parameter name without its sigil.
    pub fn name(&self) -> &str {
        match self {
            Capture::Named(name) | Capture::Splat(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Any,
    Never,
    Regex(Regex),
}

/// A compiled route pattern.
///
/// Matching is prefix-only: [`RoutePattern::match_len`] reports how much of
/// the fragment was consumed so nested tables can continue with the rest.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    text: String,
    matcher: Matcher,
    captures: Vec<Capture>,
}

impl RoutePattern {
    /// The default ("catch remaining") pattern. Consumes the whole fragment
    /// and captures nothing.
    pub fn any() -> Self {
        Self {
            raw: String::new(),
            text: "^.*".to_string(),
            matcher: Matcher::Any,
            captures: Vec::new(),
        }
    }

    fn never(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            text: raw.to_string(),
            matcher: Matcher::Never,
            captures: Vec::new(),
        }
    }

    /// The pattern string this was compiled from (empty for the default).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Textual form of the compiled matcher.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Capturing tokens in declaration order. Excludes the query capture.
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    pub fn is_default(&self) -> bool {
        matches!(self.matcher, Matcher::Any)
    }

    /// Length in bytes of the matched prefix, or `None` if the fragment
    /// does not match.
    pub fn match_len(&self, fragment: &str) -> Option<usize> {
        match &self.matcher {
            Matcher::Any => Some(fragment.len()),
            Matcher::Never => None,
            Matcher::Regex(re) => re.find(fragment).map(|m| m.end()),
        }
    }

    /// Raw capture groups (whole match excluded). Regex patterns always end
    /// with the query group; the default pattern yields an empty list.
    pub(crate) fn raw_captures<'f>(&self, fragment: &'f str) -> Option<Vec<Option<&'f str>>> {
        match &self.matcher {
            Matcher::Any => Some(Vec::new()),
            Matcher::Never => None,
            Matcher::Regex(re) => re.captures(fragment).map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str()))
                    .collect()
            }),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Literal(char),
    Open(usize),
    Close(usize),
    Named(String),
    Splat(String),
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '(' => tokens.push(Token::Open(offset)),
            ')' => tokens.push(Token::Close(offset)),
            ':' | '*' => {
                let mut name = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if !is_word(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                tokens.push(match (c, name.is_empty()) {
                    (_, true) => Token::Literal(c),
                    (':', false) => Token::Named(name),
                    _ => Token::Splat(name),
                });
            }
            _ => tokens.push(Token::Literal(c)),
        }
    }

    tokens
}

/// Ordered `:name` parameter names of a pattern. Splats are not keys.
pub fn keys_of(pattern: &str) -> Vec<String> {
    tokenize(pattern)
        .into_iter()
        .filter_map(|token| match token {
            Token::Named(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Compile a pattern, rejecting malformed input.
pub fn compile_strict(pattern: &str) -> Result<RoutePattern, PatternError> {
    let mut source = String::from("^");
    let mut captures = Vec::new();
    let mut open_groups = Vec::new();

    for token in tokenize(pattern) {
        match token {
            Token::Literal(c) => {
                let mut buf = [0u8; 4];
                source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
            Token::Open(offset) => {
                open_groups.push(offset);
                source.push_str("(?:");
            }
            Token::Close(offset) => {
                open_groups.pop().ok_or(PatternError::UnexpectedClose(offset))?;
                source.push_str(")?");
            }
            Token::Named(name) => {
                source.push_str(NAMED_CAPTURE);
                captures.push(Capture::Named(name));
            }
            Token::Splat(name) => {
                source.push_str(SPLAT_CAPTURE);
                captures.push(Capture::Splat(name));
            }
        }
    }

    if let Some(offset) = open_groups.pop() {
        return Err(PatternError::UnclosedGroup(offset));
    }

    source.push_str(QUERY_SUFFIX);
    let regex = Regex::new(&source)?;

    Ok(RoutePattern {
        raw: pattern.to_string(),
        text: source,
        matcher: Matcher::Regex(regex),
        captures,
    })
}

/// Compile a pattern. Malformed patterns yield a matcher that never matches.
pub fn compile(pattern: &str) -> RoutePattern {
    compile_strict(pattern).unwrap_or_else(|error| {
        tracing::warn!(pattern, %error, "Malformed route pattern will never match");
        RoutePattern::never(pattern)
    })
}
