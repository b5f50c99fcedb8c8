//! Pattern compilation errors

use thiserror::Error;

use super::span::Span;

/// Number of characters of context shown on each side of an error
const EXCERPT_CONTEXT: usize = 20;

/// A pattern compilation error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct PatternError {
    /// The kind of error
    pub kind: PatternErrorKind,
    /// Location of the offending text in the pattern source
    pub span: Span,
    /// The pattern source around the error, with a `[*ERROR*]` marker
    pub excerpt: String,
}

impl PatternError {
    /// Create a new pattern error, capturing an excerpt of the source
    #[must_use]
    pub fn new(kind: PatternErrorKind, span: Span, source: &str) -> Self {
        Self {
            kind,
            span,
            excerpt: excerpt(source, span.start as usize),
        }
    }
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {:?}", self.kind, self.span, self.excerpt)
    }
}

impl std::error::Error for PatternError {}

/// The kind of pattern error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternErrorKind {
    #[error("empty pattern")]
    EmptyPattern,

    #[error("unexpected character")]
    UnexpectedChar,

    #[error("unexpected {0}")]
    UnexpectedToken(&'static str),

    #[error("pattern must start with a node pattern '('")]
    NotANodePattern,

    #[error("unbalanced '(': missing ')'")]
    UnbalancedOpen,

    #[error("unbalanced ')'")]
    UnbalancedClose,

    #[error("'...' must be the last element of its node pattern")]
    EllipsisNotLast,

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("quoted literal needs a grammar with a name-like token")]
    NoNameToken,

    #[error("modifier '{0}' does not follow a child pattern")]
    DanglingModifier(char),

    #[error("binding ':{0}' does not follow a child pattern")]
    DanglingBinding(String),

    #[error("unexpected input after the closing ')'")]
    TrailingInput,
}

/// Render the source around `offset` with an error marker
fn excerpt(source: &str, offset: usize) -> String {
    let offset = offset.min(source.len());
    let before: Vec<char> = source[..offset].chars().rev().take(EXCERPT_CONTEXT).collect();
    let before: String = before.into_iter().rev().collect();
    let after: String = source[offset..].chars().take(EXCERPT_CONTEXT).collect();
    format!("{before}[*ERROR*]{after}")
}
