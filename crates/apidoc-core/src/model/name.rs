//! Dotted names such as `os.path.join`

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when building a [`DottedName`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DottedNameError {
    #[error("empty dotted name")]
    Empty,

    #[error("invalid identifier '{0}' in dotted name")]
    InvalidIdentifier(String),
}

/// A non-empty sequence of identifiers joined by `.`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DottedName {
    pieces: Vec<String>,
}

impl DottedName {
    /// Parse a name like `pkg.module.Class`
    pub fn parse(source: &str) -> Result<Self, DottedNameError> {
        Self::from_pieces(source.split('.'))
    }

    /// Build a name from individual identifiers
    pub fn from_pieces<I, S>(pieces: I) -> Result<Self, DottedNameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pieces: Vec<String> = pieces.into_iter().map(Into::into).collect();
        if pieces.is_empty() || (pieces.len() == 1 && pieces[0].is_empty()) {
            return Err(DottedNameError::Empty);
        }
        if let Some(bad) = pieces.iter().find(|piece| !is_identifier(piece)) {
            return Err(DottedNameError::InvalidIdentifier(bad.clone()));
        }
        Ok(Self { pieces })
    }

    /// Append a single identifier
    pub fn child(&self, identifier: &str) -> Result<Self, DottedNameError> {
        if !is_identifier(identifier) {
            return Err(DottedNameError::InvalidIdentifier(identifier.to_string()));
        }
        let mut pieces = self.pieces.clone();
        pieces.push(identifier.to_string());
        Ok(Self { pieces })
    }

    /// Concatenate two names
    #[must_use]
    pub fn join(&self, other: &DottedName) -> Self {
        let mut pieces = self.pieces.clone();
        pieces.extend(other.pieces.iter().cloned());
        Self { pieces }
    }

    /// The name with its last identifier removed, or `None` for a single identifier
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        (self.pieces.len() > 1).then(|| Self {
            pieces: self.pieces[..self.pieces.len() - 1].to_vec(),
        })
    }

    /// Number of identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Always false; a dotted name has at least one identifier
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    /// The final identifier
    #[must_use]
    pub fn last(&self) -> &str {
        self.pieces.last().map_or("", String::as_str)
    }
}

fn is_identifier(piece: &str) -> bool {
    let mut chars = piece.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Display for DottedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pieces.join("."))
    }
}

impl FromStr for DottedName {
    type Err = DottedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
