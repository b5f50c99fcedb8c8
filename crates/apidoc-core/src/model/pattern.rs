//! Member-name patterns used by sort and group specifications

use std::fmt::{self, Display, Formatter};

use regex::Regex;

/// A member name or a `*` wildcard, compiled once when the spec is installed
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Matches exactly one name
    Literal(String),
    /// Matches names where each `*` stands for any run of characters
    Wildcard { source: String, regex: Regex },
}

impl NamePattern {
    /// Compile a pattern; any `*` makes it a wildcard
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        if !source.contains('*') {
            return Ok(NamePattern::Literal(source.to_string()));
        }
        let body: Vec<String> = source.split('*').map(regex::escape).collect();
        let regex = Regex::new(&format!("^{}$", body.join(".*")))?;
        Ok(NamePattern::Wildcard {
            source: source.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Literal(literal) => literal == name,
            NamePattern::Wildcard { regex, .. } => regex.is_match(name),
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, NamePattern::Wildcard { .. })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            NamePattern::Literal(source) | NamePattern::Wildcard { source, .. } => source,
        }
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for NamePattern {}

impl Display for NamePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named group and the member patterns that select its members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub members: Vec<NamePattern>,
}

impl GroupSpec {
    /// Build a group from pattern strings
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members = members
            .into_iter()
            .map(|member| NamePattern::new(member.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: name.into(),
            members,
        })
    }
}
