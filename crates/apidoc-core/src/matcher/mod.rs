//! Tree pattern matcher
//!
//! Compiles a small textual pattern language into a [`TreePattern`] and
//! matches concrete [`SyntaxTree`]s against it, binding named sub-patterns.
//!
//! # Pattern language
//!
//! - `(symbol child ...)`: an interior node with the given symbol tag. `(` or
//!   `(*` without a name matches any interior node.
//! - `TOKEN`: a leaf of the given token kind.
//! - `'text'`: a name-like leaf with exactly this text.
//! - `...`: as the last child of a node pattern, matches any remaining children.
//! - `?` / `*` after a child: optional / zero-or-more.
//! - `:name` after a child: bind the matched subtree (node patterns) or the
//!   token text (leaf patterns) under `name`.
//!
//! # Example
//!
//! ```
//! use apidoc_core::matcher::TreePattern;
//! use apidoc_core::syntax::{Grammar, SyntaxTree};
//!
//! let grammar = Grammar::builder().symbol("x", 100).token("A", 1).token("B", 2).build();
//! let pattern = TreePattern::compile("(x A? :a B :b)", &grammar).unwrap();
//!
//! let tree = SyntaxTree::node(100, vec![SyntaxTree::leaf(2, "bee")]);
//! let result = pattern.match_tree(&tree);
//! assert!(result.matched);
//! assert!(result.get("a").unwrap().is_nothing());
//! assert_eq!(result.get("b").unwrap().as_text(), Some("bee"));
//! ```

mod error;
pub mod recognize;
mod span;
mod token;

pub use error::{PatternError, PatternErrorKind};
pub use span::Span;
pub use token::PatternToken;

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

use logos::Logos;
use tracing::trace;

use crate::syntax::{Grammar, SyntaxTree, Tag};
use token::{binding_name, unquote};

/// A value bound by a named sub-pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound<'t> {
    /// Subtree matched by a node pattern
    Tree(&'t SyntaxTree),
    /// Text of the leaf matched by a token or literal pattern
    Text(&'t str),
    /// A failed optional pattern
    Nothing,
    /// Every match of a repeated pattern, in encounter order
    Seq(Vec<Bound<'t>>),
}

impl<'t> Bound<'t> {
    #[must_use]
    pub fn as_tree(&self) -> Option<&'t SyntaxTree> {
        match self {
            Bound::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&'t str> {
        match self {
            Bound::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq(&self) -> Option<&[Bound<'t>]> {
        match self {
            Bound::Seq(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Bound::Nothing)
    }
}

/// Mapping from binding names to bound values
pub type Bindings<'t> = HashMap<String, Bound<'t>>;

/// Outcome of matching a tree against a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'t> {
    /// Whether the whole tree matched
    pub matched: bool,
    /// Values bound while matching
    pub bindings: Bindings<'t>,
}

impl<'t> MatchResult<'t> {
    /// Look up a binding by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Bound<'t>> {
        self.bindings.get(name)
    }
}

/// A compiled, immutable tree pattern
///
/// A compiled pattern holds no per-match state and can be shared freely;
/// bindings live in the map passed to (or returned from) each match call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePattern {
    root: PatternNode,
    source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PatternNode {
    kind: PatternKind,
    binding: Option<String>,
    optional: bool,
    repeated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    /// Interior node; `tag == None` is the wildcard
    Node {
        tag: Option<Tag>,
        label: Option<String>,
        children: Vec<PatternNode>,
        open: bool,
    },
    Token {
        tag: Tag,
        label: String,
    },
    Literal {
        tag: Tag,
        text: String,
    },
}

/// A node pattern whose closing paren has not been seen yet
struct OpenNode {
    tag: Option<Tag>,
    label: Option<String>,
    children: Vec<PatternNode>,
    open: bool,
    span: Span,
}

impl OpenNode {
    fn finish(self) -> PatternNode {
        PatternNode::new(PatternKind::Node {
            tag: self.tag,
            label: self.label,
            children: self.children,
            open: self.open,
        })
    }
}

impl TreePattern {
    /// Compile a pattern string against a grammar's symbol and token names
    pub fn compile(source: &str, grammar: &Grammar) -> Result<Self, PatternError> {
        let err = |kind: PatternErrorKind, range: Range<usize>| {
            PatternError::new(kind, Span::from_range(range), source)
        };

        let mut lexer = PatternToken::lexer(source).spanned().peekable();
        let mut stack: Vec<OpenNode> = Vec::new();
        let mut root: Option<PatternNode> = None;

        while let Some((token, range)) = lexer.next() {
            let token = token.map_err(|()| err(PatternErrorKind::UnexpectedChar, range.clone()))?;
            let lexeme = &source[range.clone()];

            if root.is_some() {
                return Err(err(PatternErrorKind::TrailingInput, range));
            }
            if token != PatternToken::Close && stack.last().is_some_and(|node| node.open) {
                return Err(err(PatternErrorKind::EllipsisNotLast, range));
            }

            match token {
                PatternToken::Open => {
                    let (tag, label) = match lexer.peek().cloned() {
                        Some((Ok(PatternToken::Symbol), name_range)) => {
                            lexer.next();
                            let name = &source[name_range.clone()];
                            let tag = grammar.symbol(name).ok_or_else(|| {
                                err(PatternErrorKind::UnknownSymbol(name.to_string()), name_range)
                            })?;
                            (Some(tag), Some(name.to_string()))
                        }
                        Some((Ok(PatternToken::Star), _)) => {
                            lexer.next();
                            (None, None)
                        }
                        _ => (None, None),
                    };
                    stack.push(OpenNode {
                        tag,
                        label,
                        children: Vec::new(),
                        open: false,
                        span: Span::from_range(range),
                    });
                }
                PatternToken::Close => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| err(PatternErrorKind::UnbalancedClose, range))?
                        .finish();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                PatternToken::Ellipsis => {
                    let top = stack
                        .last_mut()
                        .ok_or_else(|| err(PatternErrorKind::NotANodePattern, range))?;
                    top.open = true;
                }
                PatternToken::TokenName => {
                    let top = stack
                        .last_mut()
                        .ok_or_else(|| err(PatternErrorKind::NotANodePattern, range.clone()))?;
                    let tag = grammar.token(lexeme).ok_or_else(|| {
                        err(PatternErrorKind::UnknownToken(lexeme.to_string()), range)
                    })?;
                    top.children.push(PatternNode::new(PatternKind::Token {
                        tag,
                        label: lexeme.to_string(),
                    }));
                }
                PatternToken::Literal => {
                    let top = stack
                        .last_mut()
                        .ok_or_else(|| err(PatternErrorKind::NotANodePattern, range.clone()))?;
                    let tag = grammar
                        .name_token()
                        .ok_or_else(|| err(PatternErrorKind::NoNameToken, range))?;
                    top.children.push(PatternNode::new(PatternKind::Literal {
                        tag,
                        text: unquote(lexeme),
                    }));
                }
                PatternToken::Binding => {
                    let name = binding_name(lexeme);
                    let child = stack
                        .last_mut()
                        .and_then(|top| top.children.last_mut())
                        .ok_or_else(|| {
                            err(PatternErrorKind::DanglingBinding(name.to_string()), range)
                        })?;
                    child.binding = Some(name.to_string());
                }
                PatternToken::Question | PatternToken::Star => {
                    let modifier = if token == PatternToken::Star { '*' } else { '?' };
                    let child = stack
                        .last_mut()
                        .and_then(|top| top.children.last_mut())
                        .ok_or_else(|| err(PatternErrorKind::DanglingModifier(modifier), range))?;
                    if modifier == '*' {
                        child.repeated = true;
                    } else {
                        child.optional = true;
                    }
                }
                PatternToken::Symbol | PatternToken::Word => {
                    let kind = if stack.is_empty() {
                        PatternErrorKind::NotANodePattern
                    } else {
                        PatternErrorKind::UnexpectedToken(token.describe())
                    };
                    return Err(err(kind, range));
                }
            }
        }

        if let Some(unclosed) = stack.last() {
            return Err(err(PatternErrorKind::UnbalancedOpen, unclosed.span.as_range()));
        }
        let root = root.ok_or_else(|| err(PatternErrorKind::EmptyPattern, 0..0))?;
        Ok(Self {
            root,
            source: source.to_string(),
        })
    }

    /// The source text this pattern was compiled from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Match a tree, collecting bindings into a fresh map
    #[must_use]
    pub fn match_tree<'t>(&self, tree: &'t SyntaxTree) -> MatchResult<'t> {
        let mut bindings = Bindings::new();
        let matched = self.match_into(tree, &mut bindings);
        MatchResult { matched, bindings }
    }

    /// Match a tree, writing bindings into a caller-supplied map
    ///
    /// Bindings are written as sub-patterns are tried, so the map may hold
    /// partial bindings even when the overall match fails.
    pub fn match_into<'t>(&self, tree: &'t SyntaxTree, bindings: &mut Bindings<'t>) -> bool {
        self.root.matches(tree, bindings, 0)
    }
}

impl PatternNode {
    fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            binding: None,
            optional: false,
            repeated: false,
        }
    }

    fn matches<'t>(&self, tree: &'t SyntaxTree, bindings: &mut Bindings<'t>, depth: usize) -> bool {
        let matched = match (&self.kind, tree) {
            (PatternKind::Token { tag, .. }, SyntaxTree::Leaf { tag: leaf_tag, .. }) => {
                tag == leaf_tag
            }
            (
                PatternKind::Literal { tag, text },
                SyntaxTree::Leaf {
                    tag: leaf_tag,
                    text: leaf_text,
                },
            ) => tag == leaf_tag && text == leaf_text,
            (
                PatternKind::Node {
                    tag,
                    children,
                    open,
                    ..
                },
                SyntaxTree::Node {
                    tag: node_tag,
                    children: tree_children,
                },
            ) => {
                tag.map_or(true, |tag| tag == *node_tag)
                    && match_children(children, *open, tree_children, bindings, depth)
            }
            _ => false,
        };

        trace!(depth, pattern = %self, tag = tree.tag(), matched, "tree pattern step");
        self.bind(tree, matched, bindings);
        matched
    }

    fn bind<'t>(&self, tree: &'t SyntaxTree, matched: bool, bindings: &mut Bindings<'t>) {
        let Some(name) = &self.binding else {
            return;
        };

        if matched {
            let value = match self.kind {
                PatternKind::Node { .. } => Bound::Tree(tree),
                PatternKind::Token { .. } | PatternKind::Literal { .. } => {
                    Bound::Text(tree.text().unwrap_or_default())
                }
            };
            if self.repeated {
                let entry = bindings
                    .entry(name.clone())
                    .or_insert_with(|| Bound::Seq(Vec::new()));
                match entry {
                    Bound::Seq(items) => items.push(value),
                    other => *other = Bound::Seq(vec![value]),
                }
            } else {
                bindings.insert(name.clone(), value);
            }
        } else {
            self.bind_default(bindings);
        }
    }

    /// Bind the empty value of an optional or repeated pattern
    fn bind_default(&self, bindings: &mut Bindings<'_>) {
        let Some(name) = &self.binding else {
            return;
        };
        if self.optional {
            bindings.insert(name.clone(), Bound::Nothing);
        }
        if self.repeated {
            bindings
                .entry(name.clone())
                .or_insert_with(|| Bound::Seq(Vec::new()));
        }
    }

    fn is_skippable(&self) -> bool {
        self.optional || self.repeated
    }
}

/// Align child patterns against a node's children with a two-pointer walk
fn match_children<'t>(
    patterns: &[PatternNode],
    open: bool,
    children: &'t [SyntaxTree],
    bindings: &mut Bindings<'t>,
    depth: usize,
) -> bool {
    let mut i = 0;
    let mut j = 0;

    while i < patterns.len() && j < children.len() {
        let pattern = &patterns[i];
        if pattern.matches(&children[j], bindings, depth + 1) {
            j += 1;
            if !pattern.repeated {
                i += 1;
            }
        } else if pattern.is_skippable() {
            i += 1;
        } else {
            return false;
        }
    }

    if j != children.len() && !open {
        return false;
    }

    for pattern in &patterns[i..] {
        if !pattern.is_skippable() {
            return false;
        }
        pattern.bind_default(bindings);
    }
    true
}

impl Display for PatternNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PatternKind::Node {
                label,
                children,
                open,
                ..
            } => {
                write!(f, "({}", label.as_deref().unwrap_or("*"))?;
                for child in children {
                    write!(f, " {child}")?;
                }
                if *open {
                    write!(f, " ...")?;
                }
                write!(f, ")")?;
            }
            PatternKind::Token { label, .. } => write!(f, "{label}")?,
            PatternKind::Literal { text, .. } => {
                write!(f, "'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))?;
            }
        }
        if self.optional {
            write!(f, "?")?;
        }
        if self.repeated {
            write!(f, "*")?;
        }
        if let Some(name) = &self.binding {
            write!(f, ":{name}")?;
        }
        Ok(())
    }
}

impl Display for TreePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
