//! Concrete syntax trees consumed by the pattern matcher
//!
//! A tree is the nested shape produced by an external tokenizer/parser: every
//! interior node carries an integer tag followed by its children, and every
//! leaf is a `(tag, text)` pair.

mod grammar;

pub use grammar::{Grammar, GrammarBuilder};

/// Integer tag identifying a grammar symbol or token kind
pub type Tag = u32;

/// A node of a concrete syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxTree {
    /// Interior node: a grammar symbol and its children
    Node { tag: Tag, children: Vec<SyntaxTree> },
    /// Leaf: a token kind and its literal text
    Leaf { tag: Tag, text: String },
}

impl SyntaxTree {
    /// Create an interior node
    #[must_use]
    pub fn node(tag: Tag, children: Vec<SyntaxTree>) -> Self {
        SyntaxTree::Node { tag, children }
    }

    /// Create a leaf
    #[must_use]
    pub fn leaf(tag: Tag, text: impl Into<String>) -> Self {
        SyntaxTree::Leaf {
            tag,
            text: text.into(),
        }
    }

    /// The node's symbol or token tag
    #[must_use]
    pub fn tag(&self) -> Tag {
        match self {
            SyntaxTree::Node { tag, .. } | SyntaxTree::Leaf { tag, .. } => *tag,
        }
    }

    /// Children of an interior node (empty for leaves)
    #[must_use]
    pub fn children(&self) -> &[SyntaxTree] {
        match self {
            SyntaxTree::Node { children, .. } => children,
            SyntaxTree::Leaf { .. } => &[],
        }
    }

    /// Literal text of a leaf
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            SyntaxTree::Leaf { text, .. } => Some(text),
            SyntaxTree::Node { .. } => None,
        }
    }

    /// Returns true for leaves
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, SyntaxTree::Leaf { .. })
    }

    /// Concatenated text of every leaf below this node, in order
    #[must_use]
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            SyntaxTree::Leaf { text, .. } => out.push_str(text),
            SyntaxTree::Node { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_and_node_accessors() {
        let tree = SyntaxTree::node(
            300,
            vec![SyntaxTree::leaf(1, "foo"), SyntaxTree::leaf(23, ".")],
        );
        assert_eq!(tree.tag(), 300);
        assert_eq!(tree.children().len(), 2);
        assert!(tree.text().is_none());
        assert!(!tree.is_leaf());

        let leaf = &tree.children()[0];
        assert!(leaf.is_leaf());
        assert_eq!(leaf.text(), Some("foo"));
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn flatten_text_concatenates_leaves() {
        let tree = SyntaxTree::node(
            310,
            vec![
                SyntaxTree::leaf(1, "os"),
                SyntaxTree::node(315, vec![SyntaxTree::leaf(23, "."), SyntaxTree::leaf(1, "path")]),
            ],
        );
        assert_eq!(tree.flatten_text(), "os.path");
    }
}
