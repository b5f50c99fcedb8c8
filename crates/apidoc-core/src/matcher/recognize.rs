//! Statement recognizers built on tree patterns
//!
//! A [`PatternSet`] is an ordered dispatch table of `(handler, pattern)`
//! pairs; the first pattern that matches a statement decides its handler.
//! [`StatementRecognizer`] bundles the preset table for the Python grammar
//! with docstring detection.

use super::{Bindings, Bound, PatternError, TreePattern};
use crate::model::DottedName;
use crate::syntax::{Grammar, SyntaxTree};

/// Statement patterns for [`Grammar::python`], tried in order
const STATEMENT_PATTERNS: &[(&str, &str)] = &[
    (
        "import",
        "(stmt COMMENT*
          (simple_stmt
           (small_stmt
            (import_stmt NAME:cmd (...)*:names))
           NEWLINE))",
    ),
    (
        "classdef",
        "(stmt COMMENT*
          (compound_stmt (classdef
             NAME
             NAME:classname
             LPAR? (testlist...)?:bases RPAR?
             COLON
             (suite ...):body)))",
    ),
    (
        "funcdef",
        "(stmt COMMENT*
          (compound_stmt (funcdef
             NAME
             NAME:funcname
             (parameters ...):parameters
             COLON
             (suite ...):body)))",
    ),
    (
        "simple_assignment",
        "(stmt COMMENT*:comments
          (simple_stmt (small_stmt (expr_stmt
           (testlist (test (and_test (not_test (comparison (expr
            (xor_expr (and_expr (shift_expr (arith_expr (term
             (factor (power (atom NAME)
                            (trailer DOT NAME)*))))))))))))):lhs
           EQUAL (...):rhs)) NEWLINE:nl_comment))",
    ),
    (
        "complex_assignment",
        "(stmt COMMENT*
          (simple_stmt (small_stmt (expr_stmt
           (testlist...):lhs EQUAL (...):rhs)) NEWLINE))",
    ),
    (
        "multi_assignment",
        "(stmt COMMENT*
          (simple_stmt (small_stmt (expr_stmt
           (testlist...):lhs EQUAL
           (...)*:rhs)) NEWLINE))",
    ),
    (
        "try",
        "(stmt COMMENT*
          (compound_stmt
           (try_stmt NAME COLON (suite ...):trysuite
           (...)*:rest)))",
    ),
    (
        "if",
        "(stmt COMMENT*
          (compound_stmt
           (if_stmt NAME (test ...) COLON (suite ...):ifsuite
            NAME? (test ...)? COLON? (suite ...)?:elifsuite
            NAME? COLON? (suite ...)?:elsesuite)))",
    ),
    (
        "while",
        "(stmt COMMENT*
          (compound_stmt
           (while_stmt NAME (test ...) COLON (suite ...):whilesuite
            NAME? COLON? (suite ...)?:elsesuite)))",
    ),
    (
        "for",
        "(stmt COMMENT*
          (compound_stmt
           (for_stmt NAME (exprlist...):loopvar NAME
            (testlist...) COLON (suite ...):forsuite
            NAME? COLON? (suite ...)?:elsesuite)))",
    ),
    (
        "multi_stmt",
        "(stmt COMMENT*
          (simple_stmt
           (small_stmt ...):stmt1
           SEMI
           (...)*:rest))",
    ),
];

/// A statement consisting of a single string literal
const DOCSTRING_PATTERN: &str = "
    (stmt (simple_stmt (small_stmt (expr_stmt (testlist (test
      (and_test (not_test (comparison (expr (xor_expr (and_expr
        (shift_expr (arith_expr (term (factor (power (atom
          STRING:stringval)))))))))))))))) NEWLINE))";

/// A name followed by attribute accesses: `a.b.c`
const DOTTED_NAME_PATTERN: &str = "(power (atom NAME:varname) (trailer DOT NAME)*:trailers)";

/// Ordered `(handler, pattern)` dispatch table
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    entries: Vec<(String, TreePattern)>,
}

impl PatternSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `(handler, pattern source)` pairs against a grammar
    pub fn compile<'a, I>(grammar: &Grammar, entries: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::new();
        for (handler, source) in entries {
            set.push(handler, TreePattern::compile(source, grammar)?);
        }
        Ok(set)
    }

    pub fn push(&mut self, handler: impl Into<String>, pattern: TreePattern) {
        self.entries.push((handler.into(), pattern));
    }

    /// The first handler whose pattern matches, with that match's bindings
    ///
    /// Every pattern is tried with a fresh binding map.
    #[must_use]
    pub fn first_match<'s, 't>(&'s self, tree: &'t SyntaxTree) -> Option<(&'s str, Bindings<'t>)> {
        self.entries.iter().find_map(|(handler, pattern)| {
            let result = pattern.match_tree(tree);
            result.matched.then(|| (handler.as_str(), result.bindings))
        })
    }

    pub fn handlers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(handler, _)| handler.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compile the preset statement dispatch table
pub fn statement_patterns(grammar: &Grammar) -> Result<PatternSet, PatternError> {
    PatternSet::compile(grammar, STATEMENT_PATTERNS.iter().copied())
}

/// Compile the single-string-literal statement pattern
pub fn docstring_pattern(grammar: &Grammar) -> Result<TreePattern, PatternError> {
    TreePattern::compile(DOCSTRING_PATTERN, grammar)
}

/// Compile the `power` dotted-name pattern
pub fn dotted_name_pattern(grammar: &Grammar) -> Result<TreePattern, PatternError> {
    TreePattern::compile(DOTTED_NAME_PATTERN, grammar)
}

/// Read a dotted name from an expression tree
///
/// Walks down single-child chains until a `power` node and reads
/// `name.attr.attr` from it. Returns `None` if the chain branches, reaches a
/// leaf first, or the `power` node is not a plain attribute access.
pub fn dotted_name(
    grammar: &Grammar,
    tree: &SyntaxTree,
) -> Result<Option<DottedName>, PatternError> {
    let pattern = dotted_name_pattern(grammar)?;
    Ok(read_dotted_name(grammar, &pattern, tree))
}

fn read_dotted_name(
    grammar: &Grammar,
    pattern: &TreePattern,
    tree: &SyntaxTree,
) -> Option<DottedName> {
    let power = grammar.symbol("power")?;
    let mut node = tree;
    while node.tag() != power {
        match node.children() {
            [only] if !node.is_leaf() => node = only,
            _ => return None,
        }
    }

    let result = pattern.match_tree(node);
    if !result.matched {
        return None;
    }
    let head = result.get("varname")?.as_text()?;
    let trailers = result.get("trailers").and_then(Bound::as_seq).unwrap_or_default();
    let attrs = trailers
        .iter()
        .filter_map(Bound::as_tree)
        .filter_map(|trailer| trailer.children().get(1).and_then(SyntaxTree::text));
    DottedName::from_pieces(std::iter::once(head).chain(attrs)).ok()
}

/// A statement picked out by a [`StatementRecognizer`]
#[derive(Debug, Clone, PartialEq)]
pub struct Recognized<'s, 't> {
    /// Position of the statement in the suite
    pub index: usize,
    pub handler: &'s str,
    pub bindings: Bindings<'t>,
    /// Contents of a string-literal statement directly following this one
    pub pseudo_docstring: Option<String>,
}

/// Preset statement, docstring and dotted-name recognizers for one grammar
#[derive(Debug, Clone)]
pub struct StatementRecognizer {
    grammar: Grammar,
    statements: PatternSet,
    docstring: TreePattern,
    dotted_name: TreePattern,
}

impl StatementRecognizer {
    /// Compile the preset recognizers
    pub fn new(grammar: Grammar) -> Result<Self, PatternError> {
        Ok(Self {
            statements: statement_patterns(&grammar)?,
            docstring: docstring_pattern(&grammar)?,
            dotted_name: dotted_name_pattern(&grammar)?,
            grammar,
        })
    }

    /// Recognizers for [`Grammar::python`]
    pub fn python() -> Result<Self, PatternError> {
        Self::new(Grammar::python())
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[must_use]
    pub fn statements(&self) -> &PatternSet {
        &self.statements
    }

    /// Classify every statement of a suite that some pattern matches
    #[must_use]
    pub fn recognize<'s, 't>(&'s self, statements: &'t [SyntaxTree]) -> Vec<Recognized<'s, 't>> {
        statements
            .iter()
            .enumerate()
            .filter_map(|(index, statement)| {
                let (handler, bindings) = self.statements.first_match(statement)?;
                let pseudo_docstring = statements
                    .get(index + 1)
                    .and_then(|next| self.string_statement(next));
                Some(Recognized {
                    index,
                    handler,
                    bindings,
                    pseudo_docstring,
                })
            })
            .collect()
    }

    /// Contents of a statement consisting of a single string literal
    #[must_use]
    pub fn string_statement(&self, statement: &SyntaxTree) -> Option<String> {
        let result = self.docstring.match_tree(statement);
        if !result.matched {
            return None;
        }
        result.get("stringval")?.as_text().and_then(string_literal_value)
    }

    #[must_use]
    pub fn dotted_name(&self, tree: &SyntaxTree) -> Option<DottedName> {
        read_dotted_name(&self.grammar, &self.dotted_name, tree)
    }
}

/// Decode a Python string literal token
///
/// Handles `r`/`u`/`b` prefixes, single and triple quotes, and the common
/// backslash escapes. Returns `None` for text that is not a string literal.
#[must_use]
pub fn string_literal_value(literal: &str) -> Option<String> {
    let body_start = literal.find(['\'', '"'])?;
    let prefix = literal[..body_start].to_ascii_lowercase();
    if !prefix.chars().all(|c| matches!(c, 'r' | 'u' | 'b')) {
        return None;
    }
    let raw = prefix.contains('r');
    let quoted = &literal[body_start..];

    let quote = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|q| quoted.len() >= 2 * q.len() && quoted.starts_with(q) && quoted.ends_with(q))?;
    let body = &quoted[quote.len()..quoted.len() - quote.len()];
    if raw {
        return Some(body.to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\n') => {}
            Some(other @ ('\\' | '\'' | '"')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPR_CHAIN: &[&str] = &[
        "testlist",
        "test",
        "and_test",
        "not_test",
        "comparison",
        "expr",
        "xor_expr",
        "and_expr",
        "shift_expr",
        "arith_expr",
        "term",
        "factor",
    ];

    struct Trees {
        grammar: Grammar,
    }

    impl Trees {
        fn new() -> Self {
            Self {
                grammar: Grammar::python(),
            }
        }

        fn sym(&self, name: &str) -> u32 {
            self.grammar.symbol(name).unwrap()
        }

        fn tok(&self, name: &str) -> u32 {
            self.grammar.token(name).unwrap()
        }

        fn leaf(&self, kind: &str, text: &str) -> SyntaxTree {
            SyntaxTree::leaf(self.tok(kind), text)
        }

        fn node(&self, symbol: &str, children: Vec<SyntaxTree>) -> SyntaxTree {
            SyntaxTree::node(self.sym(symbol), children)
        }

        /// `power` node for `a.b.c`
        fn power(&self, dotted: &str) -> SyntaxTree {
            let mut parts = dotted.split('.');
            let head = parts.next().unwrap();
            let mut children = vec![self.node("atom", vec![self.leaf("NAME", head)])];
            for attr in parts {
                let trailer = vec![self.leaf("DOT", "."), self.leaf("NAME", attr)];
                children.push(self.node("trailer", trailer));
            }
            self.node("power", children)
        }

        /// Wrap a `power` node in the `testlist ... factor` chain
        fn expression(&self, power: SyntaxTree) -> SyntaxTree {
            EXPR_CHAIN
                .iter()
                .rev()
                .fold(power, |inner, symbol| self.node(symbol, vec![inner]))
        }

        fn simple_stmt(&self, small: SyntaxTree) -> SyntaxTree {
            let small_stmt = self.node("small_stmt", vec![small]);
            let simple = self.node("simple_stmt", vec![small_stmt, self.leaf("NEWLINE", "\n")]);
            self.node("stmt", vec![simple])
        }

        fn assignment(&self, lhs: &str, rhs: &str) -> SyntaxTree {
            let expr_stmt = self.node(
                "expr_stmt",
                vec![
                    self.expression(self.power(lhs)),
                    self.leaf("EQUAL", "="),
                    self.expression(self.power(rhs)),
                ],
            );
            self.simple_stmt(expr_stmt)
        }

        fn string_stmt(&self, literal: &str) -> SyntaxTree {
            let atom = self.node("atom", vec![self.leaf("STRING", literal)]);
            let expr = self.expression(self.node("power", vec![atom]));
            self.simple_stmt(self.node("expr_stmt", vec![expr]))
        }

        fn import(&self, module: &str) -> SyntaxTree {
            let target = self.node("dotted_as_name", vec![self.leaf("NAME", module)]);
            let import = self.node("import_stmt", vec![self.leaf("NAME", "import"), target]);
            self.simple_stmt(import)
        }

        fn classdef(&self, name: &str) -> SyntaxTree {
            let suite = self.node("suite", vec![self.leaf("NEWLINE", "\n")]);
            let classdef = self.node(
                "classdef",
                vec![
                    self.leaf("NAME", "class"),
                    self.leaf("NAME", name),
                    self.leaf("COLON", ":"),
                    suite,
                ],
            );
            self.node("stmt", vec![self.node("compound_stmt", vec![classdef])])
        }
    }

    #[test]
    fn preset_patterns_compile() {
        let set = statement_patterns(&Grammar::python()).unwrap();
        assert_eq!(set.len(), STATEMENT_PATTERNS.len());
        assert_eq!(set.handlers().next(), Some("import"));
        assert!(docstring_pattern(&Grammar::python()).is_ok());
    }

    #[test]
    fn preset_patterns_need_the_python_grammar() {
        let grammar = Grammar::builder().symbol("stmt", 1).build();
        assert!(statement_patterns(&grammar).is_err());
    }

    #[test]
    fn recognizes_simple_assignment() {
        let t = Trees::new();
        let recognizer = StatementRecognizer::python().unwrap();
        let stmt = t.assignment("self.x", "y");

        let (handler, bindings) = recognizer.statements().first_match(&stmt).unwrap();
        assert_eq!(handler, "simple_assignment");
        assert_eq!(bindings.get("comments"), Some(&Bound::Seq(Vec::new())));
        assert_eq!(bindings.get("nl_comment").and_then(Bound::as_text), Some("\n"));

        let lhs = bindings.get("lhs").and_then(Bound::as_tree).unwrap();
        assert_eq!(recognizer.dotted_name(lhs).unwrap().to_string(), "self.x");
        let rhs = bindings.get("rhs").and_then(Bound::as_tree).unwrap();
        assert_eq!(recognizer.dotted_name(rhs).unwrap().to_string(), "y");
    }

    #[test]
    fn recognizes_import_and_classdef() {
        let t = Trees::new();
        let recognizer = StatementRecognizer::python().unwrap();

        let import = t.import("os");
        let (handler, bindings) = recognizer.statements().first_match(&import).unwrap();
        assert_eq!(handler, "import");
        assert_eq!(bindings.get("cmd").and_then(Bound::as_text), Some("import"));
        assert_eq!(bindings.get("names").and_then(Bound::as_seq).map(<[_]>::len), Some(1));

        let class = t.classdef("Widget");
        let (handler, bindings) = recognizer.statements().first_match(&class).unwrap();
        assert_eq!(handler, "classdef");
        assert_eq!(bindings.get("classname").and_then(Bound::as_text), Some("Widget"));
        assert_eq!(bindings.get("bases"), Some(&Bound::Nothing));
    }

    #[test]
    fn suite_recognition_attaches_pseudo_docstrings() {
        let t = Trees::new();
        let recognizer = StatementRecognizer::python().unwrap();
        let suite = vec![
            t.assignment("x", "y"),
            t.string_stmt("\"\"\"The x value.\"\"\""),
            t.import("sys"),
        ];

        let found = recognizer.recognize(&suite);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 0);
        assert_eq!(found[0].handler, "simple_assignment");
        assert_eq!(found[0].pseudo_docstring.as_deref(), Some("The x value."));
        assert_eq!(found[1].index, 2);
        assert_eq!(found[1].pseudo_docstring, None);
    }

    #[test]
    fn dotted_name_rejects_branching_trees() {
        let t = Trees::new();
        let grammar = Grammar::python();
        let simple = t.expression(t.power("a.b.c"));
        assert_eq!(
            dotted_name(&grammar, &simple).unwrap(),
            Some(DottedName::parse("a.b.c").unwrap())
        );

        let call = t.node(
            "power",
            vec![
                t.node("atom", vec![t.leaf("NAME", "f")]),
                t.node("trailer", vec![t.leaf("LPAR", "("), t.leaf("RPAR", ")")]),
            ],
        );
        assert_eq!(dotted_name(&grammar, &call).unwrap(), None);

        let branching = t.node("test", vec![t.power("a"), t.power("b")]);
        assert_eq!(dotted_name(&grammar, &branching).unwrap(), None);
    }

    #[test]
    fn string_literals_decode() {
        assert_eq!(string_literal_value("'abc'").as_deref(), Some("abc"));
        assert_eq!(string_literal_value(r#""a\nb""#).as_deref(), Some("a\nb"));
        assert_eq!(string_literal_value(r"r'a\nb'").as_deref(), Some(r"a\nb"));
        assert_eq!(string_literal_value("'''doc'''").as_deref(), Some("doc"));
        assert_eq!(string_literal_value("u\"it\\'s\"").as_deref(), Some("it's"));
        assert_eq!(string_literal_value("''").as_deref(), Some(""));
        assert_eq!(string_literal_value("x'a'"), None);
        assert_eq!(string_literal_value("42"), None);
    }
}
