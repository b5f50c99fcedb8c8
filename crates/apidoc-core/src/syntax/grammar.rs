//! Symbol and token name tables

use std::collections::HashMap;

use super::Tag;

/// Token names of the preset grammar, in tag order starting at 0
const PYTHON_TOKENS: &[&str] = &[
    "ENDMARKER",
    "NAME",
    "NUMBER",
    "STRING",
    "NEWLINE",
    "INDENT",
    "DEDENT",
    "LPAR",
    "RPAR",
    "LSQB",
    "RSQB",
    "COLON",
    "COMMA",
    "SEMI",
    "PLUS",
    "MINUS",
    "STAR",
    "SLASH",
    "VBAR",
    "AMPER",
    "LESS",
    "GREATER",
    "EQUAL",
    "DOT",
    "PERCENT",
    "BACKQUOTE",
    "LBRACE",
    "RBRACE",
    "EQEQUAL",
    "NOTEQUAL",
    "LESSEQUAL",
    "GREATEREQUAL",
    "TILDE",
    "CIRCUMFLEX",
    "LEFTSHIFT",
    "RIGHTSHIFT",
    "DOUBLESTAR",
    "PLUSEQUAL",
    "MINEQUAL",
    "STAREQUAL",
    "SLASHEQUAL",
    "PERCENTEQUAL",
    "AMPEREQUAL",
    "VBAREQUAL",
    "CIRCUMFLEXEQUAL",
    "LEFTSHIFTEQUAL",
    "RIGHTSHIFTEQUAL",
    "DOUBLESTAREQUAL",
    "DOUBLESLASH",
    "DOUBLESLASHEQUAL",
    "AT",
    "OP",
    "COMMENT",
    "NL",
];

/// First tag used for grammar symbols
const SYMBOL_BASE: Tag = 256;

/// Symbol names of the preset grammar, in tag order starting at `SYMBOL_BASE`
const PYTHON_SYMBOLS: &[&str] = &[
    "single_input",
    "file_input",
    "eval_input",
    "decorator",
    "decorators",
    "funcdef",
    "parameters",
    "varargslist",
    "fpdef",
    "fplist",
    "stmt",
    "simple_stmt",
    "small_stmt",
    "expr_stmt",
    "augassign",
    "print_stmt",
    "del_stmt",
    "pass_stmt",
    "flow_stmt",
    "break_stmt",
    "continue_stmt",
    "return_stmt",
    "yield_stmt",
    "raise_stmt",
    "import_stmt",
    "import_name",
    "import_from",
    "import_as_name",
    "dotted_as_name",
    "import_as_names",
    "dotted_as_names",
    "dotted_name",
    "global_stmt",
    "exec_stmt",
    "assert_stmt",
    "compound_stmt",
    "if_stmt",
    "while_stmt",
    "for_stmt",
    "try_stmt",
    "except_clause",
    "suite",
    "test",
    "and_test",
    "not_test",
    "comparison",
    "comp_op",
    "expr",
    "xor_expr",
    "and_expr",
    "shift_expr",
    "arith_expr",
    "term",
    "factor",
    "power",
    "atom",
    "listmaker",
    "testlist_gexp",
    "lambdef",
    "trailer",
    "subscriptlist",
    "subscript",
    "sliceop",
    "exprlist",
    "testlist",
    "testlist_safe",
    "dictmaker",
    "classdef",
    "arglist",
    "argument",
];

/// Name tables mapping pattern identifiers to tree tags
///
/// Symbol names are lowercase and name interior nodes; token names are
/// uppercase and name leaves. One token kind may be marked "name-like": quoted
/// `'text'` patterns match leaves of that kind with the given text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    symbols: HashMap<String, Tag>,
    tokens: HashMap<String, Tag>,
    names: HashMap<Tag, String>,
    name_token: Option<Tag>,
}

impl Grammar {
    /// Start building a custom grammar
    #[must_use]
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// The preset grammar used by the statement recognizers
    ///
    /// Tokens are numbered from 0 and symbols from 256, following the layout
    /// of a classic LL(1) Python parse tree.
    #[must_use]
    pub fn python() -> Self {
        let mut builder = Grammar::builder();
        for (tag, name) in (0..).zip(PYTHON_TOKENS) {
            builder = builder.token(*name, tag);
        }
        for (tag, name) in (SYMBOL_BASE..).zip(PYTHON_SYMBOLS) {
            builder = builder.symbol(*name, tag);
        }
        builder.name_token(1).build()
    }

    /// Look up a symbol tag by name
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<Tag> {
        self.symbols.get(name).copied()
    }

    /// Look up a token tag by name
    #[must_use]
    pub fn token(&self, name: &str) -> Option<Tag> {
        self.tokens.get(name).copied()
    }

    /// Name of a tag, for diagnostics
    #[must_use]
    pub fn tag_name(&self, tag: Tag) -> Option<&str> {
        self.names.get(&tag).map(String::as_str)
    }

    /// The token kind matched by quoted literal patterns
    #[must_use]
    pub fn name_token(&self) -> Option<Tag> {
        self.name_token
    }

    /// Returns true if leaves with this tag hold identifiers
    #[must_use]
    pub fn is_name_like(&self, tag: Tag) -> bool {
        self.name_token == Some(tag)
    }
}

/// Builder for [`Grammar`]
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    /// Register a symbol (interior node) name
    #[must_use]
    pub fn symbol(mut self, name: impl Into<String>, tag: Tag) -> Self {
        let name = name.into();
        self.grammar.names.insert(tag, name.clone());
        self.grammar.symbols.insert(name, tag);
        self
    }

    /// Register a token (leaf) name
    #[must_use]
    pub fn token(mut self, name: impl Into<String>, tag: Tag) -> Self {
        let name = name.into();
        self.grammar.names.insert(tag, name.clone());
        self.grammar.tokens.insert(name, tag);
        self
    }

    /// Mark a token kind as name-like
    #[must_use]
    pub fn name_token(mut self, tag: Tag) -> Self {
        self.grammar.name_token = Some(tag);
        self
    }

    #[must_use]
    pub fn build(self) -> Grammar {
        self.grammar
    }
}
