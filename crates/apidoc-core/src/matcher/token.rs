//! Token types for the pattern lexer

use logos::Logos;

/// The kind of token found in pattern source text
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum PatternToken {
    /// Opens a node pattern: `(`
    #[token("(")]
    Open,

    /// Closes a node pattern: `)`
    #[token(")")]
    Close,

    /// Matches any remaining children: `...`
    #[token("...")]
    Ellipsis,

    /// Lowercase grammar symbol name (interior node)
    #[regex(r"[a-z][a-z0-9_]*", priority = 3)]
    Symbol,

    /// Uppercase token kind name (leaf)
    #[regex(r"[A-Z][A-Z0-9_]*", priority = 3)]
    TokenName,

    /// Identifier of mixed case; never valid on its own
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 1)]
    Word,

    /// Quoted literal text: `'name'`
    #[regex(r"'([^'\\]|\\.)*'")]
    Literal,

    /// Binding suffix: `:name`
    #[regex(r":[ \t\r\n]*[A-Za-z_][A-Za-z0-9_]*")]
    Binding,

    /// Optional suffix: `?`
    #[token("?")]
    Question,

    /// Repetition suffix, or wildcard tag directly after `(`: `*`
    #[token("*")]
    Star,
}

impl PatternToken {
    /// Human-readable description for error messages
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            PatternToken::Open => "'('",
            PatternToken::Close => "')'",
            PatternToken::Ellipsis => "'...'",
            PatternToken::Symbol => "symbol name",
            PatternToken::TokenName => "token name",
            PatternToken::Word => "identifier",
            PatternToken::Literal => "quoted literal",
            PatternToken::Binding => "binding",
            PatternToken::Question => "'?'",
            PatternToken::Star => "'*'",
        }
    }
}

/// Strip the quotes and backslash escapes from a literal token
pub(crate) fn unquote(lexeme: &str) -> String {
    let inner = &lexeme[1..lexeme.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Extract the variable name from a binding token
pub(crate) fn binding_name(lexeme: &str) -> &str {
    lexeme.trim_start_matches(':').trim_start()
}
