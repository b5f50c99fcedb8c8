//! Apidoc Core - documentation model engine
//!
//! This crate provides:
//! - Syntax: concrete syntax trees and grammar name tables
//! - Matcher: a tree pattern language with optional, repeated and bound sub-patterns
//! - Model: an arena-backed graph of value and variable documentation
//! - Merge: combining an introspected graph with a parsed graph
//! - Inherit: method resolution order, inherited members, sorting and grouping
//! - Config: TOML configuration for merge toggles and namespace presentation

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Concrete syntax trees consumed by the matcher
pub mod syntax;

/// Tree pattern compilation and matching
pub mod matcher;

/// Documentation graph
pub mod model;

/// Graph merging
pub mod merge;

/// Inheritance, sorting and grouping
pub mod inherit;

/// Canonical dotted names
pub mod naming;

/// Configuration file support
pub mod config;

/// Full build over both sources
pub mod pipeline;

pub use config::{ApidocConfig, ConfigError, InheritOptions, MergeOptions, NamespaceSpec};
pub use inherit::DocInheriter;
pub use matcher::{Bindings, Bound, MatchResult, PatternError, PatternErrorKind, TreePattern};
pub use merge::DocMerger;
pub use model::{DocArena, DottedName, ValueDoc, ValueId, VarId, VariableDoc};
pub use pipeline::{DocBuilder, SourcePair};
pub use syntax::{Grammar, SyntaxTree};
