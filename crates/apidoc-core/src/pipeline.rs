//! End-to-end documentation build: merge, name, configure, inherit

use tracing::debug;

use crate::config::ApidocConfig;
use crate::inherit::DocInheriter;
use crate::merge::DocMerger;
use crate::model::{DocArena, ValueId};
use crate::naming::assign_canonical_names;

/// The two views of one module; either may be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePair {
    /// Root built by introspection
    pub introspected: Option<ValueId>,
    /// Root built by parsing source text
    pub parsed: Option<ValueId>,
}

impl SourcePair {
    #[must_use]
    pub fn new(introspected: Option<ValueId>, parsed: Option<ValueId>) -> Self {
        Self {
            introspected,
            parsed,
        }
    }
}

/// Runs every pass over a pair of source graphs
#[derive(Debug, Clone, Default)]
pub struct DocBuilder {
    config: ApidocConfig,
}

impl DocBuilder {
    #[must_use]
    pub fn new(config: ApidocConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ApidocConfig {
        &self.config
    }

    /// Build the final graph and return its roots
    ///
    /// For each pair the introspected root is the merge destination. A pair
    /// with only one side uses that side unchanged; an empty pair is skipped.
    pub fn build(&self, arena: &mut DocArena, sources: &[SourcePair]) -> Vec<ValueId> {
        let merger = DocMerger::new(self.config.merge.clone());
        let roots: Vec<ValueId> = sources
            .iter()
            .filter_map(|pair| match (pair.introspected, pair.parsed) {
                (Some(introspected), parsed) => Some(merger.merge(arena, introspected, parsed)),
                (None, parsed) => parsed,
            })
            .collect();

        let named = assign_canonical_names(arena, &roots);
        let configured = self.config.apply(arena, &roots);
        DocInheriter::new(self.config.inherit.clone()).inherit(arena, &roots);

        debug!(
            roots = roots.len(),
            named,
            configured,
            values = arena.value_count(),
            "documentation graph built"
        );
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DottedName, ValueDoc, VariableDoc};

    fn module(name: &str) -> ValueDoc {
        ValueDoc::module().with_name(DottedName::parse(name).unwrap())
    }

    #[test]
    fn single_sided_pairs_pass_through() {
        let mut arena = DocArena::new();
        let parsed = arena.add_value(module("p"));
        let introspected = arena.add_value(module("i"));

        let sources = [
            SourcePair::new(None, Some(parsed)),
            SourcePair::default(),
            SourcePair::new(Some(introspected), None),
        ];
        let roots = DocBuilder::default().build(&mut arena, &sources);
        assert_eq!(roots, vec![parsed, introspected]);
    }

    #[test]
    fn build_merges_before_grouping() {
        let mut arena = DocArena::new();
        let introspected = arena.add_value(module("m"));
        let parsed = arena.add_value(ValueDoc::module());
        let var = arena.add_member(introspected, VariableDoc::new("x"));
        let confirmed = VariableDoc::new("x").with_imported(false).with_docstring("doc");
        arena.add_member(parsed, confirmed);

        let sources = [SourcePair::new(Some(introspected), Some(parsed))];
        let roots = DocBuilder::default().build(&mut arena, &sources);

        assert_eq!(roots, vec![introspected]);
        assert_eq!(arena.variable(var).docstring.as_deref(), Some("doc"));
        let ns = arena.value(introspected).namespace_doc().unwrap();
        assert_eq!(ns.sorted_variables, vec![var]);
    }
}
