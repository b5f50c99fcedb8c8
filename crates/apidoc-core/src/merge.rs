//! Merging two documentation graphs that describe the same program
//!
//! One graph typically comes from introspection and the other from parsing
//! source text. [`DocMerger::merge`] fills fields that are missing in the
//! destination graph with information from the source graph, in place. It
//! never allocates nodes; it only copies values and ids.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::config::MergeOptions;
use crate::model::{DocArena, Tristate, ValueId, ValueKind, VarId};

/// Merges a source graph into a destination graph
#[derive(Debug, Clone, Default)]
pub struct DocMerger {
    options: MergeOptions,
}

impl DocMerger {
    #[must_use]
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Fill `dst` from `src` and return `dst`
    ///
    /// An absent source, or a source of a different variant, leaves the
    /// destination untouched.
    pub fn merge(&self, arena: &mut DocArena, dst: ValueId, src: Option<ValueId>) -> ValueId {
        if let Some(src) = src {
            MergePass::new(arena, &self.options).value(dst, src);
        }
        dst
    }

    /// Fill the variable `dst` from `src` and return `dst`
    pub fn merge_variable(&self, arena: &mut DocArena, dst: VarId, src: Option<VarId>) -> VarId {
        if let Some(src) = src {
            MergePass::new(arena, &self.options).variable(dst, src);
        }
        dst
    }
}

/// State for one top-level merge call
struct MergePass<'a> {
    arena: &'a mut DocArena,
    options: &'a MergeOptions,
    seen_values: HashSet<(ValueId, ValueId)>,
    seen_vars: HashSet<(VarId, VarId)>,
}

impl<'a> MergePass<'a> {
    fn new(arena: &'a mut DocArena, options: &'a MergeOptions) -> Self {
        Self {
            arena,
            options,
            seen_values: HashSet::new(),
            seen_vars: HashSet::new(),
        }
    }

    fn value(&mut self, dst: ValueId, src: ValueId) {
        if dst == src {
            return;
        }
        let (dst_doc, src_doc) = (self.arena.value(dst), self.arena.value(src));
        if !dst_doc.same_kind(src_doc) {
            debug!(
                %dst,
                %src,
                dst_kind = dst_doc.kind_name(),
                src_kind = src_doc.kind_name(),
                "skipping merge of mismatched variants"
            );
            return;
        }
        if !self.seen_values.insert((dst, src)) {
            return;
        }

        self.fill_value_fields(dst, src);

        let value = self.arena.value(dst);
        let is_module = matches!(value.kind, ValueKind::Module(_));
        let is_class = value.is_class();
        let is_routine = value.as_routine().is_some();
        if value.namespace_doc().is_some() {
            self.members(dst, src);
        }
        if is_module {
            self.mark_unconfirmed_imported(dst);
        }
        if is_class {
            self.instance_variables(dst, src);
            self.bases(dst, src);
        }
        if is_routine {
            self.arg_defaults(dst, src);
        }
    }

    fn fill_value_fields(&mut self, dst: ValueId, src: ValueId) {
        let src_doc = self.arena.value(src);
        let ast = src_doc.ast.clone();
        let canonical_name = src_doc.canonical_name.clone();
        let repr = src_doc.repr.clone();
        let docstring = src_doc.docstring.clone();

        let dst_doc = self.arena.value_mut(dst);
        if self.options.valuedoc_ast && dst_doc.ast.is_none() {
            dst_doc.ast = ast;
        }
        if dst_doc.canonical_name.is_none() {
            dst_doc.canonical_name = canonical_name;
        }
        if dst_doc.repr.is_none() {
            dst_doc.repr = repr;
        }
        if dst_doc.docstring.is_none() {
            dst_doc.docstring = docstring;
        }
    }

    /// Merge every member the destination declares with its namesake in the source
    fn members(&mut self, dst: ValueId, src: ValueId) {
        let src_members = declared(self.arena, src);
        let pairs: Vec<(VarId, Option<VarId>)> = declared(self.arena, dst)
            .into_iter()
            .map(|(name, var)| (var, src_members.get(&name).copied()))
            .collect();
        for (dst_var, src_var) in pairs {
            if let Some(src_var) = src_var {
                self.variable(dst_var, src_var);
            }
        }
    }

    /// Members not confirmed by both sources arrived through a wildcard import
    fn mark_unconfirmed_imported(&mut self, dst: ValueId) {
        if !self.options.is_imported {
            return;
        }
        for (_, var) in declared(self.arena, dst) {
            let var = self.arena.variable_mut(var);
            if var.is_imported.is_unknown() {
                var.is_imported = Tristate::Yes;
            }
        }
    }

    fn instance_variables(&mut self, dst: ValueId, src: ValueId) {
        if !self.options.instance_vars {
            return;
        }
        let additions: Vec<(String, VarId)> = declared(self.arena, src)
            .into_iter()
            .filter(|&(_, var)| self.arena.variable(var).is_instvar.is_yes())
            .collect();
        let Some(class) = self.arena.value_mut(dst).as_class_mut() else {
            return;
        };
        for (name, var) in additions {
            if !class.local_variables.contains_key(&name) {
                class.local_variables.insert(name.clone(), var);
                class.namespace.variables.entry(name).or_insert(var);
            }
        }
    }

    fn bases(&mut self, dst: ValueId, src: ValueId) {
        if !self.options.bases {
            return;
        }
        let dst_bases = self.arena.value(dst).as_class().and_then(|c| c.bases.clone());
        let Some(src_bases) = self.arena.value(src).as_class().and_then(|c| c.bases.clone()) else {
            return;
        };

        let Some(dst_bases) = dst_bases else {
            if let Some(class) = self.arena.value_mut(dst).as_class_mut() {
                class.bases = Some(src_bases);
            }
            return;
        };

        if dst_bases.len() != src_bases.len() {
            info!(
                %dst,
                dst_len = dst_bases.len(),
                src_len = src_bases.len(),
                "not merging base lists of different lengths"
            );
            return;
        }
        let conflict = dst_bases.iter().zip(&src_bases).find(|&(&d, &s)| {
            match (&self.arena.value(d).canonical_name, &self.arena.value(s).canonical_name) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            }
        });
        if let Some((&d, &s)) = conflict {
            info!(
                %dst,
                dst_base = %d,
                src_base = %s,
                "not merging base lists with conflicting names"
            );
            return;
        }
        for (d, s) in dst_bases.into_iter().zip(src_bases) {
            self.value(d, s);
        }
    }

    /// Pair parameters by position and refine defaults both sides know about
    fn arg_defaults(&mut self, dst: ValueId, src: ValueId) {
        if !self.options.arg_default_ast {
            return;
        }
        let Some(src_args) = self.arena.value(src).as_routine().map(|r| r.args.clone()) else {
            return;
        };
        let ValueKind::Routine(routine) = &mut self.arena.value_mut(dst).kind else {
            return;
        };
        if routine.args.len() != src_args.len() {
            return;
        }
        for (dst_arg, src_arg) in routine.args.iter_mut().zip(src_args) {
            if dst_arg.default.is_some() && src_arg.default.is_some() {
                dst_arg.default = src_arg.default;
            }
        }
    }

    fn variable(&mut self, dst: VarId, src: VarId) {
        if dst == src || !self.seen_vars.insert((dst, src)) {
            return;
        }
        let src_var = self.arena.variable(src);
        let is_imported = src_var.is_imported;
        let docstring = src_var.docstring.clone();
        let src_value = src_var.value;

        let dst_var = self.arena.variable_mut(dst);
        if self.options.is_imported && dst_var.is_imported.is_unknown() {
            dst_var.is_imported = is_imported;
        }
        if self.options.var_docstrings && dst_var.docstring.is_none() {
            dst_var.docstring = docstring;
        }
        if let (Some(dst_value), Some(src_value)) = (dst_var.value, src_value) {
            self.value(dst_value, src_value);
        }
    }
}

/// Snapshot of the members a namespace declares itself
fn declared(arena: &DocArena, id: ValueId) -> BTreeMap<String, VarId> {
    arena
        .value(id)
        .declared_members()
        .cloned()
        .unwrap_or_default()
}
