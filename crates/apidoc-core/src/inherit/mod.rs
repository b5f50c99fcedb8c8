//! Inheritance and grouping
//!
//! [`DocInheriter::inherit`] runs two passes over every value reachable from
//! the roots. The first gives each class a `variables` map made of its own
//! members plus copies of every ancestor member it does not declare, and
//! records which ancestor member each declared member overrides. The second
//! computes the sorted and grouped member lists of every namespace.

mod group;
mod mro;

pub use mro::MroCache;

use tracing::debug;

use crate::config::InheritOptions;
use crate::model::{DocArena, ValueId, VarId};

/// Resolves inherited members and presentation order
#[derive(Debug, Clone, Default)]
pub struct DocInheriter {
    options: InheritOptions,
}

impl DocInheriter {
    #[must_use]
    pub fn new(options: InheritOptions) -> Self {
        Self { options }
    }

    /// Run both passes over everything reachable from `roots`
    pub fn inherit(&self, arena: &mut DocArena, roots: &[ValueId]) {
        let reachable = arena.reachable_values(roots);

        let mut mros = MroCache::new();
        for &id in &reachable {
            if arena.value(id).is_class() {
                self.inherit_class_with(arena, id, &mut mros);
            }
        }

        for &id in &reachable {
            if let Some(namespace) = arena.value_mut(id).namespace_doc_mut() {
                namespace.init_sorted_variables();
                namespace.init_groups();
            }
        }
    }

    /// Rebuild one class's `variables` from its own members and its ancestors'
    pub fn inherit_class(&self, arena: &mut DocArena, class: ValueId) {
        self.inherit_class_with(arena, class, &mut MroCache::new());
    }

    fn inherit_class_with(&self, arena: &mut DocArena, class: ValueId, mros: &mut MroCache) {
        let Some(local) = arena.value(class).as_class().map(|c| c.local_variables.clone()) else {
            return;
        };
        let mut variables = local;

        for ancestor in mros.mro(arena, class) {
            if ancestor == class {
                continue;
            }
            let Some(declared) = arena
                .value(ancestor)
                .as_class()
                .map(|c| c.local_variables.clone())
            else {
                continue;
            };

            for (name, ancestor_var) in declared {
                match variables.get(&name) {
                    None => {
                        let copy = arena.variable(ancestor_var).inherited_copy(ancestor_var);
                        let var = arena.add_variable(copy);
                        debug!(%class, member = %name, from = %ancestor, "inherited member");
                        variables.insert(name, var);
                    }
                    Some(&existing) => {
                        if arena.variable_mut(existing).set_overrides(ancestor_var) {
                            debug!(
                                %class,
                                member = %name,
                                ancestor = %ancestor,
                                "member overrides ancestor"
                            );
                            if self.options.inherit_descriptions {
                                inherit_info(arena, existing, ancestor_var);
                            }
                        }
                    }
                }
            }
        }

        if let Some(namespace) = arena.value_mut(class).namespace_doc_mut() {
            namespace.variables = variables;
        }
    }
}

/// Fill an overriding member's descriptions from the member it overrides
fn inherit_info(arena: &mut DocArena, var: VarId, overridden: VarId) {
    let source = arena.variable(overridden);
    let descr = source.descr.clone();
    let value_descr = source.value.and_then(|value| arena.value(value).descr.clone());

    let target = arena.variable_mut(var);
    if target.descr.is_none() {
        target.descr = descr;
    }
    if let Some(value) = target.value {
        let value = arena.value_mut(value);
        if value.descr.is_none() {
            value.descr = value_descr;
        }
    }
}
