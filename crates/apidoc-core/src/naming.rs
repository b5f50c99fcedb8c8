//! Canonical dotted names

use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::model::{DocArena, ValueId, VarId};

/// Name every unnamed value after the first path that reaches it
///
/// Starting from the named roots, namespaces are walked breadth-first and
/// their members in name order, so the shortest, alphabetically first path
/// wins. Members marked as imported are not followed because they do not
/// define their value. Returns the number of names assigned.
pub fn assign_canonical_names(arena: &mut DocArena, roots: &[ValueId]) -> usize {
    let mut seen: HashSet<ValueId> = HashSet::new();
    let mut queue: VecDeque<ValueId> = VecDeque::new();
    for &root in roots {
        if arena.value(root).canonical_name.is_some() && seen.insert(root) {
            queue.push_back(root);
        }
    }

    let mut assigned = 0;
    while let Some(id) = queue.pop_front() {
        let Some(prefix) = arena.value(id).canonical_name.clone() else {
            continue;
        };
        let members: Vec<(String, VarId)> = arena
            .value(id)
            .namespace_doc()
            .map(|ns| ns.variables.iter().map(|(name, &var)| (name.clone(), var)).collect())
            .unwrap_or_default();

        for (name, var) in members {
            let var = arena.variable(var);
            if var.is_imported.is_yes() || var.is_inherited {
                continue;
            }
            let Some(value) = var.value else {
                continue;
            };
            if !seen.insert(value) {
                continue;
            }
            let doc = arena.value_mut(value);
            if doc.canonical_name.is_none() {
                if let Ok(full) = prefix.child(&name) {
                    trace!(%value, name = %full, "assigned canonical name");
                    doc.canonical_name = Some(full);
                    assigned += 1;
                }
            }
            queue.push_back(value);
        }
    }
    assigned
}
