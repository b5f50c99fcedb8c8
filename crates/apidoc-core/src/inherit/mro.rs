//! Method resolution order

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{DocArena, ValueId};

impl DocArena {
    /// Linearized ancestors of a class, starting with the class itself
    ///
    /// Uses C3 linearization. When the hierarchy has no consistent C3 order,
    /// or its bases form a cycle, the result is depth-first, left-to-right
    /// order with duplicates skipped. Classes with unknown bases and values
    /// that are not classes contribute no further ancestors.
    #[must_use]
    pub fn mro(&self, class: ValueId) -> Vec<ValueId> {
        MroCache::new().mro(self, class)
    }
}

/// Memoized C3 linearizations
///
/// Each class is linearized at most once per cache. A cache is only valid
/// while no class's `bases` change.
#[derive(Debug, Clone, Default)]
pub struct MroCache {
    linearized: HashMap<ValueId, Option<Vec<ValueId>>>,
    active: Vec<ValueId>,
}

impl MroCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`DocArena::mro`], reusing linearizations computed earlier
    pub fn mro(&mut self, arena: &DocArena, class: ValueId) -> Vec<ValueId> {
        self.c3(arena, class).unwrap_or_else(|| {
            debug!(%class, "no C3 linearization; falling back to depth-first order");
            depth_first(arena, class)
        })
    }

    /// C3 linearization; `None` on cycles or inconsistent orders
    fn c3(&mut self, arena: &DocArena, class: ValueId) -> Option<Vec<ValueId>> {
        if let Some(done) = self.linearized.get(&class) {
            return done.clone();
        }
        // Reached again while its own bases are being linearized
        if self.active.contains(&class) {
            return None;
        }

        self.active.push(class);
        let direct = bases(arena, class).to_vec();
        let mut sequences = Some(Vec::with_capacity(direct.len() + 1));
        for &base in &direct {
            let linearized = self.c3(arena, base);
            sequences = sequences.zip(linearized).map(|(mut seqs, seq)| {
                seqs.push(seq);
                seqs
            });
        }
        self.active.pop();

        let order = sequences.and_then(|mut seqs| {
            seqs.push(direct);
            merge(class, seqs)
        });
        self.linearized.insert(class, order.clone());
        order
    }
}

fn bases(arena: &DocArena, id: ValueId) -> &[ValueId] {
    arena
        .value(id)
        .as_class()
        .and_then(|class| class.bases.as_deref())
        .unwrap_or(&[])
}

/// The C3 merge of the base linearizations and the direct base list
fn merge(class: ValueId, mut sequences: Vec<Vec<ValueId>>) -> Option<Vec<ValueId>> {
    let mut order = vec![class];
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Some(order);
        }
        let head = sequences
            .iter()
            .map(|seq| seq[0])
            .find(|candidate| sequences.iter().all(|seq| !seq[1..].contains(candidate)))?;
        order.push(head);
        for seq in &mut sequences {
            if seq[0] == head {
                seq.remove(0);
            }
        }
    }
}

fn depth_first(arena: &DocArena, class: ValueId) -> Vec<ValueId> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![class];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        order.push(id);
        stack.extend(bases(arena, id).iter().rev().filter(|base| !seen.contains(*base)));
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueDoc;

    fn class(arena: &mut DocArena, bases: &[ValueId]) -> ValueId {
        arena.add_value(ValueDoc::class(Some(bases.to_vec())))
    }

    #[test]
    fn single_inheritance_chain() {
        let mut arena = DocArena::new();
        let a = class(&mut arena, &[]);
        let b = class(&mut arena, &[a]);
        let c = class(&mut arena, &[b]);
        assert_eq!(arena.mro(c), vec![c, b, a]);
    }

    #[test]
    fn diamond_uses_c3() {
        let mut arena = DocArena::new();
        let o = class(&mut arena, &[]);
        let a = class(&mut arena, &[o]);
        let b = class(&mut arena, &[o]);
        let c = class(&mut arena, &[a, b]);
        // Depth-first would visit `o` before `b`
        assert_eq!(arena.mro(c), vec![c, a, b, o]);
    }

    #[test]
    fn unknown_bases_and_non_classes_are_leaves() {
        let mut arena = DocArena::new();
        let unknown = arena.add_value(ValueDoc::class(None));
        let value = arena.add_value(ValueDoc::generic());
        let c = class(&mut arena, &[unknown, value]);
        assert_eq!(arena.mro(c), vec![c, unknown, value]);
    }

    #[test]
    fn inconsistent_order_falls_back() {
        let mut arena = DocArena::new();
        let x = class(&mut arena, &[]);
        let y = class(&mut arena, &[]);
        let a = class(&mut arena, &[x, y]);
        let b = class(&mut arena, &[y, x]);
        let c = class(&mut arena, &[a, b]);
        assert_eq!(arena.mro(c), vec![c, a, x, y, b]);
    }

    #[test]
    fn cyclic_bases_terminate() {
        let mut arena = DocArena::new();
        let a = class(&mut arena, &[]);
        let b = class(&mut arena, &[a]);
        arena.value_mut(a).as_class_mut().unwrap().bases = Some(vec![b]);
        assert_eq!(arena.mro(a), vec![a, b]);
    }

    #[test]
    fn diamond_ladder_is_linear() {
        // c_k derives from a_k and b_k, which both derive from c_{k-1}
        let mut arena = DocArena::new();
        let mut top = class(&mut arena, &[]);
        let mut expected = vec![top];
        for _ in 0..64 {
            let a = class(&mut arena, &[top]);
            let b = class(&mut arena, &[top]);
            top = class(&mut arena, &[a, b]);
            let mut level = vec![top, a, b];
            level.append(&mut expected);
            expected = level;
        }

        assert_eq!(arena.mro(top), expected);
        assert_eq!(arena.mro(top).len(), 1 + 3 * 64);
    }

    #[test]
    fn cache_is_reused_across_classes() {
        let mut arena = DocArena::new();
        let o = class(&mut arena, &[]);
        let a = class(&mut arena, &[o]);
        let b = class(&mut arena, &[a]);
        let x = class(&mut arena, &[]);
        let y = class(&mut arena, &[x]);

        let mut cache = MroCache::new();
        assert_eq!(cache.mro(&arena, b), vec![b, a, o]);
        assert_eq!(cache.mro(&arena, a), vec![a, o]);
        assert_eq!(cache.linearized.len(), 3);

        let bad = class(&mut arena, &[x, y]);
        assert_eq!(cache.mro(&arena, bad), vec![bad, x, y]);
        assert_eq!(cache.linearized.get(&bad), Some(&None));
        assert!(cache.active.is_empty());
    }
}
