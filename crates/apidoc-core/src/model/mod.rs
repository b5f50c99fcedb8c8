//! Arena-backed documentation graph
//!
//! Every [`ValueDoc`] and [`VariableDoc`] from both information sources lives
//! in one [`DocArena`] and is addressed by a stable [`ValueId`] or [`VarId`].
//! Relations between nodes (a variable's value, a class's bases, a
//! parameter's default) are stored as ids, so cycles and shared values are
//! cheap to represent and compare by identity.

mod name;
mod pattern;
mod pretty;
mod value;
mod variable;

pub use name::{DottedName, DottedNameError};
pub use pattern::{GroupSpec, NamePattern};
pub use pretty::PrettyOptions;
pub use value::{ArgDoc, ClassDoc, ModuleDoc, NamespaceDoc, RoutineDoc, ValueDoc, ValueKind};
pub use variable::{Tristate, VariableDoc};

use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Identity of a value node in a [`DocArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub usize);

/// Identity of a variable node in a [`DocArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var{}", self.0)
    }
}

/// Owner of every documentation node
///
/// Nodes are never removed. Ids handed out by one arena are only meaningful
/// for that arena; indexing with a foreign id panics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocArena {
    values: Vec<ValueDoc>,
    variables: Vec<VariableDoc>,
}

impl DocArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, value: ValueDoc) -> ValueId {
        self.values.push(value);
        ValueId(self.values.len() - 1)
    }

    pub fn add_variable(&mut self, variable: VariableDoc) -> VarId {
        self.variables.push(variable);
        VarId(self.variables.len() - 1)
    }

    #[must_use]
    pub fn value(&self, id: ValueId) -> &ValueDoc {
        &self.values[id.0]
    }

    pub fn value_mut(&mut self, id: ValueId) -> &mut ValueDoc {
        &mut self.values[id.0]
    }

    #[must_use]
    pub fn variable(&self, id: VarId) -> &VariableDoc {
        &self.variables[id.0]
    }

    pub fn variable_mut(&mut self, id: VarId) -> &mut VariableDoc {
        &mut self.variables[id.0]
    }

    #[must_use]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Declare `var` as a member of the namespace `ns` under the variable's name
    ///
    /// Class members are recorded as both local and visible. Returns false if
    /// `ns` is not a namespace.
    pub fn bind(&mut self, ns: ValueId, var: VarId) -> bool {
        let name = self.variables[var.0].name.clone();
        let value = &mut self.values[ns.0];
        if let Some(class) = value.as_class_mut() {
            class.local_variables.insert(name.clone(), var);
        }
        match value.namespace_doc_mut() {
            Some(namespace) => {
                namespace.variables.insert(name, var);
                true
            }
            None => false,
        }
    }

    /// Create a variable, bind it into `ns` and return its id
    pub fn add_member(&mut self, ns: ValueId, variable: VariableDoc) -> VarId {
        let var = self.add_variable(variable);
        self.bind(ns, var);
        var
    }

    /// Visible member of a namespace by name
    #[must_use]
    pub fn member(&self, ns: ValueId, name: &str) -> Option<VarId> {
        self.value(ns)
            .namespace_doc()
            .and_then(|namespace| namespace.variables.get(name).copied())
    }

    /// Value bound to a namespace member
    #[must_use]
    pub fn member_value(&self, ns: ValueId, name: &str) -> Option<ValueId> {
        self.member(ns, name).and_then(|var| self.variable(var).value)
    }

    /// Every value reachable from the roots, breadth-first, each exactly once
    ///
    /// Edges followed: namespace members' values, class bases, parameter
    /// defaults and a module's package.
    #[must_use]
    pub fn reachable_values(&self, roots: &[ValueId]) -> Vec<ValueId> {
        let mut seen: HashSet<ValueId> = HashSet::new();
        let mut queue: VecDeque<ValueId> = VecDeque::new();
        let mut order = Vec::new();

        for &root in roots {
            if seen.insert(root) {
                queue.push_back(root);
            }
        }

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for next in self.value_edges(id) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        order
    }

    fn value_edges(&self, id: ValueId) -> Vec<ValueId> {
        let value = self.value(id);
        let mut edges = Vec::new();
        if let Some(namespace) = value.namespace_doc() {
            edges.extend(
                namespace
                    .variables
                    .values()
                    .filter_map(|&var| self.variable(var).value),
            );
        }
        match &value.kind {
            ValueKind::Class(class) => {
                edges.extend(
                    class
                        .local_variables
                        .values()
                        .filter_map(|&var| self.variable(var).value),
                );
                edges.extend(class.bases.iter().flatten().copied());
            }
            ValueKind::Routine(routine) => {
                edges.extend(routine.args.iter().filter_map(|arg| arg.default));
            }
            ValueKind::Module(module) => edges.extend(module.package),
            ValueKind::Generic | ValueKind::Namespace(_) => {}
        }
        edges
    }

    /// Resolve a dotted name through namespace members
    ///
    /// The first root whose canonical name is a prefix of `name` is walked
    /// member by member for the remaining identifiers.
    #[must_use]
    pub fn lookup(&self, name: &DottedName, roots: &[ValueId]) -> Option<ValueId> {
        roots.iter().find_map(|&root| {
            let root_name = self.value(root).canonical_name.as_ref()?;
            let rest = name.pieces().strip_prefix(root_name.pieces())?;
            rest.iter()
                .try_fold(root, |current, piece| self.member_value(current, piece))
        })
    }
}
