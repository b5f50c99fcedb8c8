//! Value documentation and its variants

use std::collections::BTreeMap;
use std::rc::Rc;

use super::name::DottedName;
use super::pattern::{GroupSpec, NamePattern};
use super::{ValueId, VarId};
use crate::syntax::SyntaxTree;

/// Documentation for a runtime or syntactic value
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDoc {
    pub canonical_name: Option<DottedName>,
    pub repr: Option<String>,
    /// Parse tree of the value's defining expression, shared between sources
    pub ast: Option<Rc<SyntaxTree>>,
    pub docstring: Option<String>,
    pub descr: Option<String>,
    pub kind: ValueKind,
}

/// The closed set of value variants
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Generic,
    Namespace(NamespaceDoc),
    Module(ModuleDoc),
    Class(ClassDoc),
    Routine(RoutineDoc),
}

/// Members of a namespace and their presentation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceDoc {
    /// All members by name; for classes this includes inherited copies
    pub variables: BTreeMap<String, VarId>,
    pub sort_spec: Option<Vec<NamePattern>>,
    pub group_specs: Vec<GroupSpec>,
    /// Computed by the grouping pass
    pub sorted_variables: Vec<VarId>,
    /// Computed by the grouping pass; always starts with the ungrouped `""`
    pub group_names: Vec<String>,
    /// Computed by the grouping pass
    pub groups: BTreeMap<String, Vec<VarId>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleDoc {
    pub namespace: NamespaceDoc,
    /// The containing package module, if any
    pub package: Option<ValueId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDoc {
    pub namespace: NamespaceDoc,
    /// Direct bases in declaration order; `None` when they could not be determined
    pub bases: Option<Vec<ValueId>>,
    /// Members declared by the class itself
    pub local_variables: BTreeMap<String, VarId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutineDoc {
    pub args: Vec<ArgDoc>,
}

/// A positional parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDoc {
    pub name: String,
    pub default: Option<ValueId>,
}

impl ArgDoc {
    #[must_use]
    pub fn new(name: impl Into<String>, default: Option<ValueId>) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

impl ValueDoc {
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        Self {
            canonical_name: None,
            repr: None,
            ast: None,
            docstring: None,
            descr: None,
            kind,
        }
    }

    #[must_use]
    pub fn generic() -> Self {
        Self::new(ValueKind::Generic)
    }

    #[must_use]
    pub fn namespace() -> Self {
        Self::new(ValueKind::Namespace(NamespaceDoc::default()))
    }

    #[must_use]
    pub fn module() -> Self {
        Self::new(ValueKind::Module(ModuleDoc::default()))
    }

    /// A class with known (possibly empty) or unknown bases
    #[must_use]
    pub fn class(bases: Option<Vec<ValueId>>) -> Self {
        Self::new(ValueKind::Class(ClassDoc {
            bases,
            ..ClassDoc::default()
        }))
    }

    #[must_use]
    pub fn routine(args: Vec<ArgDoc>) -> Self {
        Self::new(ValueKind::Routine(RoutineDoc { args }))
    }

    #[must_use]
    pub fn with_name(mut self, name: DottedName) -> Self {
        self.canonical_name = Some(name);
        self
    }

    #[must_use]
    pub fn with_repr(mut self, repr: impl Into<String>) -> Self {
        self.repr = Some(repr.into());
        self
    }

    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    #[must_use]
    pub fn with_descr(mut self, descr: impl Into<String>) -> Self {
        self.descr = Some(descr.into());
        self
    }

    #[must_use]
    pub fn with_ast(mut self, ast: Rc<SyntaxTree>) -> Self {
        self.ast = Some(ast);
        self
    }

    #[must_use]
    pub fn with_package(mut self, package: ValueId) -> Self {
        if let ValueKind::Module(module) = &mut self.kind {
            module.package = Some(package);
        }
        self
    }

    /// Variant name used in diagnostics and the pretty printer
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Generic => "ValueDoc",
            ValueKind::Namespace(_) => "NamespaceDoc",
            ValueKind::Module(_) => "ModuleDoc",
            ValueKind::Class(_) => "ClassDoc",
            ValueKind::Routine(_) => "RoutineDoc",
        }
    }

    /// True when both values are the same variant
    #[must_use]
    pub fn same_kind(&self, other: &ValueDoc) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
    }

    #[must_use]
    pub fn namespace_doc(&self) -> Option<&NamespaceDoc> {
        match &self.kind {
            ValueKind::Namespace(ns) => Some(ns),
            ValueKind::Module(module) => Some(&module.namespace),
            ValueKind::Class(class) => Some(&class.namespace),
            ValueKind::Generic | ValueKind::Routine(_) => None,
        }
    }

    pub fn namespace_doc_mut(&mut self) -> Option<&mut NamespaceDoc> {
        match &mut self.kind {
            ValueKind::Namespace(ns) => Some(ns),
            ValueKind::Module(module) => Some(&mut module.namespace),
            ValueKind::Class(class) => Some(&mut class.namespace),
            ValueKind::Generic | ValueKind::Routine(_) => None,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&ClassDoc> {
        match &self.kind {
            ValueKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassDoc> {
        match &mut self.kind {
            ValueKind::Class(class) => Some(class),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_routine(&self) -> Option<&RoutineDoc> {
        match &self.kind {
            ValueKind::Routine(routine) => Some(routine),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self.kind, ValueKind::Class(_))
    }

    /// Members this value declares itself
    ///
    /// For classes this is `local_variables`; for other namespaces it is
    /// `variables`.
    #[must_use]
    pub fn declared_members(&self) -> Option<&BTreeMap<String, VarId>> {
        match &self.kind {
            ValueKind::Class(class) => Some(&class.local_variables),
            ValueKind::Namespace(ns) => Some(&ns.variables),
            ValueKind::Module(module) => Some(&module.namespace.variables),
            ValueKind::Generic | ValueKind::Routine(_) => None,
        }
    }
}
