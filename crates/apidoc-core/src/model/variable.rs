//! Named bindings inside namespaces

use super::{ValueId, VarId};

/// A yes/no flag that may not have been determined by a front end yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tristate {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Tristate {
    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == Tristate::Unknown
    }

    /// True only for a definite `Yes`
    #[must_use]
    pub fn is_yes(self) -> bool {
        self == Tristate::Yes
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value {
            Tristate::Yes
        } else {
            Tristate::No
        }
    }
}

/// Documentation for a name bound inside a namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDoc {
    pub name: String,
    /// The bound value; shared, never owned
    pub value: Option<ValueId>,
    pub docstring: Option<String>,
    pub descr: Option<String>,
    pub is_imported: Tristate,
    pub is_instvar: Tristate,
    /// Nearest ancestor member this one shadows; written at most once
    overrides: Option<VarId>,
    pub is_inherited: bool,
}

impl VariableDoc {
    /// Create a variable with every optional field unknown
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            docstring: None,
            descr: None,
            is_imported: Tristate::Unknown,
            is_instvar: Tristate::Unknown,
            overrides: None,
            is_inherited: false,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: ValueId) -> Self {
        self.value = Some(value);
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
    pub fn with_imported(mut self, is_imported: bool) -> Self {
        self.is_imported = is_imported.into();
        self
    }

    #[must_use]
    pub fn with_instvar(mut self, is_instvar: bool) -> Self {
        self.is_instvar = is_instvar.into();
        self
    }

    #[must_use]
    pub fn overrides(&self) -> Option<VarId> {
        self.overrides
    }

    /// Record the overridden ancestor member
    ///
    /// Returns false and leaves the field untouched if it was already set.
    pub fn set_overrides(&mut self, ancestor: VarId) -> bool {
        if self.overrides.is_some() {
            return false;
        }
        self.overrides = Some(ancestor);
        true
    }

    /// A copy of this member for a subclass that does not declare it
    ///
    /// Every field is listed so that a new field must be considered here.
    #[must_use]
    pub fn inherited_copy(&self, from: VarId) -> Self {
        let VariableDoc {
            name,
            value,
            docstring,
            descr,
            is_imported,
            is_instvar,
            overrides: _,
            is_inherited: _,
        } = self;
        Self {
            name: name.clone(),
            value: *value,
            docstring: docstring.clone(),
            descr: descr.clone(),
            is_imported: *is_imported,
            is_instvar: *is_instvar,
            overrides: Some(from),
            is_inherited: true,
        }
    }
}
