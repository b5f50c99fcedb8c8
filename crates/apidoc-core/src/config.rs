//! `apidoc.toml` configuration: merge toggles, inheritance toggles and
//! per-namespace sort/group specifications.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::model::{DocArena, DottedName, DottedNameError, GroupSpec, NamePattern, ValueId};

/// Errors that can occur when loading or applying configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid namespace name '{0}': {1}")]
    InvalidName(String, DottedNameError),

    #[error("invalid member pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApidocConfig {
    /// Which fields the merger may fill.
    pub merge: MergeOptions,

    /// Inheritance behavior.
    pub inherit: InheritOptions,

    /// Sort and group specifications, one entry per namespace.
    #[serde(rename = "namespace")]
    namespaces: Vec<NamespaceConfig>,

    /// `namespaces` with names and patterns compiled, filled by [`ApidocConfig::parse`].
    #[serde(skip)]
    specs: Vec<NamespaceSpec>,
}

/// Toggles for individual merge rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MergeOptions {
    /// Copy a value's syntax tree when the destination has none.
    pub valuedoc_ast: bool,

    /// Refine parameter default values by position.
    pub arg_default_ast: bool,

    /// Copy `is_imported` and mark unconfirmed module members as imported.
    pub is_imported: bool,

    /// Copy variable docstrings.
    pub var_docstrings: bool,

    /// Add instance variables only one source knows about.
    pub instance_vars: bool,

    /// Copy or merge class base lists.
    pub bases: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            valuedoc_ast: true,
            arg_default_ast: true,
            is_imported: true,
            var_docstrings: true,
            instance_vars: true,
            bases: true,
        }
    }
}

/// Toggles for the inheritance pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct InheritOptions {
    /// Copy descriptions from overridden ancestor members.
    pub inherit_descriptions: bool,
}

impl Default for InheritOptions {
    fn default() -> Self {
        Self {
            inherit_descriptions: true,
        }
    }
}

/// Presentation settings for one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Dotted name of the namespace.
    pub name: String,

    /// Member patterns giving the presentation order.
    #[serde(default)]
    pub sort: Option<Vec<String>>,

    /// Named groups, in display order.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// A named group of members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    pub members: Vec<String>,
}

/// A compiled `[[namespace]]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSpec {
    pub name: DottedName,
    pub sort_spec: Option<Vec<NamePattern>>,
    pub group_specs: Vec<GroupSpec>,
}

impl ApidocConfig {
    /// Load a configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a configuration from a TOML string.
    ///
    /// Namespace names and member patterns are compiled here, once.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a name or pattern is malformed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.specs = config
            .namespaces
            .iter()
            .map(NamespaceConfig::compile)
            .collect::<Result<_, _>>()?;
        Ok(config)
    }

    /// The `[[namespace]]` entries as written
    #[must_use]
    pub fn namespaces(&self) -> &[NamespaceConfig] {
        &self.namespaces
    }

    /// The compiled `[[namespace]]` entries
    #[must_use]
    pub fn specs(&self) -> &[NamespaceSpec] {
        &self.specs
    }

    /// Install sort and group specifications on the matching namespaces
    ///
    /// Names are resolved through [`DocArena::lookup`]. Entries that do not
    /// resolve to a namespace are skipped. Returns how many were applied.
    pub fn apply(&self, arena: &mut DocArena, roots: &[ValueId]) -> usize {
        let mut applied = 0;
        for spec in &self.specs {
            let Some(namespace) = arena
                .lookup(&spec.name, roots)
                .and_then(|id| arena.value_mut(id).namespace_doc_mut())
            else {
                debug!(namespace = %spec.name, "configured namespace not found");
                continue;
            };
            namespace.sort_spec.clone_from(&spec.sort_spec);
            namespace.group_specs.clone_from(&spec.group_specs);
            applied += 1;
        }
        applied
    }
}

impl FromStr for ApidocConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl NamespaceConfig {
    fn compile(&self) -> Result<NamespaceSpec, ConfigError> {
        let name = DottedName::parse(&self.name)
            .map_err(|e| ConfigError::InvalidName(self.name.clone(), e))?;
        let sort_spec = self
            .sort
            .as_ref()
            .map(|patterns| {
                patterns
                    .iter()
                    .map(|p| compile_pattern(p))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        let group_specs = self
            .groups
            .iter()
            .map(|group| {
                let members = group
                    .members
                    .iter()
                    .map(|p| compile_pattern(p))
                    .collect::<Result<_, _>>()?;
                Ok(GroupSpec {
                    name: group.name.clone(),
                    members,
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(NamespaceSpec {
            name,
            sort_spec,
            group_specs,
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<NamePattern, ConfigError> {
    NamePattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
