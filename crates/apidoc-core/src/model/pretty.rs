//! Indented tree rendering of documentation nodes, for debugging

use std::collections::HashSet;

use super::{DocArena, Tristate, ValueId, ValueKind, VarId};

/// Longest scalar rendering before it is cut short
const MAX_SCALAR_WIDTH: usize = 40;

/// Options for [`DocArena::pp`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyOptions {
    /// How many node levels to descend; `None` means unlimited
    pub depth: Option<usize>,
    /// Field names to leave out; `"id"` drops node ids from headers
    pub exclude: Vec<String>,
    /// Insert spacer lines between fields
    pub doublespace: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            depth: Some(2),
            exclude: Vec::new(),
            doublespace: false,
        }
    }
}

impl PrettyOptions {
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            depth: None,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn excluding<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(fields.into_iter().map(Into::into));
        self
    }

    fn excludes(&self, field: &str) -> bool {
        self.exclude.iter().any(|f| f == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Node {
    Value(ValueId),
    Var(VarId),
}

enum Field {
    Scalar(String),
    Doc(Node),
    List(Vec<Item>),
    Map(Vec<(String, Item)>),
}

enum Item {
    Doc(Node),
    Text(String),
}

impl DocArena {
    /// Render a value and its reachable fields as a `+-` tree
    #[must_use]
    pub fn pp(&self, id: ValueId, options: &PrettyOptions) -> String {
        Printer {
            arena: self,
            options,
            visiting: HashSet::new(),
        }
        .node(Node::Value(id), options.depth)
    }

    /// Render a variable and its reachable fields as a `+-` tree
    #[must_use]
    pub fn pp_variable(&self, id: VarId, options: &PrettyOptions) -> String {
        Printer {
            arena: self,
            options,
            visiting: HashSet::new(),
        }
        .node(Node::Var(id), options.depth)
    }
}

struct Printer<'a> {
    arena: &'a DocArena,
    options: &'a PrettyOptions,
    visiting: HashSet<Node>,
}

impl Printer<'_> {
    fn node(&mut self, node: Node, depth: Option<usize>) -> String {
        if depth == Some(0) || self.visiting.contains(&node) {
            return match self.label(node) {
                Some(label) => format!("{label}..."),
                None => "...".to_string(),
            };
        }
        self.visiting.insert(node);

        let mut out = self.header(node);
        let fields = self.fields(node);
        let child_depth = depth.map(|d| d - 1);
        for (index, (name, field)) in fields.iter().enumerate() {
            let is_last = index + 1 == fields.len();
            if self.options.doublespace {
                out.push_str("\n |");
            }
            out.push_str("\n +- ");
            out.push_str(name);
            match field {
                Field::Scalar(text) => {
                    out.push_str(" = ");
                    out.push_str(text);
                }
                Field::Doc(child) => {
                    let rendered = self.node(*child, child_depth);
                    out.push_str(&self.nested(&rendered, is_last));
                }
                Field::List(items) => {
                    let entries: Vec<String> =
                        items.iter().map(|item| self.item(item, child_depth)).collect();
                    out.push_str(&self.entries(&entries, is_last));
                }
                Field::Map(items) => {
                    let entries: Vec<String> = items
                        .iter()
                        .map(|(key, item)| format!("{key} => {}", self.item(item, child_depth)))
                        .collect();
                    out.push_str(&self.entries(&entries, is_last));
                }
            }
        }

        self.visiting.remove(&node);
        out
    }

    fn item(&mut self, item: &Item, depth: Option<usize>) -> String {
        match item {
            Item::Doc(node) => self.node(*node, depth),
            Item::Text(text) => text.clone(),
        }
    }

    fn nested(&self, rendered: &str, is_last: bool) -> String {
        let rail = if is_last { ' ' } else { '|' };
        let mut out = String::new();
        if self.options.doublespace {
            out.push_str(&format!("\n {rail}  |  "));
        }
        out.push_str(&format!("\n {rail}  +- "));
        out.push_str(&indent(rendered, &format!("\n {rail}    ")));
        out
    }

    fn entries(&self, entries: &[String], is_last: bool) -> String {
        let rail = if is_last { ' ' } else { '|' };
        let mut out = String::new();
        for (index, entry) in entries.iter().enumerate() {
            let inner = if index + 1 == entries.len() { ' ' } else { '|' };
            if self.options.doublespace {
                out.push_str(&format!("\n {rail}  |"));
            }
            out.push_str(&format!("\n {rail}  +- "));
            out.push_str(&indent(entry, &format!("\n {rail}  {inner} ")));
        }
        out
    }

    fn label(&self, node: Node) -> Option<String> {
        match node {
            Node::Value(id) => {
                let value = self.arena.value(id);
                value.canonical_name.as_ref().map(ToString::to_string)
            }
            Node::Var(id) => Some(self.arena.variable(id).name.clone()),
        }
    }

    fn header(&self, node: Node) -> String {
        let (kind, id) = match node {
            Node::Value(id) => (self.arena.value(id).kind_name(), id.to_string()),
            Node::Var(id) => ("VariableDoc", id.to_string()),
        };
        if self.options.excludes("id") {
            kind.to_string()
        } else {
            format!("{kind} {id}")
        }
    }

    fn fields(&self, node: Node) -> Vec<(&'static str, Field)> {
        let mut fields = match node {
            Node::Value(id) => self.value_fields(id),
            Node::Var(id) => self.variable_fields(id),
        };
        fields.retain(|(name, _)| !self.options.excludes(name));
        fields
    }

    fn value_fields(&self, id: ValueId) -> Vec<(&'static str, Field)> {
        let value = self.arena.value(id);
        let mut fields = Vec::new();
        if let Some(name) = &value.canonical_name {
            fields.push(("canonical_name", Field::Scalar(name.to_string())));
        }
        if let Some(repr) = &value.repr {
            fields.push(("repr", scalar(repr)));
        }
        if let Some(docstring) = &value.docstring {
            fields.push(("docstring", scalar(docstring)));
        }
        if let Some(descr) = &value.descr {
            fields.push(("descr", scalar(descr)));
        }
        if let ValueKind::Class(class) = &value.kind {
            if let Some(bases) = &class.bases {
                if !bases.is_empty() {
                    let items = bases.iter().map(|&base| Item::Doc(Node::Value(base))).collect();
                    fields.push(("bases", Field::List(items)));
                }
            }
        }
        if let ValueKind::Module(module) = &value.kind {
            if let Some(package) = module.package {
                fields.push(("package", Field::Doc(Node::Value(package))));
            }
        }
        if let ValueKind::Routine(routine) = &value.kind {
            if !routine.args.is_empty() {
                let items = routine
                    .args
                    .iter()
                    .map(|arg| match arg.default {
                        Some(default) => (arg.name.clone(), Item::Doc(Node::Value(default))),
                        None => (arg.name.clone(), Item::Text("<no default>".to_string())),
                    })
                    .collect();
                fields.push(("args", Field::Map(items)));
            }
        }
        if let Some(namespace) = value.namespace_doc() {
            if !namespace.variables.is_empty() {
                let items = namespace
                    .variables
                    .iter()
                    .map(|(name, &var)| (name.clone(), Item::Doc(Node::Var(var))))
                    .collect();
                fields.push(("variables", Field::Map(items)));
            }
            if let Some(spec) = &namespace.sort_spec {
                let items = spec.iter().map(|p| Item::Text(p.to_string())).collect();
                fields.push(("sort_spec", Field::List(items)));
            }
            if !namespace.group_specs.is_empty() {
                let items = namespace
                    .group_specs
                    .iter()
                    .map(|group| {
                        let members: Vec<String> =
                            group.members.iter().map(ToString::to_string).collect();
                        (group.name.clone(), Item::Text(members.join(", ")))
                    })
                    .collect();
                fields.push(("group_specs", Field::Map(items)));
            }
        }
        fields
    }

    fn variable_fields(&self, id: VarId) -> Vec<(&'static str, Field)> {
        let var = self.arena.variable(id);
        let mut fields = Vec::new();
        if let Some(value) = var.value {
            fields.push(("value", Field::Doc(Node::Value(value))));
        }
        if let Some(docstring) = &var.docstring {
            fields.push(("docstring", scalar(docstring)));
        }
        if let Some(descr) = &var.descr {
            fields.push(("descr", scalar(descr)));
        }
        if var.is_imported != Tristate::Unknown {
            fields.push(("is_imported", Field::Scalar(format!("{:?}", var.is_imported))));
        }
        if var.is_instvar != Tristate::Unknown {
            fields.push(("is_instvar", Field::Scalar(format!("{:?}", var.is_instvar))));
        }
        if let Some(overrides) = var.overrides() {
            fields.push(("overrides", Field::Doc(Node::Var(overrides))));
        }
        if var.is_inherited {
            fields.push(("is_inherited", Field::Scalar("true".to_string())));
        }
        fields
    }
}

/// Continue every line after the first with `prefix`
fn indent(rendered: &str, prefix: &str) -> String {
    rendered.split('\n').collect::<Vec<_>>().join(prefix)
}

/// Debug-quoted text, cut short when long
fn scalar(text: &str) -> Field {
    let quoted = format!("{text:?}");
    if quoted.chars().count() < MAX_SCALAR_WIDTH {
        return Field::Scalar(quoted);
    }
    let cut: String = quoted.chars().take(MAX_SCALAR_WIDTH - 4).collect();
    Field::Scalar(format!("{cut}..."))
}
