//! Sorting and grouping of namespace members for presentation

use std::collections::{BTreeMap, HashMap};

use crate::model::{NamePattern, NamespaceDoc, VarId};

impl NamespaceDoc {
    /// Compute `sorted_variables` from `sort_spec` and `variables`
    ///
    /// Literal entries of the sort spec place that member; wildcard entries
    /// place every still-unplaced match in name order. Whatever is left
    /// follows alphabetically.
    pub fn init_sorted_variables(&mut self) {
        let mut unplaced: BTreeMap<&str, VarId> = self
            .variables
            .iter()
            .map(|(name, &var)| (name.as_str(), var))
            .collect();
        let mut sorted = Vec::with_capacity(unplaced.len());

        for pattern in self.sort_spec.iter().flatten() {
            match pattern {
                NamePattern::Literal(name) => {
                    if let Some(var) = unplaced.remove(name.as_str()) {
                        sorted.push(var);
                    }
                }
                NamePattern::Wildcard { .. } => {
                    let matching: Vec<&str> = unplaced
                        .keys()
                        .copied()
                        .filter(|name| pattern.matches(name))
                        .collect();
                    sorted.extend(matching.iter().filter_map(|name| unplaced.remove(name)));
                }
            }
        }
        sorted.extend(unplaced.into_values());
        self.sorted_variables = sorted;
    }

    /// Partition `sorted_variables` into `groups` following `group_specs`
    ///
    /// # Panics
    ///
    /// Panics if `sorted_variables` is out of date with `variables`.
    pub fn init_groups(&mut self) {
        assert_eq!(
            self.sorted_variables.len(),
            self.variables.len(),
            "sorted_variables must be rebuilt after variables change"
        );

        self.group_names = std::iter::once(String::new())
            .chain(self.group_specs.iter().map(|spec| spec.name.clone()))
            .collect();
        self.groups = self.group_names.iter().map(|name| (name.clone(), Vec::new())).collect();

        if self.group_specs.is_empty() {
            self.groups.insert(String::new(), self.sorted_variables.clone());
            return;
        }

        let mut direct: HashMap<&str, &str> = HashMap::new();
        let mut wildcards: Vec<(&str, &NamePattern)> = Vec::new();
        for spec in &self.group_specs {
            for member in &spec.members {
                match member {
                    NamePattern::Literal(name) => {
                        direct.insert(name.as_str(), spec.name.as_str());
                    }
                    NamePattern::Wildcard { .. } => wildcards.push((spec.name.as_str(), member)),
                }
            }
        }

        let names: HashMap<VarId, &str> = self
            .variables
            .iter()
            .map(|(name, &var)| (var, name.as_str()))
            .collect();
        let name_of = |var: &VarId| names.get(var).copied().unwrap_or_default();

        let mut groups: BTreeMap<&str, Vec<VarId>> =
            self.group_names.iter().map(|name| (name.as_str(), Vec::new())).collect();
        for var in &self.sorted_variables {
            let group = direct.get(name_of(var)).copied().unwrap_or("");
            groups.entry(group).or_default().push(*var);
        }

        // Wildcards only pull from the ungrouped bucket, in declaration order
        for (group, pattern) in wildcards {
            let ungrouped = groups.entry("").or_default();
            let mut moved = Vec::new();
            for index in (0..ungrouped.len()).rev() {
                if pattern.matches(name_of(&ungrouped[index])) {
                    moved.push(ungrouped.remove(index));
                }
            }
            moved.reverse();
            groups.entry(group).or_default().extend(moved);
        }

        self.groups = groups
            .into_iter()
            .map(|(name, members)| (name.to_string(), members))
            .collect();
    }
}
