//! Per-environment module lists merged across compatible tiers.

use modwire_domain::Environment;
use modwire_kernel::config::{ListKind, ModuleConfigLoader, ModuleSource, ModuleTable};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TierLists {
    lists: Arc<BTreeMap<Environment, Vec<String>>>,
}

impl TierLists {
    fn from_table(table: &ModuleTable, kind: ListKind) -> Self {
        Self { lists: Arc::new(table.lists(kind).clone()) }
    }

    fn merged_for(&self, env: Environment) -> BTreeSet<String> {
        self.lists
            .iter()
            .filter(|(tier, _)| env.is_compatible(**tier))
            .flat_map(|(_, values)| values.iter().cloned())
            .collect()
    }
}

/// Exclusion patterns per tier (`<Tier>.filter`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfiguration {
    lists: TierLists,
}

impl FilterConfiguration {
    #[must_use]
    pub fn from_table(table: &ModuleTable) -> Self {
        Self { lists: TierLists::from_table(table, ListKind::Filter) }
    }

    /// Reads the layered sources; an absent configuration yields no patterns.
    #[must_use]
    pub fn load(loader: ModuleConfigLoader) -> Self {
        Self::from(loader.load())
    }

    /// Union of the patterns of every tier compatible with `env`.
    #[must_use]
    pub fn filters_for(&self, env: Environment) -> BTreeSet<String> {
        self.lists.merged_for(env)
    }
}

impl From<ModuleSource> for FilterConfiguration {
    fn from(source: ModuleSource) -> Self {
        Self::from_table(&source.into_table())
    }
}

/// Fully-qualified module names per tier (`<Tier>.static`) that replace scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticModuleConfiguration {
    lists: TierLists,
}

impl StaticModuleConfiguration {
    #[must_use]
    pub fn from_table(table: &ModuleTable) -> Self {
        Self { lists: TierLists::from_table(table, ListKind::Static) }
    }

    /// Reads the layered sources; an absent configuration yields no static modules.
    #[must_use]
    pub fn load(loader: ModuleConfigLoader) -> Self {
        Self::from(loader.load())
    }

    /// Union of the module names of every tier compatible with `env`.
    #[must_use]
    pub fn modules_for(&self, env: Environment) -> BTreeSet<String> {
        self.lists.merged_for(env)
    }
}

impl From<ModuleSource> for StaticModuleConfiguration {
    fn from(source: ModuleSource) -> Self {
        Self::from_table(&source.into_table())
    }
}
