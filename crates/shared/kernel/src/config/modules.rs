//! Key-list module configuration: `<Tier>.filter` and `<Tier>.static` lists per environment.

use super::ENV_SEPARATOR;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment as EnvSource, File, FileFormat, Value};
use modwire_domain::Environment;
use modwire_domain::constants::{ENV_PREFIX, FILTER_KEY, MODULE_CONFIG_FILE, STATIC_KEY};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Separator for list values given as a single string (env overlays).
const LIST_SEPARATOR: char = ',';

/// Which per-tier list a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// `<Tier>.filter`: exclusion patterns.
    Filter,
    /// `<Tier>.static`: fully-qualified module names replacing discovery.
    Static,
}

impl ListKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Filter => FILTER_KEY,
            Self::Static => STATIC_KEY,
        }
    }
}

/// A list value as written in a file (array) or an overlay (comma-separated string).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeyList {
    Many(Vec<String>),
    One(String),
}

impl KeyList {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::Many(items) => items,
            Self::One(raw) => raw
                .split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TierEntry {
    #[serde(default)]
    filter: Option<KeyList>,
    #[serde(default, rename = "static")]
    statics: Option<KeyList>,
}

/// Per-tier lists, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleTable {
    filter: BTreeMap<Environment, Vec<String>>,
    statics: BTreeMap<Environment, Vec<String>>,
}

impl ModuleTable {
    /// Configured list for exactly `env` (no merging).
    #[must_use]
    pub fn get(&self, env: Environment, kind: ListKind) -> &[String] {
        self.lists(kind).get(&env).map_or(&[], Vec::as_slice)
    }

    /// All configured lists of one kind, keyed by tier.
    #[must_use]
    pub const fn lists(&self, kind: ListKind) -> &BTreeMap<Environment, Vec<String>> {
        match kind {
            ListKind::Filter => &self.filter,
            ListKind::Static => &self.statics,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filter.values().all(Vec::is_empty) && self.statics.values().all(Vec::is_empty)
    }

    fn lists_mut(&mut self, kind: ListKind) -> &mut BTreeMap<Environment, Vec<String>> {
        match kind {
            ListKind::Filter => &mut self.filter,
            ListKind::Static => &mut self.statics,
        }
    }

    /// Appends to a list; used for spellings of one tier within a single layer.
    fn extend(&mut self, env: Environment, kind: ListKind, values: Vec<String>) {
        self.lists_mut(kind).entry(env).or_default().extend(values);
    }

    /// Applies a higher-precedence layer: every list it defines replaces ours.
    fn overlay(&mut self, upper: Self) {
        self.filter.extend(upper.filter);
        self.statics.extend(upper.statics);
    }

    fn log_entries(&self) {
        for (env, patterns) in &self.filter {
            for pattern in patterns {
                info!(%env, %pattern, "Found module filter pattern");
            }
        }
        for (env, modules) in &self.statics {
            for module in modules {
                info!(%env, %module, "Found static module");
            }
        }
    }
}

/// Outcome of reading the module configuration sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    /// At least one source contributed tier lists.
    Loaded(ModuleTable),
    /// Nothing usable was found; callers treat this as an empty configuration.
    Absent,
}

impl ModuleSource {
    #[must_use]
    pub fn into_table(self) -> ModuleTable {
        match self {
            Self::Loaded(table) => table,
            Self::Absent => ModuleTable::default(),
        }
    }
}

/// Builder for the layered module configuration.
///
/// Layers, lowest precedence first: the optional file, environment overlays,
/// then programmatic overrides set through [`ModuleConfigLoader::set`]. For each
/// tier and list kind the highest layer defining it wins outright.
#[must_use = "loaders do nothing unless you call .load()"]
#[derive(Debug, Clone)]
pub struct ModuleConfigLoader {
    file: PathBuf,
    env_prefix: String,
    env_vars: Option<HashMap<String, String>>,
    overrides: Vec<(Environment, ListKind, Vec<String>)>,
}

impl Default for ModuleConfigLoader {
    fn default() -> Self {
        Self {
            file: PathBuf::from(MODULE_CONFIG_FILE),
            env_prefix: ENV_PREFIX.to_owned(),
            env_vars: None,
            overrides: Vec::new(),
        }
    }
}

impl ModuleConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TOML file to read. A missing file is not an error.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = path.into();
        self
    }

    /// Sets the prefix of environment overlays.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Reads overlays from `vars` instead of the process environment.
    pub fn env_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.env_vars = Some(vars);
        self
    }

    /// Replaces the list for `env`/`kind` regardless of file and overlay content.
    /// A later call for the same pair replaces an earlier one.
    pub fn set<I, S>(mut self, env: Environment, kind: ListKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.push((env, kind, values.into_iter().map(Into::into).collect()));
        self
    }

    /// Reads every layer once. Unreadable layers are logged and skipped; if nothing
    /// usable remains the result is [`ModuleSource::Absent`].
    pub fn load(self) -> ModuleSource {
        let mut table = self.file_layer();
        table.overlay(self.env_layer());
        table.overlay(self.override_layer());

        if table.is_empty() {
            return ModuleSource::Absent;
        }
        table.log_entries();
        ModuleSource::Loaded(table)
    }

    fn file_layer(&self) -> ModuleTable {
        if !file_exists(&self.file) {
            warn!(path = %self.file.display(), "Module configuration file not found, no filters or static modules from file");
            return ModuleTable::default();
        }
        let source = File::from(self.file.as_path()).format(FileFormat::Toml).required(true);
        match read_layer(Config::builder().add_source(source)) {
            Ok(table) => table,
            Err(err) => {
                warn!(path = %self.file.display(), error = %err, "Error loading module configuration file, ignoring it");
                ModuleTable::default()
            },
        }
    }

    fn env_layer(&self) -> ModuleTable {
        let source = EnvSource::with_prefix(&self.env_prefix)
            .separator(ENV_SEPARATOR)
            .source(self.env_vars.clone());
        match read_layer(Config::builder().add_source(source)) {
            Ok(table) => table,
            Err(err) => {
                warn!(prefix = %self.env_prefix, error = %err, "Error loading module configuration overlays, ignoring them");
                ModuleTable::default()
            },
        }
    }

    fn override_layer(&self) -> ModuleTable {
        let mut table = ModuleTable::default();
        for (env, kind, values) in &self.overrides {
            table.lists_mut(*kind).insert(*env, values.clone());
        }
        table
    }
}

fn file_exists(path: &Path) -> bool {
    path.is_file()
}

fn read_layer(builder: ConfigBuilder<DefaultState>) -> Result<ModuleTable, config::ConfigError> {
    let root = builder.build()?.try_deserialize::<HashMap<String, Value>>()?;
    Ok(collect_table(root))
}

fn collect_table(root: HashMap<String, Value>) -> ModuleTable {
    let mut table = ModuleTable::default();

    // Sorted so tiers spelled with different case merge in a stable order.
    let ordered: BTreeMap<String, Value> = root.into_iter().collect();
    for (key, value) in ordered {
        let Ok(env) = Environment::from_str(&key) else {
            debug!(key = %key, "Ignoring non-tier configuration key");
            continue;
        };
        let entry = match value.try_deserialize::<TierEntry>() {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%env, error = %err, "Ignoring malformed tier configuration");
                continue;
            },
        };
        if let Some(filter) = entry.filter {
            table.extend(env, ListKind::Filter, filter.into_vec());
        }
        if let Some(statics) = entry.statics {
            table.extend(env, ListKind::Static, statics.into_vec());
        }
    }

    table
}
