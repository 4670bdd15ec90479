use crate::types::{MarkerId, TypeName, TypeSet};
use regex::Regex;
use std::borrow::Cow;
use std::collections::{BTreeSet, VecDeque};
use std::fmt::Debug;
use tracing::trace;

/// Failures raised by a [`TypeScanner`] implementation.
#[modwire_derive::modwire_error]
pub enum ScanError {
    /// The scope pattern is not a valid regular expression.
    #[error("Invalid scope pattern{}: {source}", format_context(.context))]
    Pattern { source: regex::Error, context: Option<Cow<'static, str>> },

    /// The underlying type universe could not be scanned.
    #[error("Scan failed{}: {message}", format_context(.context))]
    Failed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// The expensive type-introspection facility wrapped by [`TypeQueryCache`](crate::TypeQueryCache).
///
/// A scope that matches nothing yields an empty set, not an error.
pub trait TypeScanner: Debug + Send + Sync {
    /// Types within `scope` carrying `marker`.
    ///
    /// # Errors
    /// Implementation-defined; propagated to every caller waiting on the query.
    fn types_annotated_with(&self, scope: &str, marker: &MarkerId) -> Result<TypeSet, ScanError>;

    /// Types within `scope` that are (transitively) subtypes of `supertype`.
    ///
    /// # Errors
    /// Implementation-defined; propagated to every caller waiting on the query.
    fn subtypes_of(&self, scope: &str, supertype: &TypeName) -> Result<TypeSet, ScanError>;
}

/// Static description of one type in a [`TypeCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: TypeName,
    pub markers: BTreeSet<MarkerId>,
    pub supertypes: BTreeSet<TypeName>,
}

impl TypeInfo {
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self { name: name.into(), markers: BTreeSet::new(), supertypes: BTreeSet::new() }
    }

    #[must_use]
    pub fn marker(mut self, marker: impl Into<MarkerId>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    #[must_use]
    pub fn supertype(mut self, supertype: impl Into<TypeName>) -> Self {
        self.supertypes.insert(supertype.into());
        self
    }
}

/// In-memory type universe populated by explicit registration.
///
/// Scope patterns are regular expressions anchored at the start of the type name,
/// so `app::modules` selects everything under that path and `.*` selects all.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: Vec<TypeInfo>,
}

impl TypeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type, replacing any previous entry with the same name.
    #[must_use]
    pub fn with(mut self, info: TypeInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn insert(&mut self, info: TypeInfo) {
        match self.types.iter_mut().find(|t| t.name == info.name) {
            Some(existing) => *existing = info,
            None => self.types.push(info),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn in_scope<'a>(&'a self, scope: &str) -> Result<impl Iterator<Item = &'a TypeInfo>, ScanError> {
        let pattern = Regex::new(&format!("^(?:{scope})"))
            .context(format!("Compiling scope '{scope}'"))?;
        Ok(self.types.iter().filter(move |t| pattern.is_match(t.name.as_str())))
    }
}

impl TypeScanner for TypeCatalog {
    fn types_annotated_with(&self, scope: &str, marker: &MarkerId) -> Result<TypeSet, ScanError> {
        let found: TypeSet =
            self.in_scope(scope)?.filter(|t| t.markers.contains(marker)).map(|t| t.name.clone()).collect();
        trace!(%marker, scope, count = found.len(), "Catalog marker scan");
        Ok(found)
    }

    fn subtypes_of(&self, scope: &str, supertype: &TypeName) -> Result<TypeSet, ScanError> {
        // Close over the whole catalog first: an out-of-scope intermediate still links its subtypes.
        let mut reachable = BTreeSet::new();
        let mut pending = VecDeque::from([supertype.clone()]);
        while let Some(parent) = pending.pop_front() {
            for child in self.types.iter().filter(|t| t.supertypes.contains(&parent)) {
                if reachable.insert(child.name.clone()) {
                    pending.push_back(child.name.clone());
                }
            }
        }

        let found: TypeSet =
            self.in_scope(scope)?.filter(|t| reachable.contains(&t.name)).map(|t| t.name.clone()).collect();
        trace!(%supertype, scope, count = found.len(), "Catalog subtype scan");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeInfo::new("app::modules::Metrics").marker("module").supertype("core::Module"))
            .with(TypeInfo::new("app::modules::Storage").marker("module").supertype("app::Base"))
            .with(TypeInfo::new("app::Base").supertype("core::Module"))
            .with(TypeInfo::new("lib::Helper").marker("helper"))
    }

    #[test]
    fn test_marker_scan_respects_scope() {
        let catalog = catalog();
        let marker = MarkerId::new("module");

        let all = catalog.types_annotated_with(".*", &marker).unwrap();
        assert_eq!(all.len(), 2);

        let scoped = catalog.types_annotated_with("lib::", &marker).unwrap();
        assert!(scoped.is_empty());
    }

    #[test]
    fn test_unmatched_scope_is_empty_not_error() {
        let found = catalog()
            .types_annotated_with("6f1c1a2e-0b7d-4d43-9f0e-7c1d2b0e9a11", &MarkerId::new("module"))
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_invalid_scope_is_pattern_error() {
        let err = catalog().types_annotated_with("app::(", &MarkerId::new("module")).unwrap_err();
        assert!(matches!(err, ScanError::Pattern { .. }));
    }

    #[test]
    fn test_subtypes_are_transitive() {
        let found = catalog().subtypes_of(".*", &TypeName::new("core::Module")).unwrap();
        let names: Vec<&str> = found.iter().map(TypeName::as_str).collect();
        assert_eq!(names, ["app::Base", "app::modules::Metrics", "app::modules::Storage"]);

        let scoped = catalog().subtypes_of("app::modules", &TypeName::new("core::Module")).unwrap();
        assert_eq!(scoped.len(), 2);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut catalog = catalog();
        catalog.insert(TypeInfo::new("lib::Helper").marker("module"));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.types_annotated_with(".*", &MarkerId::new("module")).unwrap().len(), 3);
    }
}
