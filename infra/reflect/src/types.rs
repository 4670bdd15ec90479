use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Fully-qualified name of a discoverable type (e.g. `app::modules::MetricsModule`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(Arc<str>);

impl TypeName {
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// Identity of a marker a type can carry (the analogue of a type annotation).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(Arc<str>);

impl MarkerId {
    #[must_use]
    pub fn new(marker: impl AsRef<str>) -> Self {
        Self(Arc::from(marker.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(marker: &str) -> Self {
        Self::new(marker)
    }
}

impl From<String> for MarkerId {
    fn from(marker: String) -> Self {
        Self(Arc::from(marker))
    }
}

/// Result of a discovery query, ordered by name.
pub type TypeSet = BTreeSet<TypeName>;

/// Cache key for marker lookups. Equal markers and scopes are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationQuery {
    pub marker: MarkerId,
    pub scope: Arc<str>,
}

impl AnnotationQuery {
    pub fn new(marker: impl Into<MarkerId>, scope: impl AsRef<str>) -> Self {
        Self { marker: marker.into(), scope: Arc::from(scope.as_ref()) }
    }
}

impl fmt::Display for AnnotationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker '{}' in scope '{}'", self.marker, self.scope)
    }
}

/// Cache key for supertype lookups. Equal scopes and supertypes are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SupertypeQuery {
    pub scope: Arc<str>,
    pub supertype: TypeName,
}

impl SupertypeQuery {
    pub fn new(scope: impl AsRef<str>, supertype: impl Into<TypeName>) -> Self {
        Self { scope: Arc::from(scope.as_ref()), supertype: supertype.into() }
    }
}

impl fmt::Display for SupertypeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subtypes of '{}' in scope '{}'", self.supertype, self.scope)
    }
}
