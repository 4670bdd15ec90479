use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Deployment tier a module or configuration entry applies to.
///
/// `All` is the wildcard tier. Concrete tiers never match each other directly,
/// so [`Environment::is_compatible`] is reflexive and symmetric but not transitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    All,
    Prod,
    Test,
}

impl Environment {
    /// Symmetric compatibility used for configuration merging.
    ///
    /// ```rust
    /// use modwire_domain::Environment;
    ///
    /// assert!(Environment::All.is_compatible(Environment::Prod));
    /// assert!(Environment::Prod.is_compatible(Environment::All));
    /// assert!(!Environment::Prod.is_compatible(Environment::Test));
    /// ```
    #[must_use]
    pub fn is_compatible(self, other: Self) -> bool {
        self == other || self == Self::All || other == Self::All
    }

    /// Returns `true` if `self` is compatible with any of `others`.
    #[must_use]
    pub fn is_compatible_with_any(self, others: &[Self]) -> bool {
        others.iter().any(|other| self.is_compatible(*other))
    }

    /// Eligibility of a module declared for `declared` when `self` is requested.
    ///
    /// A module declared for `All` is admitted everywhere, a tier-specific module
    /// only by its own tier. A request for `All` therefore admits only
    /// `All`-declared modules, unlike [`Environment::is_compatible`].
    #[must_use]
    pub fn admits(self, declared: Self) -> bool {
        declared == self || declared == Self::All
    }

    /// Returns `true` if any of the `declared` tiers is admitted by `self`.
    #[must_use]
    pub fn admits_any(self, declared: &[Self]) -> bool {
        declared.iter().any(|env| self.admits(*env))
    }
}
