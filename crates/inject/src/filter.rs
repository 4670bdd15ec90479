use crate::error::{InjectError, InjectErrorExt};
use regex::Regex;
use tracing::info;

/// Rejects modules whose fully-qualified name matches any exclusion pattern.
///
/// A pattern has to match the whole name; inline flags such as `(?i)` apply per pattern.
#[derive(Debug, Clone, Default)]
pub struct ModuleFilter {
    patterns: Vec<(String, Regex)>,
}

impl ModuleFilter {
    /// Compiles the exclusion patterns.
    ///
    /// # Errors
    /// Returns [`InjectError::Pattern`] naming the first pattern that does not compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, InjectError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| -> Result<(String, Regex), InjectError> {
                let pattern = pattern.into();
                let regex = Regex::new(&format!("^(?:{pattern})$"))
                    .context(format!("Compiling '{pattern}'"))?;
                Ok((pattern, regex))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// `false` if `name` matches any exclusion pattern.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        match self.patterns.iter().find(|(_, regex)| regex.is_match(name)) {
            Some((pattern, _)) => {
                info!(module = name, pattern = %pattern, "Filtered out module");
                false
            },
            None => true,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
