//! Error types for package resolution and rule-set construction.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatcherError>;

#[derive(Debug, Error)]
pub enum MatcherError {
    /// No package boundary above the module path
    #[error("no enclosing package found for {}", path.display())]
    Resolution { path: PathBuf },

    /// A package descriptor exists but cannot be read
    #[error("invalid package descriptor {}: {message}", path.display())]
    Descriptor { path: PathBuf, message: String },

    /// The transform policy cannot be turned into a rule set
    #[error("invalid transform rule set: {specifier}: {reason}")]
    InvalidRuleSet { specifier: String, reason: String },
}

impl MatcherError {
    pub(crate) fn invalid(specifier: impl Into<String>, reason: impl Into<String>) -> Self {
        MatcherError::InvalidRuleSet {
            specifier: specifier.into(),
            reason: reason.into(),
        }
    }
}
