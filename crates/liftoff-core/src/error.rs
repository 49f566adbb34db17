//! Error types for Liftoff

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LiftoffError
pub type Result<T> = std::result::Result<T, LiftoffError>;

/// Main error type for Liftoff operations
#[derive(Debug, Error)]
pub enum LiftoffError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),
}

impl From<SchemaError> for LiftoffError {
    fn from(err: SchemaError) -> Self {
        Self::Config(ConfigError::Schema(err))
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("No release configuration found in {0} or its parents")]
    NotFound(PathBuf),

    /// Failed to parse the file into a document
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Script configuration that needs a JavaScript runtime to evaluate
    #[error("{path} is not a static export: {reason}")]
    DynamicScript { path: PathBuf, reason: String },

    /// package.json without a `release` key
    #[error("{0} has no \"release\" key")]
    MissingReleaseKey(PathBuf),

    /// Document parsed but does not match the schema
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Whether this error is a schema violation (as opposed to I/O or parsing)
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// Structural violations of the release configuration schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The document root is not a mapping
    #[error("Configuration must be a mapping, found {found}")]
    NotAMapping { found: String },

    /// A required field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field has the wrong type
    #[error("Invalid type for {field}: expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: String,
        found: String,
    },

    /// A sequence or string that must not be empty is empty
    #[error("{0} must not be empty")]
    Empty(String),

    /// A branch entry is not a valid branch name pattern
    #[error("Invalid branch name '{name}' at {field}: {reason}")]
    InvalidBranch {
        field: String,
        name: String,
        reason: String,
    },

    /// A branch is declared more than once
    #[error("Branch '{0}' is declared more than once")]
    DuplicateBranch(String),

    /// The repository URL is not a remote address
    #[error("Invalid repositoryUrl '{url}': {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    /// A plugin entry has the wrong shape or identifier
    #[error("Invalid plugin at {field}: {reason}")]
    InvalidPlugin { field: String, reason: String },

    /// The tag format template is unusable
    #[error("Invalid tagFormat '{format}': {reason}")]
    InvalidTagFormat { format: String, reason: String },
}

impl SchemaError {
    /// Dotted path of the offending field, if the error names one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAMapping { .. } => None,
            Self::MissingField(field) | Self::Empty(field) => Some(field.as_str()),
            Self::WrongType { field, .. }
            | Self::InvalidBranch { field, .. }
            | Self::InvalidPlugin { field, .. } => Some(field.as_str()),
            Self::DuplicateBranch(_) => Some("branches"),
            Self::InvalidRepositoryUrl { .. } => Some("repositoryUrl"),
            Self::InvalidTagFormat { .. } => Some("tagFormat"),
        }
    }
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_field() {
        assert_eq!(
            SchemaError::MissingField("branches".to_string()).field(),
            Some("branches")
        );
        assert_eq!(
            SchemaError::DuplicateBranch("main".to_string()).field(),
            Some("branches")
        );
        assert_eq!(
            SchemaError::NotAMapping {
                found: "array".to_string()
            }
            .field(),
            None
        );
    }

    #[test]
    fn test_schema_error_converts_to_config_error() {
        let err: LiftoffError = SchemaError::Empty("plugins".to_string()).into();
        match err {
            LiftoffError::Config(config) => assert!(config.is_schema()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::WrongType {
            field: "plugins[0]".to_string(),
            expected: "string or [name, options] pair".to_string(),
            found: "number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid type for plugins[0]: expected string or [name, options] pair, found number"
        );
    }
}
