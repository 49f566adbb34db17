//! Exit codes for the CLI

use liftoff_core::{ConfigError, GitError, LiftoffError, SchemaError};

/// General error
pub const ERROR: i32 = 1;

/// Configuration error: missing file, unparseable file or schema violation
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Validation found errors (or warnings under `--strict`)
pub const VALIDATION_ERROR: i32 = 5;

/// Map an error to the exit code it should produce
pub fn for_error(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(liftoff) = cause.downcast_ref::<LiftoffError>() {
            return match liftoff {
                LiftoffError::Config(_) => CONFIG_ERROR,
                LiftoffError::Git(_) => GIT_ERROR,
            };
        }
        if cause.is::<ConfigError>() || cause.is::<SchemaError>() {
            return CONFIG_ERROR;
        }
        if cause.is::<GitError>() {
            return GIT_ERROR;
        }
    }
    ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_is_config_error() {
        let err: LiftoffError = SchemaError::MissingField("plugins".to_string()).into();
        assert_eq!(for_error(&anyhow::Error::new(err)), CONFIG_ERROR);
    }

    #[test]
    fn test_git_error() {
        let err = GitError::RemoteNotFound("origin".to_string());
        assert_eq!(for_error(&anyhow::Error::new(err)), GIT_ERROR);
    }

    #[test]
    fn test_context_is_looked_through() {
        let err = anyhow::Error::new(LiftoffError::from(ConfigError::NotFound(".".into())))
            .context("loading release configuration");
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn test_other_errors() {
        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
