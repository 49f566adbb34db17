//! Git repository operations

use std::path::Path;

use git2::Repository;
use tracing::{debug, instrument};

use liftoff_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Working copy a release declaration is checked against
pub struct GitRepo {
    pub(crate) repo: Repository,
}

impl GitRepo {
    /// Find the repository containing `start_path`, searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        debug!("discovering git repository");
        let repo = Repository::discover(start_path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::NotARepository(start_path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        debug!(git_dir = %repo.path().display(), "found git repository");
        Ok(Self { repo })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();

        let subdir = temp.path().join("internal").join("server");
        std::fs::create_dir_all(&subdir).unwrap();

        let repo = GitRepo::discover(&subdir).unwrap();
        // Canonicalize both paths to handle macOS /var -> /private/var symlink
        let workdir = repo.repo.workdir().unwrap().canonicalize().unwrap();
        assert_eq!(workdir, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_discover_outside_repository() {
        let temp = TempDir::new().unwrap();
        // tempdirs may live under a checkout; only assert when they do not
        if Repository::discover(temp.path()).is_err() {
            assert!(matches!(
                GitRepo::discover(temp.path()),
                Err(GitError::NotARepository(_)) | Err(GitError::OpenFailed(_))
            ));
        }
    }
}
