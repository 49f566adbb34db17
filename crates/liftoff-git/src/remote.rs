//! Remote lookups

use tracing::debug;

use liftoff_core::error::GitError;
use liftoff_core::remote::RemoteUrl;

use crate::repository::{GitRepo, Result};

/// Remote checked against `repositoryUrl` when none is named
pub const DEFAULT_REMOTE: &str = "origin";

impl GitRepo {
    /// Get the URL for a remote
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::RemoteNotFound(name.to_string()))
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Parsed address of a remote; `None` if it has no URL or one git
    /// accepts but a release cannot push to
    pub fn remote_address(&self, name: &str) -> Result<Option<RemoteUrl>> {
        let Some(url) = self.remote_url(name)? else {
            return Ok(None);
        };
        match RemoteUrl::parse(&url) {
            Ok(remote) => Ok(Some(remote)),
            Err(e) => {
                debug!(remote = name, url = %url, error = %e, "remote URL not parseable");
                Ok(None)
            }
        }
    }
}
