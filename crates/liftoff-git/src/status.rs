//! Working tree status

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Check if the working directory is clean (no uncommitted changes)
    pub fn is_clean(&self) -> Result<bool> {
        let statuses = self.repo.statuses(None)?;

        let dirty = statuses.iter().any(|entry| {
            let status = entry.status();
            status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
                || status.is_wt_new()
                || status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
        });

        Ok(!dirty)
    }

    /// Get the current branch name; `None` when HEAD is detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                return Ok(self.unborn_branch_name());
            }
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Name HEAD points at before the first commit exists
    fn unborn_branch_name(&self) -> Option<String> {
        let head = self.repo.find_reference("HEAD").ok()?;
        let target = head.symbolic_target()?;
        target.strip_prefix("refs/heads/").map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_repo() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();

        std::fs::write(temp.path().join(".releaserc.json"), "{}").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(".releaserc.json")).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let git_repo = GitRepo::discover(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_is_clean() {
        let (_temp, repo) = setup_repo();
        assert!(repo.is_clean().unwrap());
    }

    #[test]
    fn test_is_dirty() {
        let (temp, repo) = setup_repo();
        std::fs::write(temp.path().join("CHANGELOG.md"), "# Changelog").unwrap();
        assert!(!repo.is_clean().unwrap());
    }

    #[test]
    fn test_current_branch() {
        let (_temp, repo) = setup_repo();
        let branch = repo.current_branch().unwrap();
        // Git might default to 'master' or 'main' depending on config
        assert!(branch.is_some());
    }

    #[test]
    fn test_current_branch_unborn() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let repo = GitRepo::discover(temp.path()).unwrap();
        assert!(repo.current_branch().unwrap().is_some());
    }

    #[test]
    fn test_detached_head() {
        let (_temp, repo) = setup_repo();
        let head = repo.repo.head().unwrap().target().unwrap();
        repo.repo.set_head_detached(head).unwrap();

        assert_eq!(repo.current_branch().unwrap(), None);
    }
}
