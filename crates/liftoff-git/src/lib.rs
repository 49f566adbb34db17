//! Liftoff Git - Repository queries for release configuration checks
//!
//! This crate answers the questions a release declaration raises about the
//! working copy: which branch is checked out, where the remotes point, and
//! whether the tree is clean. It never writes to the repository.

mod remote;
mod repository;
mod status;

pub use remote::DEFAULT_REMOTE;
pub use repository::{GitRepo, Result};
