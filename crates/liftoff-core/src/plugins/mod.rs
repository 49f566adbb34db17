//! Plugin catalog - what the well-known release plugins do
//!
//! The release engine loads plugins by identifier and asks each one which
//! lifecycle steps it implements. For the common plugins that answer is fixed,
//! so the catalog records it; anything else stays opaque until runtime.

use std::collections::HashMap;

use serde::Serialize;

use crate::pipeline::LifecycleStep;

/// Default file the changelog plugin writes
pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Files the git plugin commits when no `assets` option is given
pub const DEFAULT_GIT_ASSETS: &[&str] = &[
    "CHANGELOG.md",
    "package.json",
    "package-lock.json",
    "npm-shrinkwrap.json",
];

/// Identifiers of plugins other modules reason about
pub mod names {
    /// Commit analyzer
    pub const COMMIT_ANALYZER: &str = "@semantic-release/commit-analyzer";
    /// Release notes generator
    pub const RELEASE_NOTES_GENERATOR: &str = "@semantic-release/release-notes-generator";
    /// Changelog file writer
    pub const CHANGELOG: &str = "@semantic-release/changelog";
    /// GitHub release publisher
    pub const GITHUB: &str = "@semantic-release/github";
    /// GitLab release publisher
    pub const GITLAB: &str = "@semantic-release/gitlab";
    /// Commits release artifacts back to the repository
    pub const GIT: &str = "@semantic-release/git";
    /// npm publisher
    pub const NPM: &str = "@semantic-release/npm";
    /// Shell command runner
    pub const EXEC: &str = "@semantic-release/exec";
    /// Exports release data as CI outputs
    pub const EXPORT_DATA: &str = "semantic-release-export-data";
}

/// Plugin metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    /// Plugin identifier
    pub name: String,
    /// What the plugin does
    pub description: String,
    /// Lifecycle steps it implements
    pub steps: Vec<LifecycleStep>,
    /// Whether it writes files that must be committed back
    pub writes_artifacts: bool,
    /// Whether it commits and pushes to the repository
    pub commits: bool,
}

impl PluginInfo {
    /// Create plugin metadata
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        steps: &[LifecycleStep],
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            steps: steps.to_vec(),
            writes_artifacts: false,
            commits: false,
        }
    }

    /// Mark as writing files into the working tree
    pub fn writes_artifacts(mut self) -> Self {
        self.writes_artifacts = true;
        self
    }

    /// Mark as committing to the repository
    pub fn commits(mut self) -> Self {
        self.commits = true;
        self
    }

    /// Whether the plugin runs at a step
    pub fn implements(&self, step: LifecycleStep) -> bool {
        self.steps.contains(&step)
    }
}

/// Registry of known plugins
#[derive(Debug, Clone, Default)]
pub struct PluginCatalog {
    plugins: HashMap<String, PluginInfo>,
}

impl PluginCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the standard plugins
    pub fn builtin() -> Self {
        use LifecycleStep::*;

        let mut catalog = Self::new();
        catalog.register(PluginInfo::new(
            names::COMMIT_ANALYZER,
            "Determines the release type from conventional commits",
            &[AnalyzeCommits],
        ));
        catalog.register(PluginInfo::new(
            names::RELEASE_NOTES_GENERATOR,
            "Generates release notes from commits",
            &[GenerateNotes],
        ));
        catalog.register(
            PluginInfo::new(
                names::CHANGELOG,
                "Writes release notes into a changelog file",
                &[VerifyConditions, Prepare],
            )
            .writes_artifacts(),
        );
        catalog.register(PluginInfo::new(
            names::GITHUB,
            "Publishes a GitHub release and comments on issues and pull requests",
            &[VerifyConditions, Publish, AddChannel, Success, Fail],
        ));
        catalog.register(PluginInfo::new(
            names::GITLAB,
            "Publishes a GitLab release",
            &[VerifyConditions, Publish, Success, Fail],
        ));
        catalog.register(
            PluginInfo::new(
                names::GIT,
                "Commits release assets back to the repository",
                &[VerifyConditions, Prepare],
            )
            .commits(),
        );
        catalog.register(
            PluginInfo::new(
                names::NPM,
                "Bumps package.json and publishes to the npm registry",
                &[VerifyConditions, Prepare, Publish, AddChannel],
            )
            .writes_artifacts(),
        );
        catalog.register(PluginInfo::new(
            names::EXEC,
            "Runs shell commands at any step",
            LifecycleStep::all(),
        ));
        catalog.register(PluginInfo::new(
            names::EXPORT_DATA,
            "Exports the next release version and notes as CI outputs",
            &[VerifyConditions, GenerateNotes],
        ));
        catalog
    }

    /// Add or replace a plugin entry
    pub fn register(&mut self, info: PluginInfo) {
        self.plugins.insert(info.name.clone(), info);
    }

    /// Look up a plugin
    pub fn get(&self, name: &str) -> Option<&PluginInfo> {
        self.plugins.get(name)
    }

    /// Whether a plugin is known
    pub fn is_known(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Known plugins sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &PluginInfo> {
        let mut plugins: Vec<&PluginInfo> = self.plugins.values().collect();
        plugins.sort_by(|a, b| a.name.cmp(&b.name));
        plugins.into_iter()
    }

    /// Number of known plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
