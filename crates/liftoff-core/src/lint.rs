//! Advisory checks on a valid configuration
//!
//! Lint findings never fail a load; they point at pipelines that are valid
//! but unlikely to do what their author meant.

use std::collections::HashSet;

use glob::{MatchOptions, Pattern};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ReleaseConfig;
use crate::pipeline::{LifecycleStep, ReleasePlan};
use crate::plugins::{names, PluginCatalog, DEFAULT_CHANGELOG_FILE, DEFAULT_GIT_ASSETS};

/// Lint rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LintCode {
    /// Nothing determines the release type
    NoCommitAnalyzer,
    /// Changelog requested without release notes
    NoNotesGenerator,
    /// Changelog written after the plugins that commit or publish it
    ChangelogAfterCommit,
    /// Changelog written but never committed
    ChangelogNotCommitted,
    /// Plugin listed twice
    DuplicatePlugin,
}

impl LintCode {
    /// Get rule name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCommitAnalyzer => "no-commit-analyzer",
            Self::NoNotesGenerator => "no-notes-generator",
            Self::ChangelogAfterCommit => "changelog-after-commit",
            Self::ChangelogNotCommitted => "changelog-not-committed",
            Self::DuplicatePlugin => "duplicate-plugin",
        }
    }
}

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintWarning {
    /// Rule that fired
    pub code: LintCode,
    /// Human-readable explanation
    pub message: String,
}

impl LintWarning {
    fn new(code: LintCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LintWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

/// Run every lint rule
pub fn lint(config: &ReleaseConfig, catalog: &PluginCatalog) -> Vec<LintWarning> {
    let plan = ReleasePlan::build(config, catalog);
    let mut warnings = Vec::new();

    check_commit_analyzer(&plan, &mut warnings);
    check_notes_generator(config, &plan, &mut warnings);
    check_changelog_order(config, &mut warnings);
    check_changelog_committed(config, &mut warnings);
    check_duplicates(config, &mut warnings);

    debug!(count = warnings.len(), "lint finished");
    warnings
}

fn check_commit_analyzer(plan: &ReleasePlan, warnings: &mut Vec<LintWarning>) {
    // Opaque plugins may analyze commits; only warn when every plugin is known.
    if plan.opaque.is_empty() && !plan.covers(LifecycleStep::AnalyzeCommits) {
        warnings.push(LintWarning::new(
            LintCode::NoCommitAnalyzer,
            "no plugin implements analyzeCommits, so no release will ever be created",
        ));
    }
}

fn check_notes_generator(
    config: &ReleaseConfig,
    plan: &ReleasePlan,
    warnings: &mut Vec<LintWarning>,
) {
    if config.find_plugin(names::CHANGELOG).is_some()
        && plan.opaque.is_empty()
        && !plan.covers(LifecycleStep::GenerateNotes)
    {
        warnings.push(LintWarning::new(
            LintCode::NoNotesGenerator,
            format!(
                "{} is configured but no plugin implements generateNotes; the changelog will be empty",
                names::CHANGELOG
            ),
        ));
    }
}

fn check_changelog_order(config: &ReleaseConfig, warnings: &mut Vec<LintWarning>) {
    let Some((changelog_index, _)) = config.find_plugin(names::CHANGELOG) else {
        return;
    };

    for dependent in [names::GIT, names::NPM] {
        if let Some((index, _)) = config.find_plugin(dependent) {
            if index < changelog_index {
                warnings.push(LintWarning::new(
                    LintCode::ChangelogAfterCommit,
                    format!(
                        "{} must come before {} so the changelog exists when it runs",
                        names::CHANGELOG,
                        dependent
                    ),
                ));
            }
        }
    }
}

fn check_changelog_committed(config: &ReleaseConfig, warnings: &mut Vec<LintWarning>) {
    let Some((changelog_index, _)) = config.find_plugin(names::CHANGELOG) else {
        return;
    };
    let Some((git_index, _)) = config.find_plugin(names::GIT) else {
        return;
    };

    let changelog_file = config
        .plugin_options(changelog_index)
        .and_then(|options| options.get("changelogFile").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_CHANGELOG_FILE.to_string());

    let assets = config
        .plugin_options(git_index)
        .and_then(|options| options.get("assets").cloned());
    let committed = match assets {
        None => DEFAULT_GIT_ASSETS.contains(&changelog_file.as_str()),
        Some(Value::Bool(false)) => false,
        Some(value) => asset_patterns(&value)
            .iter()
            .any(|pattern| asset_matches(pattern, &changelog_file)),
    };

    if !committed {
        warnings.push(LintWarning::new(
            LintCode::ChangelogNotCommitted,
            format!(
                "{} writes {} but {} does not list it in assets",
                names::CHANGELOG,
                changelog_file,
                names::GIT
            ),
        ));
    }
}

/// Asset entries are strings, `{path: ...}` objects, or arrays of either
fn asset_patterns(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(asset_patterns).collect(),
        Value::Object(map) => map
            .get("path")
            .map(asset_patterns)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Whether an asset glob covers a repository-relative file
///
/// `*` stays within one path component; `**/` spans any number of them,
/// including none.
fn asset_matches(pattern: &str, file: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let pattern = pattern.trim_start_matches("./");
    let file = file.trim_start_matches("./");

    match Pattern::new(pattern) {
        Ok(glob) => glob.matches_with(file, options),
        Err(e) => {
            debug!(pattern, error = %e, "asset pattern is not a valid glob");
            pattern == file
        }
    }
}

fn check_duplicates(config: &ReleaseConfig, warnings: &mut Vec<LintWarning>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for plugin in config.plugins() {
        if !seen.insert(plugin.name()) && reported.insert(plugin.name()) {
            warnings.push(LintWarning::new(
                LintCode::DuplicatePlugin,
                format!("{} is listed more than once", plugin.name()),
            ));
        }
    }
}
