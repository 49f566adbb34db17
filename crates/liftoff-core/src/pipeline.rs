//! Lifecycle plan - which plugin runs at which step of the release
//!
//! The release engine walks a fixed sequence of lifecycle steps and, at each
//! one, calls every plugin implementing it in declaration order. The plan
//! computed here mirrors that for inspection only; nothing is executed.

use serde::Serialize;
use tracing::debug;

use crate::config::ReleaseConfig;
use crate::plugins::PluginCatalog;

/// Release lifecycle steps, in the order the engine runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleStep {
    /// Check credentials and settings before anything else
    VerifyConditions,
    /// Work out the release type from commits
    AnalyzeCommits,
    /// Veto the computed release
    VerifyRelease,
    /// Produce release notes
    GenerateNotes,
    /// Write artifacts (changelog, manifests) and commit them
    Prepare,
    /// Publish the release
    Publish,
    /// Promote an existing release to another channel
    AddChannel,
    /// Notify about a successful release
    Success,
    /// Notify about a failed release
    Fail,
}

impl LifecycleStep {
    /// Get step name as used by plugins
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerifyConditions => "verifyConditions",
            Self::AnalyzeCommits => "analyzeCommits",
            Self::VerifyRelease => "verifyRelease",
            Self::GenerateNotes => "generateNotes",
            Self::Prepare => "prepare",
            Self::Publish => "publish",
            Self::AddChannel => "addChannel",
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }

    /// Parse step from its plugin-facing name
    pub fn from_name(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|step| step.as_str() == s)
    }

    /// Get all steps in order
    pub fn all() -> &'static [LifecycleStep] {
        &[
            Self::VerifyConditions,
            Self::AnalyzeCommits,
            Self::VerifyRelease,
            Self::GenerateNotes,
            Self::Prepare,
            Self::Publish,
            Self::AddChannel,
            Self::Success,
            Self::Fail,
        ]
    }
}

impl std::fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plugin scheduled at a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPlugin {
    /// Position in `plugins`
    pub index: usize,
    /// Plugin identifier
    pub name: String,
}

/// Plugins scheduled for one lifecycle step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStage {
    /// The step
    pub step: LifecycleStep,
    /// Plugins in declaration order
    pub plugins: Vec<PlannedPlugin>,
}

/// Step-by-step view of a release pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    /// One stage per lifecycle step, including empty ones
    pub stages: Vec<PlanStage>,
    /// Plugins the catalog does not know; their steps are decided at runtime
    pub opaque: Vec<PlannedPlugin>,
}

impl ReleasePlan {
    /// Build the plan for a configuration
    pub fn build(config: &ReleaseConfig, catalog: &PluginCatalog) -> Self {
        let mut stages: Vec<PlanStage> = LifecycleStep::all()
            .iter()
            .map(|step| PlanStage {
                step: *step,
                plugins: Vec::new(),
            })
            .collect();
        let mut opaque = Vec::new();

        for (index, plugin) in config.plugins().iter().enumerate() {
            let planned = PlannedPlugin {
                index,
                name: plugin.name().to_string(),
            };

            match catalog.get(plugin.name()) {
                Some(info) => {
                    for stage in stages.iter_mut() {
                        if info.implements(stage.step) {
                            stage.plugins.push(planned.clone());
                        }
                    }
                }
                None => opaque.push(planned),
            }
        }

        debug!(
            plugins = config.plugins().len(),
            opaque = opaque.len(),
            "built release plan"
        );
        Self { stages, opaque }
    }

    /// Plugins scheduled at a step
    pub fn stage(&self, step: LifecycleStep) -> &[PlannedPlugin] {
        self.stages
            .iter()
            .find(|stage| stage.step == step)
            .map(|stage| stage.plugins.as_slice())
            .unwrap_or(&[])
    }

    /// Whether some known plugin implements a step
    pub fn covers(&self, step: LifecycleStep) -> bool {
        !self.stage(step).is_empty()
    }
}
