use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

/// A declarative agent definition as written under the project's agents
/// directory. Definitions carry forward-compatible extra keys, so unknown
/// fields are tolerated rather than rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub spawner_prompt: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub instructions_prompt: Option<String>,
    #[serde(default)]
    pub output_mode: Option<String>,
    #[serde(default)]
    pub include_message_history: Option<bool>,
    #[serde(default)]
    pub tool_names: Vec<String>,
    #[serde(default)]
    pub spawnable_agents: Vec<String>,
    #[serde(default)]
    pub input_schema: Option<Value>,
}

impl AgentDefinition {
    /// Field-level shape checks that serde's permissive defaults cannot
    /// express. Each message has the form `field: detail` so downstream
    /// formatting can split the field name off.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.id.trim().is_empty() {
            problems.push("id: must be a non-empty string".to_string());
        }
        if self.display_name.trim().is_empty() {
            problems.push("displayName: must be a non-empty string".to_string());
        }
        if self.model.trim().is_empty() {
            problems.push("model: must be a non-empty string".to_string());
        }
        problems
    }
}

/// The slice of a definition the terminal client needs at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAgentInfo {
    pub id: String,
    pub display_name: String,
    pub file_path: PathBuf,
}

/// Snapshot of every agent that loaded cleanly, plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAgentsData {
    pub agents: Vec<LocalAgentInfo>,
    pub agents_dir: PathBuf,
}

/// A single problem found while loading definitions. The `id` is the owning
/// agent id, with a trailing `_<n>` ordinal when the same agent produced more
/// than one problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub id: String,
    pub message: String,
}

/// Result of a full agents-directory scan. Per-file failures land in
/// `validation_errors` instead of aborting the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAgents {
    pub data: LoadedAgentsData,
    pub validation_errors: Vec<ValidationError>,
}
