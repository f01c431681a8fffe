use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::Value;

use crate::schema::{
    AgentDefinition, LoadedAgents, LoadedAgentsData, LocalAgentInfo, ValidationError,
};

/// Scans `agents_dir` recursively for `*.json` definitions. Files that fail
/// to read, parse, or validate become `validation_errors` entries; the load
/// itself never fails. A missing directory yields an empty snapshot.
#[must_use]
pub fn load_agents(agents_dir: &Path) -> LoadedAgents {
    let mut files = Vec::new();
    if agents_dir.is_dir() {
        collect_definition_files(agents_dir, &mut files);
        files.sort();
    } else {
        debug!("no agents directory at {}", agents_dir.display());
    }

    let mut agents: Vec<LocalAgentInfo> = Vec::new();
    let mut raw_errors: Vec<(String, String)> = Vec::new();

    for file in files {
        let definition = match load_definition_file(&file) {
            Ok(definition) => definition,
            Err((owner, message)) => {
                raw_errors.push((owner, message));
                continue;
            }
        };

        let problems = definition.validate();
        if !problems.is_empty() {
            let owner = definition_owner(&definition, &file);
            for message in problems {
                raw_errors.push((owner.clone(), message));
            }
            continue;
        }

        if agents.iter().any(|agent| agent.id == definition.id) {
            raw_errors.push((
                definition.id.clone(),
                format!("id: duplicate of agent '{}'", definition.id),
            ));
            continue;
        }

        agents.push(LocalAgentInfo {
            id: definition.id,
            display_name: definition.display_name,
            file_path: file,
        });
    }

    LoadedAgents {
        data: LoadedAgentsData {
            agents,
            agents_dir: agents_dir.to_path_buf(),
        },
        validation_errors: disambiguate_owners(raw_errors),
    }
}

fn collect_definition_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("skipping unreadable agents directory {}: {err}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_definition_files(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
}

fn load_definition_file(path: &Path) -> Result<AgentDefinition, (String, String)> {
    let raw = fs::read_to_string(path)
        .map_err(|err| (file_owner(path), format!("failed to read definition: {err}")))?;

    let value: Value = serde_json::from_str(&raw)
        .map_err(|err| (file_owner(path), format!("invalid JSON: {err}")))?;

    serde_json::from_value(value.clone()).map_err(|err| {
        let owner = declared_id(&value).unwrap_or_else(|| file_owner(path));
        (owner, format!("definition does not match the agent schema: {err}"))
    })
}

fn declared_id(value: &Value) -> Option<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn definition_owner(definition: &AgentDefinition, path: &Path) -> String {
    let trimmed = definition.id.trim();
    if trimmed.is_empty() {
        file_owner(path)
    } else {
        trimmed.to_string()
    }
}

fn file_owner(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("unknown-agent")
        .to_string()
}

/// Repeated owner ids get a trailing `_<n>` ordinal so each error id stays
/// unique. The first occurrence keeps the bare id, so a lone error for
/// `reviewer` reads `reviewer` and the second reads `reviewer_2`.
fn disambiguate_owners(raw: Vec<(String, String)>) -> Vec<ValidationError> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut errors = Vec::with_capacity(raw.len());

    for (owner, message) in raw {
        let ordinal = {
            let count = counts.entry(owner.clone()).or_insert(0);
            *count += 1;
            *count
        };
        let id = if ordinal == 1 {
            owner
        } else {
            format!("{owner}_{ordinal}")
        };
        errors.push(ValidationError { id, message });
    }

    errors
}
