use std::collections::BTreeMap;

use crate::error::RegistryError;
use crate::schema::{LoadedAgentsData, LocalAgentInfo};

/// Validated id-to-agent mapping built from a loaded snapshot. Construction
/// checks every entry up front so lookups never have to second-guess the
/// shape of what they find.
#[derive(Debug, Clone, Default)]
pub struct LocalAgentRegistry {
    by_id: BTreeMap<String, LocalAgentInfo>,
}

impl LocalAgentRegistry {
    pub fn from_loaded(data: &LoadedAgentsData) -> Result<Self, RegistryError> {
        let mut by_id = BTreeMap::new();

        for (index, agent) in data.agents.iter().enumerate() {
            if agent.id.trim().is_empty() {
                return Err(RegistryError::empty_field(index, "id"));
            }
            if agent.display_name.trim().is_empty() {
                return Err(RegistryError::empty_field(index, "display name"));
            }
            if agent.file_path.as_os_str().is_empty() {
                return Err(RegistryError::empty_field(index, "file path"));
            }
            if by_id.insert(agent.id.clone(), agent.clone()).is_some() {
                return Err(RegistryError::DuplicateAgentId {
                    id: agent.id.clone(),
                });
            }
        }

        Ok(Self { by_id })
    }

    #[must_use]
    pub fn get(&self, agent_id: &str) -> Option<&LocalAgentInfo> {
        self.by_id.get(agent_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalAgentInfo> {
        self.by_id.values()
    }
}

/// Maps a validation error id back to its owning agent id by stripping one
/// trailing `_<digits>` ordinal, the inverse of the loader's disambiguation.
#[must_use]
pub fn resolve_agent_id(error_id: &str) -> &str {
    match error_id.rsplit_once('_') {
        Some((owner, ordinal))
            if !ordinal.is_empty() && ordinal.bytes().all(|byte| byte.is_ascii_digit()) =>
        {
            owner
        }
        _ => error_id,
    }
}
