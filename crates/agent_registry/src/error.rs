use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("agent entry {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("duplicate agent id '{id}' in loaded agents")]
    DuplicateAgentId { id: String },
}

impl RegistryError {
    #[must_use]
    pub fn empty_field(index: usize, field: &'static str) -> Self {
        Self::EmptyField { index, field }
    }
}
