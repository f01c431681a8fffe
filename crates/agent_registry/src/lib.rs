mod error;
mod loader;
mod registry;
mod schema;

pub use error::RegistryError;
pub use loader::load_agents;
pub use registry::{resolve_agent_id, LocalAgentRegistry};
pub use schema::{
    AgentDefinition, LoadedAgents, LoadedAgentsData, LocalAgentInfo, ValidationError,
};
