//! Environment configuration.

use std::env;
use std::path::PathBuf;

use credential_store::ENVIRONMENT_ENV_VAR;

pub const AGENTS_DIR_ENV_VAR: &str = "MANICODE_AGENTS_DIR";
pub const REQUIRE_AUTH_ENV_VAR: &str = "MANICODE_REQUIRE_AUTH";
pub const THEME_ENV_VAR: &str = "MANICODE_THEME";

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub environment: Option<String>,
    pub agents_dir: Option<PathBuf>,
    pub require_auth: Option<bool>,
    pub theme: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env_string_opt(ENVIRONMENT_ENV_VAR),
            agents_dir: env_string_opt(AGENTS_DIR_ENV_VAR).map(PathBuf::from),
            require_auth: env_flag_opt(REQUIRE_AUTH_ENV_VAR),
            theme: env_string_opt(THEME_ENV_VAR),
        }
    }

    /// Environment name for analytics gating and display; `dev` when unset.
    pub fn environment_name(&self) -> &str {
        self.environment.as_deref().unwrap_or("dev")
    }
}

fn env_flag_opt(key: &str) -> Option<bool> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value == "1")
        }
    })
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
