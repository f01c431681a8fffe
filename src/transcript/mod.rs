//! Chat transcript model and block builders.
//!
//! The first message in a transcript is the canonical loaded-agents message:
//! a logo block, an intro block, and the agent list. It is rebuilt in place
//! when agent data or the theme changes and never duplicated; only the very
//! first population appends it. Reconciliation lives in [`reconcile`].

pub mod reconcile;

use std::path::{Path, PathBuf};

use log::warn;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use agent_registry::{LoadedAgentsData, LocalAgentInfo, LocalAgentRegistry, ValidationError};

use crate::text::display_path_with_home;
use crate::widgets::banner_lines;

pub const LOADED_AGENTS_ID_PREFIX: &str = "system-loaded-agents-";
pub const VALIDATION_ERROR_ID_PREFIX: &str = "validation-error-";
pub const AGENT_LIST_BLOCK_ID: &str = "loaded-agents-list";
pub const LOGO_GLYPH: char = '█';
pub const INTRO_TEXT: &str = "Codebuff will run commands on your behalf to help you build.";

const LOGO_WIDE: &str = "\
█▀▄▀█ ▄▀█ █▄ █ █ █▀▀ █▀█ █▀▄ █▀▀
█ ▀ █ █▀█ █ ▀█ █ █▄▄ █▄█ █▄▀ █▄▄";
const LOGO_NARROW: &str = "\
█▀▄▀█ █▀▀
█ ▀ █ █▄▄";
const LOGO_WIDE_MIN_WIDTH: usize = 34;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVariant {
    Ai,
    User,
    Error,
}

/// One renderable unit within a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text {
        content: String,
        margin_top: usize,
        margin_bottom: usize,
    },
    /// Pre-rendered informational fragment.
    Rendered { lines: Vec<String> },
    /// Structured agent list; collapse state is tracked by id.
    AgentList {
        id: String,
        agents: Vec<LocalAgentInfo>,
        agents_dir: PathBuf,
    },
}

impl ContentBlock {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            margin_top: 0,
            margin_bottom: 0,
        }
    }

    pub fn agent_list_id(&self) -> Option<&str> {
        match self {
            Self::AgentList { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub variant: MessageVariant,
    pub content: String,
    pub blocks: Vec<ContentBlock>,
    pub timestamp: String,
}

/// The logo rendered for the current terminal width. Every variant carries
/// the block glyph the logo-refresh path searches for.
pub fn logo_block(width: usize) -> String {
    if width >= LOGO_WIDE_MIN_WIDTH {
        LOGO_WIDE.to_string()
    } else {
        LOGO_NARROW.to_string()
    }
}

/// The three-block body of the loaded-agents message: logo, intro, agent
/// list. The agents directory's parent is the project root; roots under the
/// home directory display as `~/<relative>`, others absolute.
pub fn build_loaded_agents_blocks(
    loaded: &LoadedAgentsData,
    logo: &str,
    list_id: &str,
    home: Option<&Path>,
) -> Vec<ContentBlock> {
    let repo_root = loaded.agents_dir.parent().unwrap_or(&loaded.agents_dir);
    let display_path = display_path_with_home(repo_root, home);

    vec![
        ContentBlock::Text {
            content: logo.to_string(),
            margin_top: 2,
            margin_bottom: 1,
        },
        ContentBlock::Rendered {
            lines: vec![INTRO_TEXT.to_string(), format!("Directory {display_path}")],
        },
        ContentBlock::AgentList {
            id: list_id.to_string(),
            agents: loaded.agents.clone(),
            agents_dir: loaded.agents_dir.clone(),
        },
    ]
}

/// Freshly built blocks for a validation-error message.
pub fn build_validation_error_blocks(
    errors: &[ValidationError],
    registry: Option<&LocalAgentRegistry>,
    agents_dir: &Path,
    width: usize,
) -> Vec<ContentBlock> {
    match banner_lines(errors, registry, Some(agents_dir), width) {
        Some(lines) => vec![ContentBlock::Rendered { lines }],
        None => Vec::new(),
    }
}

pub fn rfc3339_timestamp(now: OffsetDateTime) -> String {
    match now.format(&Rfc3339) {
        Ok(timestamp) => timestamp,
        Err(err) => {
            warn!("failed to format message timestamp: {err}");
            String::new()
        }
    }
}

pub fn unix_millis(now: OffsetDateTime) -> u64 {
    (now.unix_timestamp_nanos() / 1_000_000).max(0) as u64
}
