//! Terminal client application state.
//!
//! [`ClientApp`] owns the transcript, the collapse set, the mode toggle, and
//! the snapshot bookkeeping that keeps the loaded-agents message current.
//! Side effects that need the session around the app (login, logout,
//! analytics) go through [`SessionOps`] so command handling stays testable
//! without a live session.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::{debug, info, warn};
use time::OffsetDateTime;

use agent_registry::{LoadedAgents, LoadedAgentsData, LocalAgentRegistry, ValidationError};

use crate::auth::AuthHost;
use crate::commands::{parse_slash_command, SlashCommand};
use crate::theme::ChatTheme;
use crate::transcript::reconcile::{
    apply, reconcile, reconcile_logo, InitSnapshot, TranscriptPatch,
};
use crate::transcript::{
    build_validation_error_blocks, logo_block, rfc3339_timestamp, unix_millis, ChatMessage,
    ContentBlock, MessageVariant, AGENT_LIST_BLOCK_ID, VALIDATION_ERROR_ID_PREFIX,
};
use crate::widgets::{AgentMode, ModeToggle};

const HELP_TEXT: &str = "Commands: /mode, /agents, /errors, /login, /logout, /width, /help, /quit";

/// Effects the surrounding session performs on the app's behalf.
pub trait SessionOps {
    fn request_login(&mut self);
    fn request_logout(&mut self);
    fn on_mode_selected(&mut self, mode: AgentMode);
}

pub struct ClientApp {
    pub messages: Vec<ChatMessage>,
    pub mode_toggle: ModeToggle,
    pub should_exit: bool,
    collapsed_ids: BTreeSet<String>,
    validation_errors: Vec<ValidationError>,
    loaded: Option<LoadedAgentsData>,
    registry: Option<LocalAgentRegistry>,
    prev_snapshot: Option<InitSnapshot>,
    active_agent_id: Option<String>,
    theme: ChatTheme,
    home: Option<PathBuf>,
    width: usize,
    input_focused: bool,
}

impl ClientApp {
    pub fn new(theme: ChatTheme, home: Option<PathBuf>, width: usize) -> Self {
        Self {
            messages: Vec::new(),
            mode_toggle: ModeToggle::new(AgentMode::Fast, theme.clone()),
            should_exit: false,
            collapsed_ids: BTreeSet::new(),
            validation_errors: Vec::new(),
            loaded: None,
            registry: None,
            prev_snapshot: None,
            active_agent_id: None,
            theme,
            home,
            width,
            input_focused: false,
        }
    }

    pub fn theme(&self) -> &ChatTheme {
        &self.theme
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn loaded(&self) -> Option<&LoadedAgentsData> {
        self.loaded.as_ref()
    }

    pub fn home(&self) -> Option<&std::path::Path> {
        self.home.as_deref()
    }

    pub fn registry(&self) -> Option<&LocalAgentRegistry> {
        self.registry.as_ref()
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed_ids.contains(id)
    }

    pub fn toggle_collapsed(&mut self, id: &str) {
        if !self.collapsed_ids.remove(id) {
            self.collapsed_ids.insert(id.to_string());
        }
    }

    /// Select the agent the next run targets. Feeds the init snapshot, so a
    /// change refreshes the loaded-agents message.
    pub fn set_active_agent(&mut self, agent_id: Option<String>) {
        self.active_agent_id = agent_id;
    }

    /// Install the result of an agents-directory scan.
    pub fn on_agents_loaded(&mut self, loaded: LoadedAgents) {
        self.registry = match LocalAgentRegistry::from_loaded(&loaded.data) {
            Ok(registry) => Some(registry),
            Err(err) => {
                warn!("agent registry rejected loaded data: {err}");
                None
            }
        };
        info!(
            "loaded {} agents from {}",
            loaded.data.agents.len(),
            loaded.data.agents_dir.display()
        );
        self.validation_errors = loaded.validation_errors;
        self.loaded = Some(loaded.data);
    }

    /// Adopt a new terminal width. The logo block inside the loaded-agents
    /// message is swapped immediately so the transcript never renders a logo
    /// wider than the terminal.
    pub fn set_width(&mut self, width: usize) {
        if width == self.width {
            return;
        }
        self.width = width;
        let patch = reconcile_logo(&self.messages, &logo_block(width));
        apply(&mut self.messages, &mut self.collapsed_ids, patch);
    }

    /// Bring the loaded-agents message up to date with the current app state.
    /// Call once per update pass, after any state mutation.
    pub fn sync_transcript(&mut self, now: OffsetDateTime) {
        let next = self.snapshot();
        let patch = reconcile(self.prev_snapshot.as_ref(), &next, &self.messages, now);
        match &patch {
            TranscriptPatch::Seed { messages, .. } => {
                debug!("seeding transcript with {} messages", messages.len());
            }
            TranscriptPatch::RefreshFirstMessage { .. } => {
                debug!("refreshing loaded-agents message");
            }
            _ => {}
        }
        apply(&mut self.messages, &mut self.collapsed_ids, patch);
        self.prev_snapshot = Some(next);
    }

    pub fn push_user_message(&mut self, text: &str, now: OffsetDateTime) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.messages.push(ChatMessage {
            id: format!("user-{}", unix_millis(now)),
            variant: MessageVariant::User,
            content: trimmed.to_string(),
            blocks: vec![ContentBlock::text(trimmed)],
            timestamp: rfc3339_timestamp(now),
        });
    }

    /// Handle one submitted line: slash commands dispatch, anything else
    /// becomes a user message.
    pub fn on_submit(&mut self, ops: &mut dyn SessionOps, text: &str, now: OffsetDateTime) {
        let submitted = text.trim();
        if submitted.is_empty() {
            return;
        }

        let Some(command) = parse_slash_command(submitted) else {
            self.push_user_message(submitted, now);
            return;
        };

        match command {
            SlashCommand::Mode(None) => {
                let active = self.mode_toggle.mode();
                self.mode_toggle.press(active);
            }
            SlashCommand::Mode(Some(name)) => match AgentMode::parse(&name) {
                Some(mode) => {
                    let changed = mode != self.mode_toggle.mode();
                    self.mode_toggle.press(mode);
                    if changed {
                        ops.on_mode_selected(mode);
                    }
                }
                None => self.push_notice(format!("Unknown mode: {name}"), now),
            },
            SlashCommand::Agents => self.toggle_collapsed(AGENT_LIST_BLOCK_ID),
            SlashCommand::Errors => self.show_validation_errors(now),
            SlashCommand::Login => ops.request_login(),
            SlashCommand::Logout => ops.request_logout(),
            SlashCommand::Width(Some(columns)) => self.set_width(columns),
            SlashCommand::Width(None) => {
                let width = self.width;
                self.push_notice(format!("Width {width} columns"), now);
            }
            SlashCommand::Help => self.push_notice(HELP_TEXT, now),
            SlashCommand::Quit => self.should_exit = true,
            SlashCommand::Unknown(command) => {
                self.push_notice(format!("Unknown command: {command}"), now);
            }
        }
    }

    /// Append an informational assistant-side message.
    pub fn push_notice(&mut self, text: impl Into<String>, now: OffsetDateTime) {
        let text = text.into();
        self.messages.push(ChatMessage {
            id: format!("notice-{}", unix_millis(now)),
            variant: MessageVariant::Ai,
            content: text.clone(),
            blocks: vec![ContentBlock::text(text)],
            timestamp: rfc3339_timestamp(now),
        });
    }

    fn show_validation_errors(&mut self, now: OffsetDateTime) {
        if self.validation_errors.is_empty() {
            self.push_notice("No agent validation issues", now);
            return;
        }
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        let blocks = build_validation_error_blocks(
            &self.validation_errors,
            self.registry.as_ref(),
            &loaded.agents_dir,
            self.width,
        );
        if blocks.is_empty() {
            return;
        }
        self.messages.push(ChatMessage {
            id: format!("{VALIDATION_ERROR_ID_PREFIX}{}", unix_millis(now)),
            variant: MessageVariant::Error,
            content: String::new(),
            blocks,
            timestamp: rfc3339_timestamp(now),
        });
    }

    fn snapshot(&self) -> InitSnapshot {
        InitSnapshot {
            loaded: self.loaded.clone(),
            validation_errors: self.validation_errors.clone(),
            logo: logo_block(self.width),
            theme_name: self.theme.name.to_string(),
            separator_width: self.width,
            agent_id: self.active_agent_id.clone(),
            home: self.home.clone(),
        }
    }
}

impl AuthHost for ClientApp {
    fn reset_chat(&mut self) {
        self.messages.clear();
        self.collapsed_ids.clear();
        self.prev_snapshot = None;
    }

    fn request_input_focus(&mut self) {
        self.input_focused = true;
    }
}
