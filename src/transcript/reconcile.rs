//! Snapshot-driven reconciliation of the loaded-agents transcript.
//!
//! Instead of mutating the transcript from inside change notifications, the
//! app captures an [`InitSnapshot`] of everything the loaded-agents message
//! depends on, and [`reconcile`] compares it against the previous snapshot
//! and the current messages. The result is a [`TranscriptPatch`] describing
//! exactly what to change; [`apply`] performs it. Callers can inspect or log
//! the patch before applying, and tests assert on patches directly.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::warn;
use time::OffsetDateTime;

use agent_registry::{LoadedAgentsData, LocalAgentRegistry, ValidationError};

use super::{
    build_loaded_agents_blocks, build_validation_error_blocks, rfc3339_timestamp, unix_millis,
    ChatMessage, ContentBlock, MessageVariant, AGENT_LIST_BLOCK_ID, LOADED_AGENTS_ID_PREFIX,
    LOGO_GLYPH, VALIDATION_ERROR_ID_PREFIX,
};

/// Everything the loaded-agents message is derived from. Two equal snapshots
/// produce the same message, so equality short-circuits reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct InitSnapshot {
    pub loaded: Option<LoadedAgentsData>,
    pub validation_errors: Vec<ValidationError>,
    pub logo: String,
    pub theme_name: String,
    pub separator_width: usize,
    pub agent_id: Option<String>,
    pub home: Option<PathBuf>,
}

/// A described transcript change. `Seed` fires exactly once per empty
/// transcript; `RefreshFirstMessage` rebuilds the first message's blocks in
/// place, keeping its id and any messages after it.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptPatch {
    None,
    Seed {
        messages: Vec<ChatMessage>,
        collapse_id: String,
    },
    RefreshFirstMessage { blocks: Vec<ContentBlock> },
    ReplaceLogoBlock {
        message_id: String,
        block_index: usize,
        content: String,
    },
}

/// Compare the new snapshot against the previous one and the transcript, and
/// describe the change that brings the transcript up to date.
pub fn reconcile(
    prev: Option<&InitSnapshot>,
    next: &InitSnapshot,
    messages: &[ChatMessage],
    now: OffsetDateTime,
) -> TranscriptPatch {
    let Some(loaded) = next.loaded.as_ref() else {
        return TranscriptPatch::None;
    };

    // An empty transcript is always seeded, even when the snapshot itself
    // did not change. Clearing the chat (for example after a login) empties
    // the messages and must bring the loaded-agents message back.
    if messages.is_empty() {
        return seed(next, loaded, now);
    }

    if prev.is_some_and(|prev| prev == next) {
        return TranscriptPatch::None;
    }

    let Some(first) = messages.first() else {
        return TranscriptPatch::None;
    };
    if first.blocks.is_empty() {
        return TranscriptPatch::None;
    }
    let Some(list_id) = first.blocks.iter().find_map(ContentBlock::agent_list_id) else {
        return TranscriptPatch::None;
    };

    TranscriptPatch::RefreshFirstMessage {
        blocks: build_loaded_agents_blocks(loaded, &next.logo, list_id, next.home.as_deref()),
    }
}

fn seed(next: &InitSnapshot, loaded: &LoadedAgentsData, now: OffsetDateTime) -> TranscriptPatch {
    let millis = unix_millis(now);
    let timestamp = rfc3339_timestamp(now);

    let blocks =
        build_loaded_agents_blocks(loaded, &next.logo, AGENT_LIST_BLOCK_ID, next.home.as_deref());
    let mut messages = vec![ChatMessage {
        id: format!("{LOADED_AGENTS_ID_PREFIX}{millis}"),
        variant: MessageVariant::Ai,
        content: String::new(),
        blocks,
        timestamp: timestamp.clone(),
    }];

    if !next.validation_errors.is_empty() {
        let registry = registry_for(loaded);
        let error_blocks = build_validation_error_blocks(
            &next.validation_errors,
            registry.as_ref(),
            &loaded.agents_dir,
            next.separator_width,
        );
        if !error_blocks.is_empty() {
            messages.push(ChatMessage {
                id: format!("{VALIDATION_ERROR_ID_PREFIX}{millis}"),
                variant: MessageVariant::Error,
                content: String::new(),
                blocks: error_blocks,
                timestamp,
            });
        }
    }

    TranscriptPatch::Seed {
        messages,
        collapse_id: AGENT_LIST_BLOCK_ID.to_string(),
    }
}

fn registry_for(loaded: &LoadedAgentsData) -> Option<LocalAgentRegistry> {
    match LocalAgentRegistry::from_loaded(loaded) {
        Ok(registry) => Some(registry),
        Err(err) => {
            warn!("agent registry rejected loaded data: {err}");
            None
        }
    }
}

/// Swap the logo block for a freshly sized one after a terminal resize. The
/// replacement drops the seed margins and leads with a blank gap instead, so
/// the reflowed message keeps its vertical rhythm.
pub fn reconcile_logo(messages: &[ChatMessage], logo: &str) -> TranscriptPatch {
    let Some(message) = messages
        .iter()
        .find(|message| message.id.starts_with(LOADED_AGENTS_ID_PREFIX))
    else {
        return TranscriptPatch::None;
    };
    let Some(block_index) = message.blocks.iter().position(|block| {
        matches!(block, ContentBlock::Text { content, .. } if content.contains(LOGO_GLYPH))
    }) else {
        return TranscriptPatch::None;
    };

    TranscriptPatch::ReplaceLogoBlock {
        message_id: message.id.clone(),
        block_index,
        content: format!("\n\n{logo}"),
    }
}

/// Apply a patch to the transcript. Patches referring to messages or blocks
/// that no longer exist are ignored.
pub fn apply(
    messages: &mut Vec<ChatMessage>,
    collapsed_ids: &mut BTreeSet<String>,
    patch: TranscriptPatch,
) {
    match patch {
        TranscriptPatch::None => {}
        TranscriptPatch::Seed {
            messages: seeded,
            collapse_id,
        } => {
            collapsed_ids.insert(collapse_id);
            messages.extend(seeded);
        }
        TranscriptPatch::RefreshFirstMessage { blocks } => {
            if let Some(first) = messages.first_mut() {
                first.blocks = blocks;
            }
        }
        TranscriptPatch::ReplaceLogoBlock {
            message_id,
            block_index,
            content,
        } => {
            let Some(message) = messages.iter_mut().find(|message| message.id == message_id)
            else {
                return;
            };
            let Some(block) = message.blocks.get_mut(block_index) else {
                return;
            };
            *block = ContentBlock::text(content);
        }
    }
}
