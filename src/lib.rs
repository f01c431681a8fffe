//! Terminal client for Codebuff local coding agents.
//!
//! ## Configuration
//!
//! Everything is environment-driven:
//!
//! - `NEXT_PUBLIC_CB_ENVIRONMENT` names the environment (`dev` when unset).
//!   It selects the per-environment credentials directory and, when `prod`,
//!   arms analytics.
//! - `MANICODE_AGENTS_DIR` points at the agents directory; defaults to
//!   `.agents` under the current directory.
//! - `MANICODE_REQUIRE_AUTH` answers the initial authentication question:
//!   `1` starts signed out, `0` starts signed in, unset leaves the state
//!   unknown until the identity check settles.
//! - `MANICODE_THEME` selects `dark` (default) or `plain`.
//! - `MANICODE_POSTHOG_API_KEY` / `MANICODE_POSTHOG_HOST` configure event
//!   delivery; without a key analytics stays disabled even in `prod`.
//!
//! Credentials live at `~/.config/manicode/credentials.json`, with a
//! `-<env>` directory suffix outside `prod`.
//!
//! ## Transcript ownership
//!
//! The first transcript message belongs to the client: logo, intro, and the
//! loaded agent list. It is rebuilt in place whenever agent data, theme, or
//! width changes, and reseeded only when the transcript empties.

pub mod app;
pub mod auth;
pub mod commands;
pub mod component;
pub mod config;
pub mod text;
pub mod theme;
pub mod transcript;
pub mod tui;
pub mod widgets;
