//! ANSI styling and the chat theme palette.

use std::sync::Arc;

pub type StyleFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

pub fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

pub fn bold(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m", "\x1b[22m")
}

pub fn blue(text: &str) -> String {
    ansi_wrap(text, "\x1b[34m", "\x1b[39m")
}

pub fn cyan(text: &str) -> String {
    ansi_wrap(text, "\x1b[36m", "\x1b[39m")
}

pub fn yellow(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m", "\x1b[39m")
}

pub fn red(text: &str) -> String {
    ansi_wrap(text, "\x1b[31m", "\x1b[39m")
}

pub fn green(text: &str) -> String {
    ansi_wrap(text, "\x1b[32m", "\x1b[39m")
}

pub fn magenta(text: &str) -> String {
    ansi_wrap(text, "\x1b[35m", "\x1b[39m")
}

pub fn yellow_dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m\x1b[2m", "\x1b[22m\x1b[39m")
}

pub fn cyan_dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[36m\x1b[2m", "\x1b[22m\x1b[39m")
}

pub fn magenta_dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[35m\x1b[2m", "\x1b[22m\x1b[39m")
}

pub fn italic(text: &str) -> String {
    ansi_wrap(text, "\x1b[3m", "\x1b[23m")
}

/// Frame and label styles for one mode segment of the toggle.
#[derive(Clone)]
pub struct ModeStyle {
    pub frame: StyleFn,
    pub text: StyleFn,
}

/// The palette every widget draws from. Styles are functions so themes can
/// compose weight and color without the widgets knowing escape codes.
#[derive(Clone)]
pub struct ChatTheme {
    pub name: &'static str,
    pub foreground: StyleFn,
    pub secondary: StyleFn,
    pub warning: StyleFn,
    pub mode_fast: ModeStyle,
    pub mode_max: ModeStyle,
    pub mode_plan: ModeStyle,
    pub thinking: StyleFn,
}

/// Resolves a theme by name; unknown names fall back to the dark theme.
pub fn theme_by_name(name: Option<&str>) -> ChatTheme {
    match name {
        Some("plain") => plain_theme(),
        Some("dark") | None => dark_theme(),
        Some(other) => {
            log::debug!("unknown theme '{other}', using dark");
            dark_theme()
        }
    }
}

pub fn dark_theme() -> ChatTheme {
    ChatTheme {
        name: "dark",
        foreground: Arc::new(|text| text.to_string()),
        secondary: Arc::new(dim),
        warning: Arc::new(yellow),
        mode_fast: ModeStyle {
            frame: Arc::new(yellow_dim),
            text: Arc::new(yellow),
        },
        mode_max: ModeStyle {
            frame: Arc::new(magenta_dim),
            text: Arc::new(magenta),
        },
        mode_plan: ModeStyle {
            frame: Arc::new(cyan_dim),
            text: Arc::new(cyan),
        },
        thinking: Arc::new(|text| dim(&italic(text))),
    }
}

/// Identity styling for tests and terminals without color support.
pub fn plain_theme() -> ChatTheme {
    let identity: StyleFn = Arc::new(|text| text.to_string());
    ChatTheme {
        name: "plain",
        foreground: Arc::clone(&identity),
        secondary: Arc::clone(&identity),
        warning: Arc::clone(&identity),
        mode_fast: ModeStyle {
            frame: Arc::clone(&identity),
            text: Arc::clone(&identity),
        },
        mode_max: ModeStyle {
            frame: Arc::clone(&identity),
            text: Arc::clone(&identity),
        },
        mode_plan: ModeStyle {
            frame: Arc::clone(&identity),
            text: Arc::clone(&identity),
        },
        thinking: identity,
    }
}
