//! Validation banner for agent definition problems.

use std::path::Path;

use agent_registry::{resolve_agent_id, LocalAgentRegistry, ValidationError};

use crate::text::{append_wrapped_text, truncate_chars, visible_text_width};
use crate::theme::{ChatTheme, StyleFn};

const MAX_VISIBLE_ERRORS: usize = 5;
const MESSAGE_CHAR_LIMIT: usize = 68;
const MESSAGE_KEPT_CHARS: usize = 65;

struct BannerParts {
    header: String,
    body: String,
    footer: Option<String>,
}

/// Plain banner lines wrapped at `width`, without border or styling. Used to
/// bake validation errors into transcript blocks.
pub fn banner_lines(
    errors: &[ValidationError],
    registry: Option<&LocalAgentRegistry>,
    agents_dir: Option<&Path>,
    width: usize,
) -> Option<Vec<String>> {
    let parts = compose(errors, registry, agents_dir)?;

    let mut lines = vec![parts.header];
    for line in parts.body.split('\n') {
        append_wrapped_text(&mut lines, width, line, "", "  ");
    }
    if let Some(footer) = parts.footer {
        lines.push(footer);
    }
    Some(lines)
}

/// Bordered, themed banner at `width` columns. Empty input renders nothing.
pub fn render_validation_banner(
    errors: &[ValidationError],
    registry: Option<&LocalAgentRegistry>,
    agents_dir: Option<&Path>,
    theme: &ChatTheme,
    width: usize,
) -> Option<Vec<String>> {
    let parts = compose(errors, registry, agents_dir)?;
    let inner = width.saturating_sub(4).max(10);

    let horizontal = "─".repeat(inner + 2);
    let side = (theme.warning)("│");

    let mut lines = vec![(theme.warning)(&format!("┌{horizontal}┐"))];
    lines.push(bordered_row("", inner, &side));

    let mut header_lines = Vec::new();
    append_wrapped_text(&mut header_lines, inner, &parts.header, "", "");
    for line in header_lines {
        lines.push(styled_row(&line, inner, &side, &theme.foreground));
    }

    for body_line in parts.body.split('\n') {
        let mut wrapped = Vec::new();
        append_wrapped_text(&mut wrapped, inner, body_line, "", "  ");
        for line in wrapped {
            lines.push(styled_row(&line, inner, &side, &theme.foreground));
        }
    }

    if let Some(footer) = parts.footer {
        lines.push(styled_row(&footer, inner, &side, &theme.secondary));
    }

    lines.push(bordered_row("", inner, &side));
    lines.push((theme.warning)(&format!("└{horizontal}┘")));
    Some(lines)
}

fn compose(
    errors: &[ValidationError],
    registry: Option<&LocalAgentRegistry>,
    agents_dir: Option<&Path>,
) -> Option<BannerParts> {
    if errors.is_empty() {
        return None;
    }

    let error_count = errors.len();
    let has_more = error_count > MAX_VISIBLE_ERRORS;

    let mut header = if error_count == 1 {
        "⚠️  1 agent has validation issues".to_string()
    } else {
        format!("⚠️  {error_count} agents have validation issues")
    };
    if has_more {
        header.push_str(&format!(" (showing {MAX_VISIBLE_ERRORS} of {error_count})"));
    }

    let body: String = errors
        .iter()
        .take(MAX_VISIBLE_ERRORS)
        .enumerate()
        .map(|(index, error)| format_error_entry(error, index, registry, agents_dir))
        .collect();

    let footer = has_more.then(|| format!("... and {} more", error_count - MAX_VISIBLE_ERRORS));

    Some(BannerParts {
        header,
        body,
        footer,
    })
}

fn format_error_entry(
    error: &ValidationError,
    index: usize,
    registry: Option<&LocalAgentRegistry>,
    agents_dir: Option<&Path>,
) -> String {
    let agent_id = resolve_agent_id(&error.id);
    let relative_path = registry
        .and_then(|registry| registry.get(agent_id))
        .map(|info| display_agent_path(&info.file_path, agents_dir));

    let (field_name, message) = split_field_message(&error.message);
    let error_msg = match field_name {
        Some(field_name) => format!("{field_name}: {message}"),
        None => message.to_string(),
    };
    let truncated = truncate_chars(&error_msg, MESSAGE_CHAR_LIMIT, MESSAGE_KEPT_CHARS);

    let mut output = if index == 0 {
        "\n".to_string()
    } else {
        "\n\n".to_string()
    };
    output.push_str(agent_id);
    if let Some(relative_path) = relative_path {
        output.push_str(&format!(" ({relative_path})"));
    }
    output.push_str("\n  ");
    output.push_str(&truncated);
    output
}

/// Renders a definition file path relative to the agents directory, with
/// forward slashes and the `.agents/` prefix the product shows everywhere.
fn display_agent_path(file_path: &Path, agents_dir: Option<&Path>) -> String {
    let Some(agents_dir) = agents_dir else {
        return file_path.display().to_string();
    };

    let relative = file_path.strip_prefix(agents_dir).unwrap_or(file_path);
    let normalized = relative.to_string_lossy().replace('\\', "/");
    format!(".agents/{normalized}")
}

/// Splits a `field: detail` message into its field name and body. Only a bare
/// dotted identifier before the first `: ` counts as a field name; prose
/// containing a colon passes through whole.
fn split_field_message(message: &str) -> (Option<&str>, &str) {
    if let Some((prefix, rest)) = message.split_once(": ") {
        if is_field_name(prefix) {
            return (Some(prefix), rest);
        }
    }
    (None, message)
}

fn is_field_name(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
}

fn styled_row(content: &str, inner: usize, side: &str, style: &StyleFn) -> String {
    bordered_row(&style(content), inner, side)
}

fn bordered_row(content: &str, inner: usize, side: &str) -> String {
    let pad = inner.saturating_sub(visible_text_width(content));
    format!("{side} {content}{} {side}", " ".repeat(pad))
}
