//! Line renderer for the terminal client.
//!
//! Renders the whole screen as a flat list of styled lines: header,
//! transcript, validation banner, mode toggle, input hint, status footer.
//! Message blocks indent two columns under their role prefix; the agent list
//! collapses to a one-line summary when its id is in the collapse set.

use agent_registry::LocalAgentInfo;

use crate::app::ClientApp;
use crate::auth::AuthController;
use crate::component::Component;
use crate::text::{append_wrapped_text, display_path_with_home, visible_text_width};
use crate::theme::{blue, bold, cyan, dim, green, red, yellow};
use crate::transcript::{ChatMessage, ContentBlock, MessageVariant};
use crate::widgets::render_validation_banner;

pub fn render_screen(app: &mut ClientApp, auth: &AuthController, environment: &str) -> Vec<String> {
    let width = app.width();
    let mut lines = Vec::new();

    append_wrapped_text(&mut lines, width, &render_header(), "", "");

    let messages = app.messages.clone();
    for message in &messages {
        render_message_lines(app, message, width, &mut lines);
        lines.push(separator_line(width));
    }

    if let Some(banner) = render_validation_banner(
        app.validation_errors(),
        app.registry(),
        app.loaded().map(|loaded| loaded.agents_dir.as_path()),
        app.theme(),
        width,
    ) {
        lines.extend(banner);
    }

    lines.extend(app.mode_toggle.render(width));
    append_wrapped_text(&mut lines, width, &render_input_hint(app), "", "");
    append_wrapped_text(
        &mut lines,
        width,
        &render_status_footer(app, auth, environment),
        "",
        "",
    );

    lines
}

fn render_header() -> String {
    format!("{} {}", bold("Manicode"), dim("AI coding agents in your terminal"))
}

fn render_message_lines(
    app: &ClientApp,
    message: &ChatMessage,
    width: usize,
    lines: &mut Vec<String>,
) {
    let role_prefix = message_role_prefix(message);

    if message.blocks.is_empty() && message.content.is_empty() {
        append_wrapped_text(lines, width, "", &format!("{role_prefix}: "), "  ");
        return;
    }

    match message.variant {
        MessageVariant::User => {
            for (index, segment) in message.content.split('\n').enumerate() {
                let prefix = if index == 0 {
                    format!("{role_prefix}: ")
                } else {
                    "  ".to_string()
                };
                append_wrapped_text(lines, width, segment, &prefix, "  ");
            }
        }
        _ => {
            append_wrapped_text(lines, width, &format!("{role_prefix}:"), "", "");
            for block in &message.blocks {
                render_block_lines(app, block, width, lines);
            }
        }
    }
}

fn render_block_lines(
    app: &ClientApp,
    block: &ContentBlock,
    width: usize,
    lines: &mut Vec<String>,
) {
    match block {
        ContentBlock::Text {
            content,
            margin_top,
            margin_bottom,
        } => {
            for _ in 0..*margin_top {
                lines.push(String::new());
            }
            for segment in content.split('\n') {
                append_wrapped_text(lines, width, segment, "  ", "  ");
            }
            for _ in 0..*margin_bottom {
                lines.push(String::new());
            }
        }
        ContentBlock::Rendered { lines: rendered } => {
            for segment in rendered {
                append_wrapped_text(lines, width, segment, "  ", "  ");
            }
        }
        ContentBlock::AgentList { id, agents, .. } => {
            render_agent_list(app, id, agents, width, lines);
        }
    }
}

fn render_agent_list(
    app: &ClientApp,
    id: &str,
    agents: &[LocalAgentInfo],
    width: usize,
    lines: &mut Vec<String>,
) {
    let count = agents.len();
    if app.is_collapsed(id) {
        append_wrapped_text(
            lines,
            width,
            &dim(&format!("▸ Agents ({count})")),
            "  ",
            "  ",
        );
        return;
    }

    append_wrapped_text(lines, width, &format!("▾ Agents ({count})"), "  ", "  ");
    for agent in agents {
        let entry = format!("{} {}", cyan(&agent.id), dim(&agent.display_name));
        append_wrapped_text(lines, width, &entry, "  • ", "    ");
    }
}

fn message_role_prefix(message: &ChatMessage) -> String {
    let (role, role_label) = match message.variant {
        MessageVariant::User => (cyan("[user]"), "you"),
        MessageVariant::Ai => (blue("[ai]"), "assistant"),
        MessageVariant::Error => (red("[err]"), "error"),
    };

    format!("{role} {role_label}")
}

fn render_input_hint(app: &ClientApp) -> String {
    let prompt = if app.input_focused() {
        cyan(">")
    } else {
        dim(">")
    };
    format!("{prompt} {}", dim("message or /help"))
}

fn render_status_footer(app: &ClientApp, auth: &AuthController, environment: &str) -> String {
    let width = app.width();
    let left = render_session_location(app);
    let right = render_session_metadata(app, auth, environment);
    let left_width = visible_text_width(&left);
    let right_width = visible_text_width(&right);

    if width == 0 {
        return String::new();
    }

    if left_width + right_width + 2 > width {
        if right_width >= width {
            right
        } else {
            format!("{:>width$}", right, width = width)
        }
    } else {
        let fill = width - (left_width + right_width);
        format!("{left}{}{}", " ".repeat(fill), right)
    }
}

fn render_session_location(app: &ClientApp) -> String {
    let display = match app.loaded() {
        Some(loaded) => {
            let repo_root = loaded.agents_dir.parent().unwrap_or(&loaded.agents_dir);
            display_path_with_home(repo_root, app.home())
        }
        None => "loading agents".to_string(),
    };

    dim(&display)
}

fn render_session_metadata(app: &ClientApp, auth: &AuthController, environment: &str) -> String {
    let auth_label = match auth.is_authenticated() {
        Some(true) => {
            let name = auth
                .user()
                .map(|user| user.name.trim().to_string())
                .filter(|name| !name.is_empty());
            match name {
                Some(name) => green(&name),
                None => green("signed in"),
            }
        }
        Some(false) => yellow("signed out"),
        None => dim("auth pending"),
    };

    format!(
        "{} {} {} {} {} {} {}",
        dim("mode"),
        cyan(app.mode_toggle.mode().label()),
        dim("•"),
        auth_label,
        dim("•"),
        dim("env"),
        cyan(environment)
    )
}

fn separator_line(width: usize) -> String {
    let max = width.max(10);
    dim(&"─".repeat(max))
}
