//! Collapsible thinking region.

use crate::component::Component;
use crate::text::{append_wrapped_text, truncate_chars};
use crate::theme::ChatTheme;

/// Gutter reserved around thinking content; the wrap width never drops below
/// the same floor the separator uses.
const WIDTH_MARGIN: usize = 10;
const MIN_CONTENT_WIDTH: usize = 10;

/// A run of adjacent thinking text blocks combined into one collapsible
/// region. Collapsed by default; empty combined content builds nothing.
pub struct Thinking {
    id: String,
    content: String,
    collapsed: bool,
    theme: ChatTheme,
}

impl Thinking {
    /// Combines the contents of adjacent thinking blocks starting at
    /// `start_index` within the message keyed by `key_prefix`. Returns `None`
    /// when the combined content is empty after trimming.
    pub fn from_texts(
        key_prefix: &str,
        start_index: usize,
        texts: &[String],
        collapsed: Option<bool>,
        theme: ChatTheme,
    ) -> Option<Self> {
        let combined = texts.concat();
        let content = combined.trim();
        if content.is_empty() {
            return None;
        }

        Some(Self {
            id: format!("{key_prefix}-thinking-{start_index}"),
            content: content.to_string(),
            collapsed: collapsed.unwrap_or(true),
            theme,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
    }

    fn content_width(width: usize) -> usize {
        width.saturating_sub(WIDTH_MARGIN).max(MIN_CONTENT_WIDTH)
    }
}

impl Component for Thinking {
    fn render(&mut self, width: usize) -> Vec<String> {
        let content_width = Self::content_width(width);

        if self.collapsed {
            let first_line = self.content.lines().next().unwrap_or_default();
            let preview = truncate_chars(first_line, content_width, content_width.saturating_sub(3));
            return vec![(self.theme.thinking)(&format!("thinking {preview}"))];
        }

        let mut lines = vec![(self.theme.thinking)("thinking")];
        let mut wrapped = Vec::new();
        append_wrapped_text(&mut wrapped, content_width, &self.content, "  ", "  ");
        for line in wrapped {
            lines.push((self.theme.thinking)(&line));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::Thinking;

    use crate::component::Component;
    use crate::text::{strip_ansi, visible_text_width};
    use crate::theme::{dark_theme, plain_theme};

    fn texts(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| (*part).to_string()).collect()
    }

    #[test]
    fn empty_combined_content_builds_nothing() {
        assert!(Thinking::from_texts("msg-1", 0, &[], None, plain_theme()).is_none());
        assert!(
            Thinking::from_texts("msg-1", 0, &texts(&["  ", "\n"]), None, plain_theme()).is_none()
        );
    }

    #[test]
    fn adjacent_blocks_combine_under_one_key() {
        let thinking = Thinking::from_texts(
            "msg-1",
            2,
            &texts(&["I should check the loader", " and then the registry."]),
            None,
            plain_theme(),
        )
        .expect("content should build");

        assert_eq!(thinking.id(), "msg-1-thinking-2");
        assert!(thinking.is_collapsed());
    }

    #[test]
    fn collapsed_renders_a_single_preview_line() {
        let mut thinking = Thinking::from_texts(
            "msg-1",
            0,
            &texts(&["first line of reasoning\nsecond line"]),
            None,
            plain_theme(),
        )
        .expect("content should build");

        let lines = thinking.render(80);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("thinking first line"));
        assert!(!lines[0].contains("second"));
    }

    #[test]
    fn expanded_wraps_inside_the_margin() {
        let mut thinking = Thinking::from_texts(
            "msg-1",
            0,
            &texts(&["word ".repeat(20).trim()]),
            Some(false),
            dark_theme(),
        )
        .expect("content should build");

        let lines = thinking.render(40);
        assert_eq!(strip_ansi(&lines[0]), "thinking");
        // Wrap width is 40 - 10; the indent keeps every line inside it.
        for line in &lines[1..] {
            assert!(visible_text_width(line) <= 30);
        }
        assert!(lines.len() > 2);
    }

    #[test]
    fn narrow_widths_keep_a_minimum_wrap_width() {
        let mut thinking = Thinking::from_texts(
            "msg-1",
            0,
            &texts(&["abcdefghijklmnop"]),
            Some(false),
            plain_theme(),
        )
        .expect("content should build");

        let lines = thinking.render(5);
        for line in &lines[1..] {
            assert!(visible_text_width(line) <= 10);
        }
    }

    #[test]
    fn toggle_flips_collapse_state() {
        let mut thinking =
            Thinking::from_texts("msg-1", 0, &texts(&["reasoning"]), None, plain_theme())
                .expect("content should build");

        assert!(thinking.is_collapsed());
        thinking.toggle();
        assert!(!thinking.is_collapsed());
        assert!(thinking.render(80).len() >= 2);
    }
}
