//! ANSI-aware text helpers shared by the widgets and the line renderer.

use std::path::Path;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Removes CSI escape sequences, leaving only printable text.
pub fn strip_ansi(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == 0x1b && index + 1 < bytes.len() && bytes[index + 1] == b'[' {
            index += 2;
            while index < bytes.len() {
                let byte = bytes[index];
                index += 1;
                if (b'@'..=b'~').contains(&byte) {
                    break;
                }
            }
            continue;
        }

        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8(output).unwrap_or_default()
}

/// Display width of `text` with escape sequences ignored.
pub fn visible_text_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(text).as_str())
}

/// Wraps `text` into `lines` at `width` columns, carrying escape sequences
/// through without counting them. `first_prefix` starts the first line and
/// `continuation_prefix` every later one, including after embedded newlines.
pub fn append_wrapped_text(
    lines: &mut Vec<String>,
    width: usize,
    text: &str,
    first_prefix: &str,
    continuation_prefix: &str,
) {
    if width == 0 {
        lines.push(format!("{first_prefix}{text}"));
        return;
    }

    let width = width.max(1);
    let mut line = first_prefix.to_string();
    let mut visible_len = visible_text_width(&line);

    if text.is_empty() {
        lines.push(line);
        return;
    }

    let mut index = 0;
    let bytes = text.as_bytes();
    while index < bytes.len() {
        if bytes[index] == 0x1b && index + 1 < bytes.len() && bytes[index + 1] == b'[' {
            let start = index;
            index += 2;
            while index < bytes.len() {
                let byte = bytes[index];
                index += 1;
                if (b'@'..=b'~').contains(&byte) {
                    break;
                }
            }
            line.push_str(std::str::from_utf8(&bytes[start..index]).unwrap_or_default());
            continue;
        }

        let ch = match std::str::from_utf8(&bytes[index..])
            .ok()
            .and_then(|rest| rest.chars().next())
        {
            Some(ch) => ch,
            None => break,
        };
        index += ch.len_utf8();

        if ch == '\n' {
            lines.push(line);
            line = continuation_prefix.to_string();
            visible_len = visible_text_width(&line);
            continue;
        }

        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if visible_len + ch_width > width {
            lines.push(line);
            line = continuation_prefix.to_string();
            visible_len = visible_text_width(&line);
        }

        line.push(ch);
        visible_len += ch_width;
    }

    lines.push(line);
}

/// Truncates to the first `kept_chars` characters plus `...` when `text`
/// exceeds `max_chars` characters. Counts characters, not columns, so a text
/// of exactly `max_chars` characters passes through untouched.
pub fn truncate_chars(text: &str, max_chars: usize, kept_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let kept: String = text.chars().take(kept_chars).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

/// Formats a path for display, abbreviating the home directory to `~`.
/// Paths outside the home directory come back absolute.
pub fn display_path_with_home(path: &Path, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return path.display().to_string();
    };

    match path.strip_prefix(home) {
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    #[test]
    fn strip_ansi_removes_color_sequences() {
        assert_eq!(strip_ansi("\x1b[2mdim\x1b[22m text"), "dim text");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn visible_width_ignores_escapes() {
        assert_eq!(visible_text_width("\x1b[33mFAST\x1b[39m"), 4);
        assert_eq!(visible_text_width(" FAST < "), 8);
    }

    #[test]
    fn wrap_keeps_prefixes_and_newlines() {
        let mut lines = Vec::new();
        append_wrapped_text(&mut lines, 10, "first\nsecond line", "> ", "  ");
        assert_eq!(lines[0], "> first");
        assert_eq!(lines[1], "  second l");
        assert_eq!(lines[2], "  ine");
    }

    #[test]
    fn wrap_carries_escape_sequences_without_counting_them() {
        let mut lines = Vec::new();
        append_wrapped_text(&mut lines, 5, "\x1b[2mabcde\x1b[22m", "", "");
        assert_eq!(lines.len(), 1);
        assert_eq!(strip_ansi(&lines[0]), "abcde");
    }

    #[test]
    fn truncate_is_exact_at_the_boundary() {
        let at_limit = "x".repeat(68);
        assert_eq!(truncate_chars(&at_limit, 68, 65), at_limit);

        let over_limit = "x".repeat(69);
        let truncated = truncate_chars(&over_limit, 68, 65);
        assert_eq!(truncated.chars().count(), 68);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.trim_end_matches('.'), "x".repeat(65));
    }

    #[test]
    fn display_path_abbreviates_home() {
        let home = Path::new("/home/dev");
        assert_eq!(
            display_path_with_home(Path::new("/home/dev/project"), Some(home)),
            "~/project"
        );
        assert_eq!(
            display_path_with_home(Path::new("/srv/project"), Some(home)),
            "/srv/project"
        );
        assert_eq!(
            display_path_with_home(Path::new("/srv/project"), None),
            "/srv/project"
        );
    }
}
