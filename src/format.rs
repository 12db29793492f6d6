//! Terminal formatting helpers: role labels, a markdown-lite renderer for
//! responses, and human-readable byte sizes.

use colored::Colorize;

use crate::message::{Message, Role};

/// Format a message for terminal display with role label and colors.
pub fn format_message(msg: &Message) -> String {
    let label = match msg.role {
        Role::User => "you:".green().bold().to_string(),
        Role::Assistant => "tomo:".cyan().bold().to_string(),
    };
    let body = match msg.role {
        Role::User => msg.text().to_string(),
        Role::Assistant => render_markdown_lite(msg.text()),
    };
    format!("{}\n{}", label, body)
}

/// Human-readable size using 1024-based units: `512 B`, `60.0 KB`, `1.5 MB`.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KB", b / KIB)
    } else {
        format!("{:.1} MB", b / (KIB * KIB))
    }
}

/// Minimal markdown renderer for terminal output.
///
/// Not a full parser. Handles **bold**, `inline code`, `#` headings, and
/// fenced code blocks, which covers most of what models send back.
pub fn render_markdown_lite(text: &str) -> String {
    let mut lines_out: Vec<String> = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if let Some(fence) = line.trim_start().strip_prefix("```") {
            if in_code_block {
                in_code_block = false;
            } else {
                in_code_block = true;
                let lang = fence.trim();
                if !lang.is_empty() {
                    lines_out.push(format!("  {}", lang.dimmed()));
                }
            }
            continue;
        }

        if in_code_block {
            lines_out.push(format!("  {}", line.yellow()));
        } else if let Some(heading) = heading_text(line) {
            lines_out.push(heading.bold().underline().to_string());
        } else {
            lines_out.push(render_inline(line));
        }
    }

    lines_out.join("\n")
}

fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches('#');
    if trimmed.len() == line.len() || !trimmed.starts_with(' ') {
        return None;
    }
    Some(trimmed.trim())
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                result.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                result.push_str(&after[..end].cyan().to_string());
                rest = &after[end + 1..];
                continue;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            result.push(c);
        }
        rest = chars.as_str();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(60 * 1024), "60.0 KB");
        assert_eq!(format_size(200 * 1024), "200.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.5 MB");
    }

    #[test]
    fn test_markdown_lite_plain_text_is_unchanged() {
        colored::control::set_override(false);
        assert_eq!(render_markdown_lite("hello\nworld"), "hello\nworld");
    }

    #[test]
    fn test_markdown_lite_strips_markers() {
        colored::control::set_override(false);
        let out = render_markdown_lite("# Title\nuse **bold** and `code`\n```rust\nfn x() {}\n```");
        assert_eq!(out, "Title\nuse bold and code\n  rust\n  fn x() {}");
    }

    #[test]
    fn test_unclosed_markers_are_kept() {
        colored::control::set_override(false);
        assert_eq!(render_markdown_lite("a ** b ` c"), "a ** b ` c");
        assert_eq!(render_markdown_lite("#hashtag"), "#hashtag");
    }
}
