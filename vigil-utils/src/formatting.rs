pub const DEFAULT_REASON: &str = "No reason provided";

/// Neutralise `@everyone`, `@here` and raw mentions in user-supplied text
/// by breaking the `@` with a zero-width space.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Trim a user-supplied reason, substituting the default when it is blank.
pub fn normalize_reason(reason: Option<String>) -> String {
    reason
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| DEFAULT_REASON.to_owned())
}

/// Cut `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Format a warning tally such as `2/3`.
pub fn format_tally(count: usize, max_warns: u32) -> String {
    format!("{count}/{max_warns}")
}

/// Group lines into pages holding at most `per_page` lines each.
pub fn chunk_lines(lines: &[String], per_page: usize) -> Vec<String> {
    lines
        .chunks(per_page.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{chunk_lines, format_tally, normalize_reason, sanitize_mentions, truncate};

    #[test]
    fn mentions_are_neutralised() {
        assert_eq!(sanitize_mentions("hi @everyone"), "hi @\u{200B}everyone");
        assert_eq!(sanitize_mentions("<@123>"), "<@\u{200B}123>");
        assert_eq!(sanitize_mentions("plain"), "plain");
    }

    #[test]
    fn reasons_default_when_blank() {
        assert_eq!(normalize_reason(None), "No reason provided");
        assert_eq!(normalize_reason(Some("   ".to_owned())), "No reason provided");
        assert_eq!(normalize_reason(Some(" spam ".to_owned())), "spam");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn tallies_and_pages() {
        assert_eq!(format_tally(2, 3), "2/3");

        let lines: Vec<String> = (1..=5).map(|i| i.to_string()).collect();
        assert_eq!(chunk_lines(&lines, 2), ["1\n2", "3\n4", "5"]);
        assert!(chunk_lines(&[], 2).is_empty());
    }
}
