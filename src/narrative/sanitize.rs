use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_FENCE: Regex = Regex::new(r"(?i)\A```[a-z0-9_+-]*[ \t]*\r?\n?").unwrap();
    static ref TRAILING_FENCE: Regex = Regex::new(r"\r?\n?```[ \t]*\z").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"\*\*|__").unwrap();
}

/// Strip a wrapping code fence and bold markers from generated markdown.
///
/// Single `*` is left alone because it doubles as a list bullet.
pub fn sanitize_narrative(text: &str) -> String {
    let trimmed = text.trim();
    let unfenced = LEADING_FENCE.replace(trimmed, "");
    let unfenced = TRAILING_FENCE.replace(&unfenced, "");
    EMPHASIS.replace_all(&unfenced, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_markdown_is_unwrapped() {
        let raw = "```markdown\n**Sun in Aries**: bold and driven.\n```";
        assert_eq!(sanitize_narrative(raw), "Sun in Aries: bold and driven.");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let raw = "```\nMoon in Cancer\n```\n";
        assert_eq!(sanitize_narrative(raw), "Moon in Cancer");
    }

    #[test]
    fn test_language_tag_is_case_insensitive() {
        assert_eq!(sanitize_narrative("```Markdown\nhello\n```"), "hello");
    }

    #[test]
    fn test_plain_text_is_untouched_apart_from_emphasis() {
        let raw = "* Mars in Leo: __fiery__ energy\n* Venus in Virgo";
        assert_eq!(sanitize_narrative(raw), "* Mars in Leo: fiery energy\n* Venus in Virgo");
    }

    #[test]
    fn test_inner_fences_are_kept() {
        let raw = "Intro\n```\ncode\n```\nOutro";
        assert_eq!(sanitize_narrative(raw), raw);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize_narrative(""), "");
        assert_eq!(sanitize_narrative("```\n```"), "");
    }
}
