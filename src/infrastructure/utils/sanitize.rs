use once_cell::sync::Lazy;
use regex::RegexSet;

static SUSPICIOUS_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?i)<iframe",
        r"(?i)<object",
        r"(?i)<embed",
        r"(?i)data:text/html",
    ])
    .expect("suspicious-content patterns must compile")
});

/// Escapes text for embedding in HTML markup. Maps the six characters
/// `& < > " ' /` to their entity equivalents; everything else passes through.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Flags input that looks like script injection: script/iframe/object/embed
/// tags, `javascript:` or `data:text/html` URIs, inline event handlers.
/// Callers decide what to do with a hit; nothing is rejected here.
pub fn contains_suspicious_content(input: &str) -> bool {
    SUSPICIOUS_PATTERNS.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_six_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="/x" onclick='f(&)'>"#),
            "&lt;a href=&quot;&#x2F;x&quot; onclick=&#x27;f(&amp;)&#x27;&gt;"
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_html("Hello, world. 42"), "Hello, world. 42");
    }

    #[test]
    fn detects_injection_patterns_case_insensitively() {
        for sample in [
            "<SCRIPT>alert(1)</SCRIPT>",
            "click javascript:void(0)",
            "<img onerror = alert(1)>",
            "<iframe src=x>",
            "<object data=x>",
            "<embed src=x>",
            "data:text/html,<b>x</b>",
        ] {
            assert!(contains_suspicious_content(sample), "missed: {sample}");
        }
    }

    #[test]
    fn ordinary_messages_are_not_flagged() {
        assert!(!contains_suspicious_content(
            "I would like to hear more about your on-site services."
        ));
    }
}
