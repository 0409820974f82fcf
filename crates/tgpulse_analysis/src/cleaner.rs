use regex::Regex;
use std::sync::LazyLock;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("mention pattern is valid"));
static RETWEET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bRT\s+").expect("retweet pattern is valid"));
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url pattern is valid"));
static NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("newline pattern is valid"));

/// Strips `@mentions`, `#` symbols, `RT` markers and URLs, and folds newlines
/// into spaces. Posts without text clean to an empty string.
pub fn clean_text(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let text = MENTION.replace_all(text, "");
    let text = text.replace('#', "");
    let text = RETWEET.replace_all(&text, "");
    let text = URL.replace_all(&text, "");

    NEWLINE.replace_all(&text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_text_is_empty() {
        assert_eq!(clean_text(None), "");
    }

    #[test]
    fn removes_mentions() {
        assert_eq!(clean_text(Some("thanks @crypto_desk99 and @Bob")), "thanks  and ");
    }

    #[test]
    fn removes_hash_symbols_but_keeps_words() {
        assert_eq!(clean_text(Some("#bitcoin to the #moon")), "bitcoin to the moon");
    }

    #[test]
    fn removes_retweet_marker() {
        assert_eq!(clean_text(Some("RT @whale: $BTC pumping")), ": $BTC pumping");
        assert_eq!(clean_text(Some("RT   big news")), "big news");
    }

    #[test]
    fn keeps_words_containing_rt() {
        assert_eq!(clean_text(Some("START trading")), "START trading");
    }

    #[test]
    fn removes_urls() {
        assert_eq!(
            clean_text(Some("read https://example.com/a?b=1 and http://x.io now")),
            "read  and  now"
        );
    }

    #[test]
    fn folds_newlines() {
        assert_eq!(clean_text(Some("line one\nline two\r\nthree")), "line one line two three");
    }

    #[test]
    fn output_contains_no_stripped_patterns() {
        let samples = [
            "RT @alpha: #ETH breakout https://t.me/s/alpha\nstay tuned",
            "@a @b_c #x#y http://a.b/c\n\nRT done",
            "plain text",
            "",
        ];

        for sample in samples {
            let cleaned = clean_text(Some(sample));
            assert!(!MENTION.is_match(&cleaned), "{cleaned:?}");
            assert!(!cleaned.contains('#'), "{cleaned:?}");
            assert!(!cleaned.starts_with("RT "), "{cleaned:?}");
            assert!(!URL.is_match(&cleaned), "{cleaned:?}");
            assert!(!cleaned.contains('\n'), "{cleaned:?}");
        }
    }
}
