//! URL and input validation utilities

use url::Url;

/// Check if a locator is something yt-dlp can download from
pub fn is_valid_media_url(url: &str) -> bool {
    if let Ok(parsed) = Url::parse(url) {
        let scheme = parsed.scheme();
        (scheme == "http" || scheme == "https") && parsed.host_str().is_some()
    } else {
        false
    }
}

/// Escape a value for use inside a quoted Lucene phrase
pub fn escape_lucene_phrase(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_urls() {
        assert!(is_valid_media_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_media_url("http://youtu.be/abc"));
        assert!(!is_valid_media_url("ftp://example.com/a"));
        assert!(!is_valid_media_url("dQw4w9WgXcQ"));
        assert!(!is_valid_media_url(""));
    }

    #[test]
    fn lucene_escaping() {
        assert_eq!(escape_lucene_phrase("plain"), "plain");
        assert_eq!(escape_lucene_phrase(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_lucene_phrase(r"a\b"), r"a\\b");
    }
}
