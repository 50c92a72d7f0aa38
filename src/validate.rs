use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref URL_RE: Regex = Regex::new(r"^https?://[^\s]+$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Accepts absolute http(s) URLs, used for avatar and course image fields.
pub(crate) fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_emails() {
        assert!(is_valid_email("jhon@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.io"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(is_valid_url("https://picsum.photos/800/600?random=100"));
        assert!(is_valid_url("http://example.com/a.png"));
    }

    #[test]
    fn rejects_non_urls() {
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("example.com/missing-scheme"));
        assert!(!is_valid_url("https://has space.com"));
    }
}
