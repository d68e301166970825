//! `Cookie` / `Set-Cookie` header codec for persisted preferences

use super::store::expiry;
use crate::error::Result;
use chrono::Duration;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left alone by `encodeURIComponent`.
pub const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Decoded value of cookie `name` in a `Cookie` request header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| *key == name)
        .last()
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` header value persisting `name=value` for `ttl` on path `/`.
pub fn set_cookie(name: &str, value: &str, ttl: Duration) -> Result<String> {
    let expires = expiry(ttl)?;
    Ok(format!(
        "{}={}; Expires={}; Path=/",
        name,
        utf8_percent_encode(value, COMPONENT),
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_named_cookie() {
        let header = "session=abc; lang=tr; theme=dark";
        assert_eq!(cookie_value(header, "lang").as_deref(), Some("tr"));
        assert_eq!(cookie_value(header, "theme").as_deref(), Some("dark"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_value_is_percent_decoded() {
        assert_eq!(
            cookie_value("lang=pt%2DBR", "lang").as_deref(),
            Some("pt-BR")
        );
    }

    #[test]
    fn test_empty_cookie_counts_as_absent() {
        assert_eq!(cookie_value("lang=; theme=light", "lang"), None);
    }

    #[test]
    fn test_set_cookie_format() {
        let header = set_cookie("lang", "en US", Duration::days(7)).unwrap();
        assert!(header.starts_with("lang=en%20US; Expires="));
        assert!(header.ends_with("GMT; Path=/"));
    }

    #[test]
    fn test_set_cookie_rejects_unrepresentable_expiry() {
        assert!(set_cookie("theme", "dark", Duration::days(100_000_000)).is_err());
    }
}
