//! URL composition for request dispatch.
//!
//! This module resolves a base address and a request path into a single
//! absolute address and serializes query parameters onto it. The joining
//! rules are deliberately conservative: exactly one slash is normalized at
//! the seam and no other slashes are touched.

use serde_json::Value;

/// Returns `true` if `url` begins with a URI scheme.
///
/// A scheme is an ASCII letter followed by any run of letters, digits,
/// `+`, `.` or `-`, terminated by `:`.
///
/// # Example
///
/// ```rust
/// use courier_http::client::url::is_absolute_url;
///
/// assert!(is_absolute_url("https://example.com"));
/// assert!(is_absolute_url("custom+scheme.v2://host"));
/// assert!(!is_absolute_url("/api/admin/login"));
/// ```
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    let mut chars = url.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    for ch in chars {
        if ch == ':' {
            return true;
        }
        if !(ch.is_ascii_alphanumeric() || matches!(ch, '+' | '.' | '-')) {
            return false;
        }
    }
    false
}

/// Combines a base address and a request path into one address.
///
/// An empty `url` yields `base_url`; an empty `base_url` or an absolute
/// `url` yields `url` unchanged. Otherwise exactly one trailing slash is
/// stripped from `base_url`, exactly one leading slash from `url`, and the
/// two are joined with a single `/`. Slashes inside either value are never
/// collapsed.
#[must_use]
pub fn combine_url(base_url: &str, url: &str) -> String {
    if url.is_empty() {
        return base_url.to_string();
    }
    if base_url.is_empty() || is_absolute_url(url) {
        return url.to_string();
    }
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let path = url.strip_prefix('/').unwrap_or(url);
    format!("{base}/{path}")
}

/// Serializes `params` onto `url` as a query string.
///
/// Pairs are emitted in list order. `Null` values are skipped, arrays
/// expand into repeated `key=value` entries in array order (null items
/// skipped), objects are JSON-encoded and added once, strings are used
/// verbatim and other scalars are stringified. Keys and values are
/// percent-encoded. When no pairs survive, `url` is returned unchanged;
/// otherwise the query is appended with `?`, or `&` if `url` already has a
/// query component.
#[must_use]
pub fn append_params(url: &str, params: &[(String, Value)]) -> String {
    let mut query = String::new();
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if item.is_null() {
                        continue;
                    }
                    push_pair(&mut query, key, &scalar_to_string(item));
                }
            }
            Value::Object(_) => {
                let encoded = serde_json::to_string(value).unwrap_or_default();
                push_pair(&mut query, key, &encoded);
            }
            other => push_pair(&mut query, key, &scalar_to_string(other)),
        }
    }

    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

fn push_pair(query: &mut String, key: &str, value: &str) {
    if !query.is_empty() {
        query.push('&');
    }
    query.push_str(&urlencoding::encode(key));
    query.push('=');
    query.push_str(&urlencoding::encode(value));
}

/// Stringifies a scalar the way the query string expects: strings without
/// surrounding quotes, everything else via its JSON rendering.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_absolute_url_with_common_schemes() {
        assert!(is_absolute_url("http://example.com"));
        assert!(is_absolute_url("https://example.com"));
        assert!(is_absolute_url("ftp://example.com"));
        assert!(is_absolute_url("custom-scheme.v2+json://host"));
    }

    #[test]
    fn test_is_absolute_url_rejects_relative_paths() {
        assert!(!is_absolute_url(""));
        assert!(!is_absolute_url("/api/admin/login"));
        assert!(!is_absolute_url("api/admin/login"));
        assert!(!is_absolute_url("123://invalid-leading-digit"));
        assert!(!is_absolute_url("//protocol-relative.example.com"));
    }

    #[test]
    fn test_combine_url_slash_permutations() {
        assert_eq!(combine_url("https://a.com/", "/b"), "https://a.com/b");
        assert_eq!(combine_url("https://a.com", "/b"), "https://a.com/b");
        assert_eq!(combine_url("https://a.com/", "b"), "https://a.com/b");
        assert_eq!(combine_url("https://a.com", "b"), "https://a.com/b");
    }

    #[test]
    fn test_combine_url_empty_request_returns_base() {
        assert_eq!(combine_url("https://a.com", ""), "https://a.com");
    }

    #[test]
    fn test_combine_url_empty_base_returns_request() {
        assert_eq!(combine_url("", "/api/ping"), "/api/ping");
    }

    #[test]
    fn test_combine_url_absolute_request_wins() {
        assert_eq!(
            combine_url("https://a.com", "https://b.com/x"),
            "https://b.com/x"
        );
    }

    #[test]
    fn test_combine_url_does_not_collapse_inner_slashes() {
        assert_eq!(
            combine_url("https://a.com//base/", "//double/path"),
            "https://a.com//base//double/path"
        );
    }

    #[test]
    fn test_append_params_order_arrays_and_null_skipping() {
        let params = vec![
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!([2, 3])),
            ("c".to_string(), Value::Null),
        ];
        assert_eq!(
            append_params("https://a.com/x", &params),
            "https://a.com/x?a=1&b=2&b=3"
        );
    }

    #[test]
    fn test_append_params_empty_set_leaves_url_unchanged() {
        assert_eq!(append_params("https://a.com/x", &[]), "https://a.com/x");

        let only_null = vec![("a".to_string(), Value::Null)];
        assert_eq!(
            append_params("https://a.com/x", &only_null),
            "https://a.com/x"
        );
    }

    #[test]
    fn test_append_params_uses_ampersand_with_existing_query() {
        let params = vec![("b".to_string(), json!("2"))];
        assert_eq!(
            append_params("https://a.com/x?a=1", &params),
            "https://a.com/x?a=1&b=2"
        );
    }

    #[test]
    fn test_append_params_serializes_objects_as_json() {
        let params = vec![("filter".to_string(), json!({"active": true}))];
        assert_eq!(
            append_params("/items", &params),
            format!("/items?filter={}", urlencoding::encode(r#"{"active":true}"#))
        );
    }

    #[test]
    fn test_append_params_strings_are_not_quoted() {
        let params = vec![("q".to_string(), json!("hello world"))];
        assert_eq!(append_params("/search", &params), "/search?q=hello%20world");
    }

    #[test]
    fn test_append_params_skips_null_items_inside_arrays() {
        let params = vec![("tag".to_string(), json!(["a", null, "b"]))];
        assert_eq!(append_params("/t", &params), "/t?tag=a&tag=b");
    }

    #[test]
    fn test_append_params_booleans_and_floats() {
        let params = vec![
            ("active".to_string(), json!(true)),
            ("score".to_string(), json!(2.5)),
        ];
        assert_eq!(append_params("/q", &params), "/q?active=true&score=2.5");
    }
}
