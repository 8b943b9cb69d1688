//! Raw query-string parameters.

use std::collections::BTreeMap;

/// Query-string parameters as delivered by the HTTP layer or the CLI.
pub type Params = BTreeMap<String, String>;

/// A parameter value, treating an empty string as absent.
pub(crate) fn text<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// A positive integer parameter; absent, non-numeric and zero values all
/// coerce to `default`. The whole value must be an integer: `3abc` and
/// `2.5` are not read as a leading-digit prefix.
pub(crate) fn positive(params: &Params, key: &str, default: usize) -> usize {
    text(params, key)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_text_is_absent() {
        let p = params(&[("query", ""), ("location", "Leeds")]);
        assert_eq!(text(&p, "query"), None);
        assert_eq!(text(&p, "location"), Some("Leeds"));
        assert_eq!(text(&p, "missing"), None);
    }

    #[test]
    fn positive_coercion() {
        let p = params(&[("a", "3"), ("b", "abc"), ("c", "0"), ("d", "-2"), ("e", " 7 ")]);
        assert_eq!(positive(&p, "a", 1), 3);
        assert_eq!(positive(&p, "b", 1), 1);
        assert_eq!(positive(&p, "c", 20), 20);
        assert_eq!(positive(&p, "d", 20), 20);
        assert_eq!(positive(&p, "e", 1), 7);
        assert_eq!(positive(&p, "missing", 20), 20);
    }

    #[test]
    fn no_leading_digit_prefix() {
        let p = params(&[("page", "3abc"), ("limit", "2.5")]);
        assert_eq!(positive(&p, "page", 1), 1);
        assert_eq!(positive(&p, "limit", 20), 20);
    }
}
