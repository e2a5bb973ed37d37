//! SQL LIKE pattern matching
//!
//! `%` matches any run of characters, `_` matches exactly one. Patterns are
//! translated to anchored regexes; matching is case-insensitive, following
//! SQL LIKE semantics. An invalid pattern logs a warning and matches nothing.

use regex::Regex;

/// Compile a LIKE pattern, or `None` (with a logged warning) if the
/// translated regex is rejected.
pub fn compile(pattern: &str) -> Option<Regex> {
    let mut regex = String::with_capacity(pattern.len() + 6);
    regex.push_str("(?i)^");
    for ch in pattern.chars() {
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            c => {
                if c.is_ascii_punctuation() {
                    regex.push('\\');
                }
                regex.push(c);
            }
        }
    }
    regex.push('$');

    match Regex::new(&regex) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("invalid LIKE pattern {:?}: {}", pattern, e);
            None
        }
    }
}

/// One-shot match of `text` against a LIKE `pattern`.
pub fn like_match(text: &str, pattern: &str) -> bool {
    compile(pattern).is_some_and(|re| re.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_wildcard() {
        assert!(like_match("sched_switch", "sched%"));
        assert!(like_match("sched_switch", "%switch"));
        assert!(like_match("sched_switch", "%ed_sw%"));
        assert!(!like_match("sched_switch", "switch%"));
    }

    #[test]
    fn test_underscore_wildcard() {
        assert!(like_match("cpu0", "cpu_"));
        assert!(!like_match("cpu10", "cpu_"));
        assert!(like_match("cpu10", "cpu__"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(like_match("Binder", "binder"));
        assert!(like_match("binder", "BIN%"));
    }

    #[test]
    fn test_literal_metacharacters() {
        assert!(like_match("a.b", "a.b"));
        assert!(!like_match("axb", "a.b"));
        assert!(like_match("f(x)+1", "f(x)+_"));
    }

    #[test]
    fn test_exact_match_without_wildcards() {
        assert!(like_match("exact", "exact"));
        assert!(!like_match("exactly", "exact"));
    }
}
