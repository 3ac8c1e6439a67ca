use std::fmt;

use regex::Regex;

use crate::compiler::{QueryError, Result};

/// A compiled SQL `LIKE` pattern.
///
/// `%` matches any run of characters, `_` exactly one, and `\` makes the
/// next character literal. Matching is case-sensitive and anchored.
#[derive(Clone)]
pub struct LikeMatcher {
    pattern: String,
    regex: Regex,
}

impl LikeMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut re = String::from("(?s)^");
        let mut chars = pattern.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '%' => re.push_str(".*"),
                '_' => re.push('.'),
                '\\' => {
                    let literal = chars.next().unwrap_or('\\');
                    re.push_str(&regex::escape(literal.encode_utf8(&mut [0; 4])));
                }
                c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        re.push('$');

        let regex = Regex::new(&re)
            .map_err(|e| QueryError::Validation(format!("invalid like pattern '{pattern}': {e}")))?;
        Ok(Self { pattern: pattern.to_string(), regex })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl PartialEq for LikeMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl fmt::Debug for LikeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LikeMatcher({:?})", self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn like(value: &str, pattern: &str) -> bool {
        LikeMatcher::new(pattern).unwrap().is_match(value)
    }

    #[test]
    fn wildcards() {
        assert!(like("mon@key.com", "%@key.com"));
        assert!(like("abc", "a_c"));
        assert!(!like("abbc", "a_c"));
        assert!(like("", "%"));
        assert!(like("multi\nline", "multi%"));
    }

    #[test]
    fn is_anchored_and_case_sensitive() {
        assert!(!like("xabc", "abc"));
        assert!(!like("ABC", "abc"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(like("a.c", "a.c"));
        assert!(!like("abc", "a.c"));
        assert!(like("(x)+[y]", "(x)+[y]"));
    }

    #[test]
    fn backslash_escapes() {
        assert!(like("100%", "100\\%"));
        assert!(!like("1000", "100\\%"));
        assert!(like("a_b", "a\\_b"));
        assert!(!like("axb", "a\\_b"));
    }
}
