use std::sync::OnceLock;

use regex::Regex;

/// Compiles `pattern` into `cell` on first use. Patterns are literals, so a
/// compile failure is a bug and panics.
pub fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid regex {pattern}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_once() {
        static RE: OnceLock<Regex> = OnceLock::new();
        let first = cached_regex(&RE, r"\d+");
        let second = cached_regex(&RE, r"\d+");
        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("2024"));
    }
}
