//! `${name}` reference tokens in configuration text

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

static REFERENCE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn reference_pattern() -> &'static Regex {
    REFERENCE_PATTERN
        .get_or_init(|| Regex::new(r"\$\{([^{}]+)\}").expect("reference pattern is a valid regex"))
}

/// A `${name}` token found in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Byte range of the whole token, delimiters included
    pub span: Range<usize>,

    /// Referenced name with surrounding whitespace removed
    pub name: &'a str,
}

/// Iterate over the `${name}` tokens of a text, left to right
pub fn references(text: &str) -> impl Iterator<Item = Reference<'_>> {
    reference_pattern().captures_iter(text).filter_map(|caps| {
        let token = caps.get(0)?;
        let name = caps.get(1)?.as_str().trim();
        Some(Reference {
            span: token.range(),
            name,
        })
    })
}

/// Check if a text contains at least one `${name}` token
pub fn is_template(text: &str) -> bool {
    reference_pattern().is_match(text)
}

/// Name referenced by a text that consists of exactly one `${name}` token
pub fn whole_reference(text: &str) -> Option<&str> {
    let mut tokens = references(text);
    let first = tokens.next()?;
    if first.span == (0..text.len()) {
        Some(first.name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references() {
        let found: Vec<_> = references("Testing ${UNKNOWN}, ${p}").collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "UNKNOWN");
        assert_eq!(found[0].span, 8..18);
        assert_eq!(found[1].name, "p");
    }

    #[test]
    fn test_whole_reference() {
        assert_eq!(whole_reference("${p}"), Some("p"));
        assert_eq!(whole_reference("${ trigger1.event }"), Some("trigger1.event"));
        assert_eq!(whole_reference(" ${p}"), None);
        assert_eq!(whole_reference("${p}${q}"), None);
        assert_eq!(whole_reference("plain"), None);
    }

    #[test]
    fn test_is_template() {
        assert!(is_template("a ${b} c"));
        assert!(!is_template("no tokens"));
        assert!(!is_template("${}"));
        assert!(!is_template("$ {p}"));
    }
}
