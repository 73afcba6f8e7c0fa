//! Path expression evaluation over context values
//!
//! A path is a sequence of dot-separated identifiers and bracketed keys,
//! e.g. `trigger1.event[payload].level`. Evaluation walks the value one hop
//! at a time and gives up (returns `None`) at the first hop it cannot take.

use hab_core::Value;
use minijinja::value::ValueKind;
use tracing::trace;

/// A single step of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// `[key]`, key taken verbatim
    Bracket(&'a str),

    /// Bare identifier up to the next `.` or `[`
    Ident(&'a str),
}

/// Split the next token off a path that has no leading separators
///
/// Returns `None` for an unterminated or empty bracket.
fn next_token(path: &str) -> Option<(Token<'_>, &str)> {
    if let Some(inner) = path.strip_prefix('[') {
        let end = inner.find(']')?;
        let key = &inner[..end];
        if key.is_empty() {
            return None;
        }
        Some((Token::Bracket(key), &inner[end + 1..]))
    } else {
        let end = path
            .find(|c| c == '.' || c == '[')
            .unwrap_or(path.len());
        Some((Token::Ident(&path[..end]), &path[end..]))
    }
}

/// Look up a key in a keyed container
fn lookup(container: &Value, key: &str) -> Option<Value> {
    container
        .get_item(&Value::from(key))
        .ok()
        .filter(|v| !v.is_undefined())
}

/// Read a named property of a property-bearing object
fn property(object: &Value, name: &str) -> Option<Value> {
    object.get_attr(name).ok().filter(|v| !v.is_undefined())
}

/// One hop into a keyed container
///
/// A bare identifier first tries the whole dotted run ahead of it (up to the
/// next `[`) as a single key, dropping one trailing segment at a time, so
/// keys such as `"trigger1.event"` are found before `"trigger1"`.
fn container_hop<'a>(container: &Value, path: &'a str) -> Option<(Value, &'a str)> {
    match next_token(path)? {
        (Token::Bracket(key), rest) => lookup(container, key).map(|v| (v, rest)),
        (Token::Ident(_), _) => {
            let run = &path[..path.find('[').unwrap_or(path.len())];
            let mut end = run.len();
            loop {
                if let Some(value) = lookup(container, &run[..end]) {
                    return Some((value, &path[end..]));
                }
                end = run[..end].rfind('.')?;
                if end == 0 {
                    return None;
                }
            }
        }
    }
}

/// One hop into a property-bearing object
fn property_hop<'a>(object: &Value, path: &'a str) -> Option<(Value, &'a str)> {
    let (token, rest) = next_token(path)?;
    let name = match token {
        Token::Bracket(name) | Token::Ident(name) => name,
    };
    property(object, name).map(|v| (v, rest))
}

/// Evaluate a path expression against a root value
///
/// Keyed containers (maps) are entered by key, property-bearing objects by
/// property name. Leading and repeated `.` separators are ignored and an
/// empty path yields the root itself. Never fails: any hop that cannot be
/// taken, including malformed brackets, yields `None`.
pub fn get_value(root: &Value, path: &str) -> Option<Value> {
    let mut current = root.clone();
    let mut rest = path;

    loop {
        rest = rest.trim_start_matches('.');
        if rest.is_empty() {
            return Some(current);
        }

        let hop = match current.kind() {
            ValueKind::Map => container_hop(&current, rest),
            ValueKind::Plain => property_hop(&current, rest),
            _ => None,
        };

        match hop {
            Some((value, remaining)) => {
                current = value;
                rest = remaining;
            }
            None => {
                trace!("Path '{}' unresolved at '{}'", path, rest);
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_token() {
        assert_eq!(
            next_token("[a.b].c"),
            Some((Token::Bracket("a.b"), ".c"))
        );
        assert_eq!(next_token("a.b"), Some((Token::Ident("a"), ".b")));
        assert_eq!(next_token("a[b]"), Some((Token::Ident("a"), "[b]")));
        assert_eq!(next_token("abc"), Some((Token::Ident("abc"), "")));
        assert_eq!(next_token("[unterminated"), None);
        assert_eq!(next_token("[]"), None);
    }

    #[test]
    fn test_empty_path_returns_root() {
        let root = Value::from(42);
        assert_eq!(get_value(&root, ""), Some(Value::from(42)));
        assert_eq!(get_value(&root, "..."), Some(Value::from(42)));
    }

    #[test]
    fn test_scalar_root_is_not_traversable() {
        assert_eq!(get_value(&Value::from("text"), "len"), None);
        assert_eq!(get_value(&Value::from(1), "[0]"), None);
    }

    #[test]
    fn test_longest_dotted_key_wins() {
        let root = Value::from_iter([
            ("a.b.c", Value::from("whole")),
            ("a.b", Value::from_iter([("c", "partial")])),
        ]);

        assert_eq!(get_value(&root, "a.b.c"), Some(Value::from("whole")));
        assert_eq!(get_value(&root, "[a.b].c"), Some(Value::from("partial")));
    }
}
