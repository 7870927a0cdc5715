#![forbid(unsafe_code)]

//! Ordered replace-pair formatting.
//!
//! A template is formatted by walking an ordered sequence of
//! `(pattern, replacement)` pairs and replacing every occurrence of each
//! pattern in the accumulated result. Application is strictly sequential:
//! text introduced by an earlier replacement is visible to later pairs.
//!
//! There is no escaping and no placeholder syntax. Patterns are plain
//! substrings; `{name}`-style tokens are a convention of the surrounding
//! string tables, not of this function.
//!
//! # Invariants
//!
//! 1. An empty pair sequence returns the template unchanged.
//! 2. A pattern absent from the current result is a no-op for that pair.
//! 3. A pair whose pattern equals its replacement is a no-op.
//! 4. An empty pattern is a no-op (`str::replace` would otherwise splice
//!    the replacement at every character boundary).

/// Apply `pairs` to `template` in order, replacing all occurrences of each
/// pattern with its replacement.
///
/// # Examples
///
/// ```
/// use weft_i18n::format;
///
/// let out = format("{first} {last}", [("{first}", "Diane"), ("{last}", "Selden")]);
/// assert_eq!(out, "Diane Selden");
/// ```
///
/// Sequential application means a replacement can feed a later pair:
///
/// ```
/// use weft_i18n::format;
///
/// assert_eq!(format("a", [("a", "b"), ("b", "c")]), "c");
/// ```
#[must_use]
pub fn format<'a>(template: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut rendered = template.to_owned();
    for (pattern, replacement) in pairs {
        if pattern.is_empty() || pattern == replacement {
            continue;
        }
        if rendered.contains(pattern) {
            rendered = rendered.replace(pattern, replacement);
        }
    }
    rendered
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pairs_is_identity() {
        assert_eq!(format("hello {name}", []), "hello {name}");
    }

    #[test]
    fn empty_template_stays_empty() {
        assert_eq!(format("", [("a", "b")]), "");
    }

    #[test]
    fn replaces_all_occurrences() {
        assert_eq!(format("x.x.x", [("x", "y")]), "y.y.y");
    }

    #[test]
    fn absent_pattern_is_noop() {
        assert_eq!(format("hello", [("{name}", "world")]), "hello");
    }

    #[test]
    fn pattern_equal_to_replacement_is_noop() {
        assert_eq!(format("aaa", [("a", "a")]), "aaa");
    }

    #[test]
    fn empty_pattern_is_noop() {
        assert_eq!(format("abc", [("", "x")]), "abc");
    }

    #[test]
    fn sequential_application_chains() {
        assert_eq!(format("a", [("a", "b"), ("b", "c")]), "c");
    }

    #[test]
    fn later_pair_sees_earlier_output() {
        // The first pair introduces "{x}" which the second pair consumes.
        assert_eq!(format("start", [("start", "{x}!"), ("{x}", "done")]), "done!");
    }

    #[test]
    fn order_matters() {
        assert_eq!(format("ab", [("ab", "1"), ("1", "2")]), "2");
        assert_eq!(format("ab", [("1", "2"), ("ab", "1")]), "1");
    }

    #[test]
    fn name_template_end_to_end() {
        let out = format(
            "{first} {last}",
            [("{first}", "Diane"), ("{last}", "Selden")],
        );
        assert_eq!(out, "Diane Selden");
    }

    #[test]
    fn replacement_may_be_empty() {
        assert_eq!(format("a-b-c", [("-", "")]), "abc");
    }

    #[test]
    fn unicode_patterns() {
        assert_eq!(format("héllo wörld", [("ö", "o"), ("é", "e")]), "hello world");
    }
}
