//! Name shaping for generated tests: middle truncation, control-character
//! escaping, the disable marker, and short type names.
//!
//! Everything here counts characters, never bytes, so multi-byte names are
//! safe to cut anywhere.

/// Ellipsis inserted by [`truncate_middle`].
pub const ELLIPSIS: char = '\u{2026}';

/// Leading marker that registers an entry in disabled state.
pub const DISABLE_MARKER: char = '!';

/// Shortens `s` to exactly `max` characters by cutting the middle out and
/// inserting one [`ELLIPSIS`]. Keeps the head and tail, which is where
/// generated names carry their signal.
///
/// Returns `s` unchanged when `max` is negative (no limit), below 3
/// (nothing sensible fits), or not below the current length. Applying the
/// same budget twice is a no-op.
pub fn truncate_middle(s: &str, max: i32) -> String {
    let len = s.chars().count();
    if max < 3 || max as usize >= len {
        return s.to_string();
    }
    let keep = max as usize - 1;
    let left = keep / 2;
    let right = keep - left;

    let mut out = String::with_capacity(s.len());
    out.extend(s.chars().take(left));
    out.push(ELLIPSIS);
    out.extend(s.chars().skip(len - right));
    out
}

/// Rewrites control characters into their escaped forms (`\n` becomes the
/// two characters `\` `n`) so derived names survive consoles and report
/// files intact. Total: any input yields a printable name.
pub fn escape_for_display(s: &str) -> String {
    if !s.chars().any(char::is_control) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

/// Splits a leading [`DISABLE_MARKER`] off a raw label. Returns the label
/// without the marker and whether it was present.
pub fn strip_disable_marker(label: &str) -> (&str, bool) {
    match label.strip_prefix(DISABLE_MARKER) {
        Some(rest) => (rest, true),
        None => (label, false),
    }
}

/// Short, human-oriented form of a type name: module paths are dropped at
/// every nesting level, so `alloc::vec::Vec<core::option::Option<u8>>`
/// comes out as `Vec<Option<u8>>`. Yields `<anonymous>` when nothing
/// printable remains.
pub fn short_type_name<T: ?Sized>() -> String {
    simplify_type_name(std::any::type_name::<T>())
}

pub(crate) fn simplify_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '&' | '(' | ')' | '[' | ']' | ';' => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
            _ => segment.push(c),
        }
    }
    out.push_str(&segment);
    if out.is_empty() {
        "<anonymous>".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_leaves_short_input_alone() {
        assert_eq!(truncate_middle("abc", 3), "abc");
        assert_eq!(truncate_middle("abc", 10), "abc");
        assert_eq!(truncate_middle("", 5), "");
    }

    #[test]
    fn test_truncate_ignores_unusable_budgets() {
        assert_eq!(truncate_middle("abcdefgh", -1), "abcdefgh");
        assert_eq!(truncate_middle("abcdefgh", 0), "abcdefgh");
        assert_eq!(truncate_middle("abcdefgh", 2), "abcdefgh");
    }

    #[test]
    fn test_truncate_hits_the_budget_exactly() {
        let s = "abcdefghijklmnop";
        for max in 3..16 {
            let t = truncate_middle(s, max);
            assert_eq!(t.chars().count(), max as usize, "budget {max}");
        }
    }

    #[test]
    fn test_truncate_keeps_head_and_tail() {
        assert_eq!(truncate_middle("abcdefghij", 5), "ab…ij");
        assert_eq!(truncate_middle("abcdefghij", 4), "a…ij");
        assert_eq!(truncate_middle("abcdefghij", 3), "a…j");
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let once = truncate_middle("a rather long generated test name", 12);
        assert_eq!(truncate_middle(&once, 12), once);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let s = "äöüäöüäöüä";
        let t = truncate_middle(s, 5);
        assert_eq!(t, "äö…üä");
        assert_eq!(t.chars().count(), 5);
    }

    #[test]
    fn test_escape_passes_plain_text_through() {
        assert_eq!(escape_for_display("plain name"), "plain name");
        assert_eq!(escape_for_display(""), "");
    }

    #[test]
    fn test_escape_rewrites_control_characters() {
        assert_eq!(escape_for_display("a\nb"), "a\\nb");
        assert_eq!(escape_for_display("a\tb\r"), "a\\tb\\r");
        assert_eq!(escape_for_display("\u{7}"), "\\u{7}");
    }

    #[test]
    fn test_strip_disable_marker() {
        assert_eq!(strip_disable_marker("!skip me"), ("skip me", true));
        assert_eq!(strip_disable_marker("keep me"), ("keep me", false));
        assert_eq!(strip_disable_marker("!"), ("", true));
        assert_eq!(strip_disable_marker("mid!dle"), ("mid!dle", false));
    }

    #[test]
    fn test_simplify_type_name() {
        assert_eq!(simplify_type_name("alloc::vec::Vec<u8>"), "Vec<u8>");
        assert_eq!(
            simplify_type_name("core::option::Option<alloc::string::String>"),
            "Option<String>"
        );
        assert_eq!(simplify_type_name("(i32, alloc::string::String)"), "(i32, String)");
        assert_eq!(simplify_type_name("[u8; 32]"), "[u8; 32]");
        assert_eq!(simplify_type_name("&str"), "&str");
        assert_eq!(simplify_type_name(""), "<anonymous>");
    }

    #[test]
    fn test_short_type_name_of_real_types() {
        assert_eq!(short_type_name::<i32>(), "i32");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec<u8>");
        assert_eq!(short_type_name::<Option<String>>(), "Option<String>");
    }
}
