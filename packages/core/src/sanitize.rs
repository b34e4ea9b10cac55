//! Rewrites for names and values that would let a view inject script into the display tree.

use crate::facts::Str;
use std::borrow::Cow;

const PREFIX: &str = "data-";

/// `script` elements are rendered as `p`.
pub fn tag(tag: Str) -> Str {
    if tag == "script" {
        Cow::Borrowed("p")
    } else {
        tag
    }
}

/// Inline handlers (`onclick`, ...) and `formAction` are neutralized with a `data-` prefix.
pub fn attribute_name(name: Str) -> Str {
    let is_handler = name
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"));
    if is_handler || name == "formAction" {
        prefixed(&name)
    } else {
        name
    }
}

/// Properties that parse markup or carry a script url are neutralized with a `data-` prefix.
pub fn property_name(name: Str) -> Str {
    match name.as_ref() {
        "innerHTML" | "outerHTML" | "formAction" => prefixed(&name),
        _ => name,
    }
}

/// `javascript:` and `data:text/html` urls become the empty string.
///
/// Whitespace is ignored and the match is case-insensitive, so ` Java\tScript:` is caught as well.
pub fn attribute_value(value: Str) -> Str {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(PROBE)
        .collect();
    if starts_with_ignore_case(&compact, "javascript:")
        || starts_with_ignore_case(&compact, "data:text/html")
    {
        Cow::Borrowed("")
    } else {
        value
    }
}

// long enough for the longest pattern
const PROBE: usize = 16;

fn starts_with_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .get(..needle.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(needle))
}

fn prefixed(name: &str) -> Str {
    Cow::Owned(format!("{PREFIX}{name}"))
}
