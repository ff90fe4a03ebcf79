//! # Annotation Module
//!
//! Element-type grammar for collection parameters.
//!
//! Collections described by documentation rather than by a Rust generic carry
//! an annotation naming the element type. Three patterns are recognised, tried
//! in this order, first match wins:
//!
//! 1. `array<ElementType>`
//! 2. `array<KeyType, ElementType>` where the key is `int`, `string` or `int|string`
//! 3. `ElementType[]`
//!
//! Element type names may be namespace-qualified (`\App\Dto\LineItem`); lookup
//! uses the short name (see [`short_name`]).

use once_cell::sync::Lazy;
use regex::Regex;

static ARRAY_GENERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"array<\s*([A-Za-z_\\][\w\\]*)\s*>").expect("array<T> regex should be valid")
});

static ARRAY_KEYED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"array<\s*(?:int|string)(?:\s*\|\s*(?:int|string))?\s*,\s*([A-Za-z_\\][\w\\]*)\s*>")
        .expect("array<K, T> regex should be valid")
});

static ARRAY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_\\][\w\\]*)\[\]").expect("T[] regex should be valid")
});

/// Extract the element type named by an annotation string.
///
/// ```rust
/// use brrtdto::annotation::element_type;
///
/// assert_eq!(element_type("array<LineItem>"), Some("LineItem"));
/// assert_eq!(element_type("array<int, LineItem>"), Some("LineItem"));
/// assert_eq!(element_type("LineItem[]"), Some("LineItem"));
/// assert_eq!(element_type("array"), None);
/// ```
#[must_use]
pub fn element_type(doc: &str) -> Option<&str> {
    [&*ARRAY_GENERIC, &*ARRAY_KEYED, &*ARRAY_SUFFIX]
        .into_iter()
        .find_map(|pattern| pattern.captures(doc))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract the element type of `parameter` from a type-level doc block.
///
/// Only lines mentioning `$parameter` are considered, e.g.
/// `@param array<LineItem> $items`.
#[must_use]
pub fn element_type_for<'a>(doc: &'a str, parameter: &str) -> Option<&'a str> {
    doc.lines()
        .filter(|line| mentions_parameter(line, parameter))
        .find_map(element_type)
}

fn mentions_parameter(line: &str, parameter: &str) -> bool {
    let needle = format!("${parameter}");
    line.match_indices(&needle).any(|(start, _)| {
        line[start + needle.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
    })
}

/// Last segment of a namespace-qualified name.
#[must_use]
pub fn short_name(name: &str) -> &str {
    name.rsplit(['\\', ':'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(name)
}
