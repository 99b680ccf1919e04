//! Identifier case conversion and the event-name rule.
//!
//! Word splitting runs two regex passes: a boundary between a lowercase
//! letter or digit and an uppercase letter, then a boundary between an
//! uppercase letter and an uppercase-lowercase pair. The result is
//! lowercased.
//!
//! | input         | `to_snake`      | `to_pascal`    |
//! |---------------|-----------------|----------------|
//! | `getHTML`     | `get_html`      | `GetHtml`      |
//! | `innerHTML`   | `inner_html`    | `InnerHtml`    |
//! | `HTMLElement` | `html_element`  | `HtmlElement`  |

use once_cell::sync::Lazy;
use regex::Regex;

static LOWER_THEN_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("word boundary pattern is valid"));

static UPPER_THEN_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z])([A-Z][a-z])").expect("acronym boundary pattern is valid"));

static EVENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:on)[A-Za-z0-9_]").expect("event name pattern is valid"));

/// Word-split lowercase form: `innerHTML` -> `inner_html`.
pub fn to_snake(name: &str) -> String {
    let split = LOWER_THEN_UPPER.replace_all(name, "${1}_${2}");
    let split = UPPER_THEN_WORD.replace_all(&split, "${1}_${2}");
    split.to_lowercase()
}

/// Word-split form with each word capitalized: `HTMLElement` -> `HtmlElement`.
pub fn to_pascal(name: &str) -> String {
    to_snake(name)
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// True for names starting with "on" (any casing) followed by a word character.
pub fn is_event_name(name: &str) -> bool {
    EVENT_NAME.is_match(name)
}

/// DOM event name for an event member: `onclick` -> `click`.
///
/// Names that are not event names are returned unchanged.
pub fn event_name(member: &str) -> &str {
    if is_event_name(member) {
        &member[2..]
    } else {
        member
    }
}
