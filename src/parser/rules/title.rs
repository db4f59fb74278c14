//! Title/description splitting
//!
//! Strips imperative lead-ins ("remind me to ...", "task: ...") and
//! splits what remains into a short title and optional description.

use once_cell::sync::Lazy;
use regex::Regex;

// Applied in sequence, each anchored at the start of the text.
static LEAD_IN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(?:remind me to|remind me|set a reminder to|set reminder to|alert me to|notify me to|i need to|i should|please remind me to|can you remind me to)\s*",
        r"(?i)^(?:task|todo|to do):\s*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid lead-in pattern"))
    .collect()
});

// Ordered: the first separator present in the text wins.
const SEPARATORS: [&str; 5] = [" - ", " | ", ": ", " about ", " regarding "];

const LONG_TEXT_CHARS: usize = 50;
const LONG_TEXT_WORDS: usize = 8;
const TITLE_WORDS: usize = 5;

/// Split `remaining` (the message with time phrases already removed)
/// into a title and description. If stripping consumes everything, the
/// original message becomes the title so intent is never lost.
pub fn split_title_and_description(remaining: &str, original: &str) -> (String, String) {
    let mut cleaned = remaining.trim().to_string();
    for pattern in LEAD_IN_PATTERNS.iter() {
        cleaned = pattern.replace(&cleaned, "").trim().to_string();
    }

    if cleaned.is_empty() {
        return (capitalize(original), String::new());
    }

    for separator in SEPARATORS {
        if let Some((title, description)) = cleaned.split_once(separator) {
            return (capitalize(title.trim()), capitalize(description.trim()));
        }
    }

    if cleaned.len() > LONG_TEXT_CHARS {
        let words: Vec<&str> = cleaned.split_whitespace().collect();
        if words.len() > LONG_TEXT_WORDS {
            let title = words[..TITLE_WORDS].join(" ");
            let description = words[TITLE_WORDS..].join(" ");
            return (capitalize(&title), capitalize(&description));
        }
    }

    (capitalize(&cleaned), String::new())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
