//! Rule-based task parsing pipeline
//!
//! Deterministic, synchronous, and pure: the only implicit input is
//! "now", sampled once by the caller and threaded through so a parse is
//! internally consistent. Stages run in a fixed order (reminder offset,
//! due date, title split), each removing its matched phrase from a
//! working copy of the text so later stages never re-parse it.

pub mod due_date;
pub mod reminder;
pub mod title;

use chrono::{DateTime, Local};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::draft::TaskDraft;
pub use due_date::{resolve_due_date, DueDateResolution};
pub use reminder::{extract_reminder_offset, ReminderOffset};
pub use title::split_title_and_description;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("invalid pattern"));

/// Parse one natural-language message into a [`TaskDraft`].
///
/// Never fails: unrecognized input yields a draft with the raw message
/// as title, due now, with the default reminder offset.
pub fn parse_task_from_text(
    text: &str,
    now: DateTime<Local>,
    default_reminder_minutes: u32,
) -> TaskDraft {
    let original = text.trim();
    if original.is_empty() {
        return TaskDraft::fallback(text, now, default_reminder_minutes);
    }
    debug!("Parsing message: '{}'", original);

    let reminder = extract_reminder_offset(original, default_reminder_minutes);

    // The due-date resolver sees the full original text: direct-timing
    // phrases like "remind me in 1 hour" double as due-time expressions.
    let due = resolve_due_date(original, now);

    let mut working = reminder.remaining_text;
    if !due.matched_phrase.is_empty() {
        if let Some(start) = working.find(&due.matched_phrase) {
            working.replace_range(start..start + due.matched_phrase.len(), "");
        }
    }
    let working = tidy(&working);

    // The untrimmed input is the last-resort title when stripping
    // consumes everything; the splitter capitalizes it as-is.
    let (title, description) = split_title_and_description(&working, text);

    // Direct timing means the due time and the reminder coincide.
    let reminder_minutes = if reminder.is_direct_timing { 0 } else { reminder.minutes_before };

    let draft = TaskDraft { title, description, due_at: due.due_at, reminder_minutes };
    debug!("Parsed draft: {:?}", draft);
    draft
}

/// Collapse the gaps left behind by phrase removal.
fn tidy(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().trim_matches(',').trim().to_string()
}
