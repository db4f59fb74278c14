//! Reminder-offset extraction
//!
//! Scans a message for phrases that specify reminder timing, e.g.
//! "remind me 30 minutes before" or "alert me in 2 hours", and strips
//! the matched phrase so later stages do not re-parse it.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// How a matched phrase relates the reminder to the due time.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ReminderKind {
    /// "N minutes before/ahead": advance notice before the due time.
    Advance,
    /// "in N minutes": the amount specifies the due time itself, so the
    /// reminder fires exactly at the due time.
    Direct,
}

/// Result of scanning a message for reminder phrasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderOffset {
    /// Minutes before the due time to alert; 0 for direct timing.
    pub minutes_before: u32,
    /// True when "in N minutes" named the due time rather than an
    /// advance-notice window.
    pub is_direct_timing: bool,
    /// The message with the matched phrase removed.
    pub remaining_text: String,
}

// Ordered table: advance-notice patterns first, then bare in/after
// patterns. Order is a behavioral invariant: the qualified patterns
// must win before a bare pattern can swallow their prefix.
static REMINDER_PATTERNS: Lazy<Vec<(Regex, ReminderKind)>> = Lazy::new(|| {
    let table: [(&str, ReminderKind); 7] = [
        (
            r"(?i)remind me (?:in |after )?(\d+)\s*(minute|min|hour|hr)s?\s+(?:before|ahead)",
            ReminderKind::Advance,
        ),
        (
            r"(?i)set (?:a )?reminder (?:for )?(\d+)\s*(minute|min|hour|hr)s?\s+(?:before|ahead)",
            ReminderKind::Advance,
        ),
        (
            r"(?i)alert me (\d+)\s*(minute|min|hour|hr)s?\s+(?:before|ahead)",
            ReminderKind::Advance,
        ),
        (r"(?i)remind me (?:in |after )?(\d+)\s*(minute|min|hour|hr)s?", ReminderKind::Direct),
        (
            r"(?i)set (?:a )?reminder (?:for |in )?(\d+)\s*(minute|min|hour|hr)s?",
            ReminderKind::Direct,
        ),
        (r"(?i)alert me (?:in |after )?(\d+)\s*(minute|min|hour|hr)s?", ReminderKind::Direct),
        (r"(?i)notification (?:in |after )?(\d+)\s*(minute|min|hour|hr)s?", ReminderKind::Direct),
    ];
    table
        .iter()
        .map(|(pattern, kind)| (Regex::new(pattern).expect("invalid reminder pattern"), *kind))
        .collect()
});

/// Extract the reminder offset from `text`, first match wins.
///
/// No match leaves `minutes_before` at `default_minutes` with the text
/// untouched.
pub fn extract_reminder_offset(text: &str, default_minutes: u32) -> ReminderOffset {
    for (pattern, kind) in REMINDER_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let matched = caps.get(0).map_or("", |m| m.as_str());
        debug!("Reminder pattern matched: '{}' ({:?})", matched, kind);

        let amount: u32 = caps.get(1).map_or("0", |m| m.as_str()).parse().unwrap_or(0);
        let unit = caps.get(2).map_or("", |m| m.as_str()).to_lowercase();
        let minutes = if unit.starts_with("hour") || unit.starts_with("hr") {
            amount.saturating_mul(60)
        } else {
            amount
        };

        let remaining = pattern.replace(text, "").trim().to_string();
        return match kind {
            ReminderKind::Advance => ReminderOffset {
                minutes_before: minutes,
                is_direct_timing: false,
                remaining_text: remaining,
            },
            ReminderKind::Direct => ReminderOffset {
                minutes_before: 0,
                is_direct_timing: true,
                remaining_text: remaining,
            },
        };
    }

    ReminderOffset {
        minutes_before: default_minutes,
        is_direct_timing: false,
        remaining_text: text.to_string(),
    }
}
