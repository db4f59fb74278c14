//! Labeled-field extraction from generated text
//!
//! The model is asked for `task:` / `description:` / `due:` /
//! `reminder:` lines. Each field found non-empty replaces the
//! rule-based value; everything missing or unparsable keeps the
//! rule-based value for that same message.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::draft::TaskDraft;

// `[ \t]*` after the colon, not `\s*`: in multi-line mode `\s` crosses
// the newline, so a blank value would capture the following line.
static TASK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*task:[ \t]*(.+)$").expect("invalid pattern"));
static DESCRIPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*description:[ \t]*(.+)$").expect("invalid pattern"));
static DUE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*due:[ \t]*(.+)$").expect("invalid pattern"));
static REMINDER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*reminder:[ \t]*(\d+)").expect("invalid pattern"));

static DAY_WORD_DUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(today|tomorrow)(?:\s+(?:at\s+)?(\d{1,2}):(\d{2}))?$")
        .expect("invalid pattern")
});

/// Merge labeled fields out of `generated` into the rule-based draft.
/// Fields the model omitted (or produced garbage for) stay as the
/// rule-based pipeline computed them.
pub fn merge_generated_fields(
    generated: &str,
    fallback: &TaskDraft,
    now: DateTime<Local>,
) -> TaskDraft {
    let mut draft = fallback.clone();

    if let Some(title) = field(&TASK_LINE, generated) {
        draft.title = title;
    }
    if let Some(description) = field(&DESCRIPTION_LINE, generated) {
        draft.description = description;
    }
    if let Some(due_text) = field(&DUE_LINE, generated) {
        match parse_due_value(&due_text, now) {
            Some(due_at) => draft.due_at = due_at,
            None => debug!("Unparsable due value '{}', keeping rule-based time", due_text),
        }
    }
    if let Some(caps) = REMINDER_LINE.captures(generated) {
        if let Ok(minutes) = caps[1].parse::<u32>() {
            draft.reminder_minutes = minutes;
        }
    }

    draft
}

fn field(pattern: &Regex, generated: &str) -> Option<String> {
    let value = pattern.captures(generated)?.get(1)?.as_str().trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Mini-resolver for the model's `due:` values: today/tomorrow with an
/// optional clock, RFC 3339, or a couple of plain date formats.
fn parse_due_value(value: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let value = value.trim();

    if let Some(caps) = DAY_WORD_DUE.captures(value) {
        let date = if caps[1].to_lowercase() == "tomorrow" {
            now.date_naive().checked_add_days(Days::new(1))?
        } else {
            now.date_naive()
        };
        let time = match (caps.get(2), caps.get(3)) {
            (Some(hour), Some(minute)) => NaiveTime::from_hms_opt(
                hour.as_str().parse().ok()?,
                minute.as_str().parse().ok()?,
                0,
            )?,
            _ => NaiveTime::from_hms_opt(9, 0, 0)?,
        };
        return Local.from_local_datetime(&date.and_time(time)).single();
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Local));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        return Local.from_local_datetime(&parsed).single();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Local.from_local_datetime(&parsed.and_time(NaiveTime::from_hms_opt(9, 0, 0)?))
            .single();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 13, 10, 30, 0).single().unwrap()
    }

    fn rule_based() -> TaskDraft {
        TaskDraft {
            title: "Rule title".to_string(),
            description: "Rule description".to_string(),
            due_at: fixed_now(),
            reminder_minutes: 10,
        }
    }

    #[test]
    fn test_all_fields_present() {
        let generated = "task: Call the dentist\ndescription: Ask about Friday\ndue: 2024-03-15 14:00\nreminder: 30";
        let draft = merge_generated_fields(generated, &rule_based(), fixed_now());
        assert_eq!(draft.title, "Call the dentist");
        assert_eq!(draft.description, "Ask about Friday");
        assert_eq!(draft.due_at, Local.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).single().unwrap());
        assert_eq!(draft.reminder_minutes, 30);
    }

    #[test]
    fn test_missing_fields_keep_rule_based_values() {
        let draft = merge_generated_fields("task: Water plants", &rule_based(), fixed_now());
        assert_eq!(draft.title, "Water plants");
        assert_eq!(draft.description, "Rule description");
        assert_eq!(draft.due_at, fixed_now());
        assert_eq!(draft.reminder_minutes, 10);
    }

    #[test]
    fn test_unparsable_due_keeps_rule_based_time() {
        let generated = "task: Thing\ndue: whenever you feel like it";
        let draft = merge_generated_fields(generated, &rule_based(), fixed_now());
        assert_eq!(draft.due_at, fixed_now());
    }

    #[test]
    fn test_day_word_due_values() {
        let draft =
            merge_generated_fields("due: tomorrow 15:00", &rule_based(), fixed_now());
        assert_eq!(draft.due_at, Local.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).single().unwrap());

        let draft = merge_generated_fields("due: today", &rule_based(), fixed_now());
        assert_eq!(draft.due_at, Local.with_ymd_and_hms(2024, 3, 13, 9, 0, 0).single().unwrap());
    }

    #[test]
    fn test_blank_field_values_are_ignored() {
        let generated = "task:   \ndescription:\nreminder: soon";
        let draft = merge_generated_fields(generated, &rule_based(), fixed_now());
        assert_eq!(draft.title, "Rule title");
        assert_eq!(draft.description, "Rule description");
        assert_eq!(draft.reminder_minutes, 10);
    }

    #[test]
    fn test_blank_value_never_captures_the_next_line() {
        // A blank "task:" must not swallow the line below it.
        let generated = "task:\ndescription: Water the ferns\nreminder:\n45";
        let draft = merge_generated_fields(generated, &rule_based(), fixed_now());
        assert_eq!(draft.title, "Rule title");
        assert_eq!(draft.description, "Water the ferns");
        assert_eq!(draft.reminder_minutes, 10);
    }
}
