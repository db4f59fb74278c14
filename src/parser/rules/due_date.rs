//! Due-date resolution from natural-language time expressions
//!
//! An ordered, immutable table of time patterns is tried against the
//! message; the first match wins and later patterns are never attempted.
//! Each pattern's handler returns a typed [`TimeExpr`] which a single
//! resolver turns into a concrete local timestamp. Any construction
//! failure (impossible date, out-of-range hour, DST gap) degrades to
//! "now"; the resolver never surfaces an error.

use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, TimeZone, Weekday};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A clock reading as written, before 12/24-hour normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Clock {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Meridiem {
    Am,
    Pm,
}

/// Day reference used by combined day+time expressions.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DayRef {
    Today,
    Tomorrow,
    Weekday(Weekday),
}

/// Bare keywords with fixed default hours.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DayKeyword {
    Today,
    Tomorrow,
    Tonight,
    ThisMorning,
    ThisAfternoon,
    ThisEvening,
}

/// Typed result of one pattern match. Handlers return these directly;
/// the matched substring is never re-inspected.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimeExpr {
    /// "at 3:30 PM tomorrow", "tomorrow at 7 AM"
    DayWithClock { day: DayRef, clock: Clock },
    /// "on Monday", "next Tuesday at 3 PM"
    WeekdayAt { weekday: Weekday, clock: Option<Clock> },
    /// "in 2 hours", "after 30 minutes"
    RelativeOffset { amount: i64, unit: OffsetUnit },
    /// "at 3:30 PM" with no day, assumed today, rolls forward if past
    ClockTime { clock: Clock },
    /// "12/25", "3/15/2024", "January 15th"
    CalendarDate { month: u32, day: u32, year: Option<i32>, clock: Option<Clock> },
    /// "tonight", "this afternoon", ...
    Keyword(DayKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OffsetUnit {
    Minutes,
    Hours,
    Days,
}

/// Outcome of scanning a message for a due-time expression.
#[derive(Debug, Clone, PartialEq)]
pub struct DueDateResolution {
    pub due_at: DateTime<Local>,
    /// The matched time phrase, empty when no pattern matched.
    pub matched_phrase: String,
}

type Handler = fn(&Captures) -> Option<TimeExpr>;

// Priority-ordered pattern table. Order is a behavioral invariant:
// combined day+time expressions must win before their fragments can
// match as bare clock times or keywords.
static TIME_PATTERNS: Lazy<Vec<(Regex, Handler)>> = Lazy::new(|| {
    let table: [(&str, Handler); 10] = [
        // "at 3:30 PM tomorrow", "by 2:00 PM on Monday"
        (
            r"(?i)(?:at|on|by|due)\s+(\d{1,2}):(\d{2})\s*(am|pm)?\s*(?:on\s+)?\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday|today|tomorrow)\b",
            clock_then_day,
        ),
        // "tomorrow at 3:30 pm", "today at 2 pm"
        (r"(?i)\b(tomorrow|today)\b\s+(?:at\s+)?(\d{1,2}):(\d{2})\s*(am|pm)", day_then_clock),
        (r"(?i)\b(tomorrow|today)\b\s+(?:at\s+)?(\d{1,2})\s*(am|pm)\b", day_then_hour),
        // "on Monday", "next Tuesday at 3 PM"
        (
            r"(?i)(?:on\s+|next\s+)?\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b\s*(?:at\s+(\d{1,2}):?(\d{2})?\s*(am|pm)?)?",
            weekday_at,
        ),
        // "in 2 hours", "after 30 minutes", "in 3 days"
        (r"(?i)\b(?:in|after)\s+(\d+)\s*(minute|min|hour|hr|day)s?", relative_offset),
        // "at 3:30 PM", "by 2 PM" (assumed today)
        (r"(?i)\b(?:at|by)\s+(\d{1,2}):(\d{2})\s*(am|pm)\b", clock_time),
        (r"(?i)\b(?:at|by)\s+(\d{1,2})\s*(am|pm)\b", hour_time),
        // "on 12/25", "by 3/15/2024 at 2 PM"
        (
            r"(?i)\b(?:on|by|due)\s+(\d{1,2})[/-](\d{1,2})(?:[/-](\d{2,4}))?(?:\s*at\s+(\d{1,2}):?(\d{2})?\s*(am|pm)?)?",
            numeric_date,
        ),
        // "on January 15th at 2 PM"
        (
            r"(?i)\b(?:on|by|due)\s+(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?(?:\s*at\s+(\d{1,2}):?(\d{2})?\s*(am|pm)?)?",
            month_name_date,
        ),
        // Bare keywords with fixed default hours
        (
            r"(?i)\b(today|tomorrow|tonight|this morning|this afternoon|this evening)\b",
            keyword,
        ),
    ];
    table
        .iter()
        .map(|(pattern, handler)| {
            (Regex::new(pattern).expect("invalid time pattern"), *handler)
        })
        .collect()
});

/// Resolve the due time expressed in `text` relative to `now`.
///
/// No match, or a match whose date cannot be constructed, resolves to
/// `now` with the matched phrase (if any) still reported so callers can
/// strip it from their working text.
pub fn resolve_due_date(text: &str, now: DateTime<Local>) -> DueDateResolution {
    for (pattern, handler) in TIME_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let matched_phrase = caps.get(0).map_or("", |m| m.as_str()).to_string();
        debug!("Time pattern matched: '{}'", matched_phrase);

        let due_at = match handler(&caps).and_then(|expr| resolve(expr, now)) {
            Some(due) => due,
            None => {
                debug!("Could not construct a date from '{}', using now", matched_phrase);
                now
            }
        };
        return DueDateResolution { due_at, matched_phrase };
    }

    debug!("No time pattern matched in '{}'", text);
    DueDateResolution { due_at: now, matched_phrase: String::new() }
}

fn resolve(expr: TimeExpr, now: DateTime<Local>) -> Option<DateTime<Local>> {
    match expr {
        TimeExpr::DayWithClock { day, clock } => {
            let date = match day {
                DayRef::Today => now.date_naive(),
                DayRef::Tomorrow => now.date_naive().checked_add_days(Days::new(1))?,
                DayRef::Weekday(weekday) => next_weekday(now, weekday),
            };
            let (hour, minute) = to_24_hour(clock);
            local_at(date, hour, minute)
        }
        TimeExpr::WeekdayAt { weekday, clock } => {
            let date = next_weekday(now, weekday);
            let (hour, minute) = clock.map_or((9, 0), to_24_hour);
            local_at(date, hour, minute)
        }
        TimeExpr::RelativeOffset { amount, unit } => {
            // try_* so absurd amounts degrade instead of overflowing
            let delta = match unit {
                OffsetUnit::Minutes => Duration::try_minutes(amount),
                OffsetUnit::Hours => Duration::try_hours(amount),
                OffsetUnit::Days => Duration::try_days(amount),
            }?;
            now.checked_add_signed(delta)
        }
        TimeExpr::ClockTime { clock } => {
            let (hour, minute) = to_24_hour(clock);
            let due = local_at(now.date_naive(), hour, minute)?;
            if due <= now {
                // That time already passed today, roll to tomorrow
                local_at(now.date_naive().checked_add_days(Days::new(1))?, hour, minute)
            } else {
                Some(due)
            }
        }
        TimeExpr::CalendarDate { month, day, year, clock } => {
            let year = year.unwrap_or_else(|| now.year());
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            let (hour, minute) = clock.map_or((9, 0), to_24_hour);
            local_at(date, hour, minute)
        }
        TimeExpr::Keyword(keyword) => match keyword {
            DayKeyword::Today => Some(now),
            DayKeyword::Tomorrow => {
                local_at(now.date_naive().checked_add_days(Days::new(1))?, 9, 0)
            }
            DayKeyword::Tonight => local_at(now.date_naive(), 20, 0),
            DayKeyword::ThisMorning => local_at(now.date_naive(), 9, 0),
            DayKeyword::ThisAfternoon => local_at(now.date_naive(), 14, 0),
            DayKeyword::ThisEvening => local_at(now.date_naive(), 18, 0),
        },
    }
}

/// Convert a 12-hour clock reading to 24-hour. Readings without a
/// meridiem pass through unchanged.
fn to_24_hour(clock: Clock) -> (u32, u32) {
    let hour = match (clock.hour, clock.meridiem) {
        (12, Some(Meridiem::Am)) => 0,
        (h, Some(Meridiem::Am)) => h,
        (12, Some(Meridiem::Pm)) => 12,
        (h, Some(Meridiem::Pm)) => h + 12,
        (h, None) => h,
    };
    (hour, clock.minute)
}

/// Next occurrence of `weekday` strictly after today: a distance of
/// zero or less shifts a full week forward, so the result is never a
/// day already passed this week.
fn next_weekday(now: DateTime<Local>, weekday: Weekday) -> NaiveDate {
    let today = now.weekday().num_days_from_sunday() as i64;
    let target = weekday.num_days_from_sunday() as i64;
    let mut days_until = target - today;
    if days_until <= 0 {
        days_until += 7;
    }
    now.date_naive() + Duration::days(days_until)
}

fn local_at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    Local.from_local_datetime(&naive).single()
}

fn parse_meridiem(s: &str) -> Option<Meridiem> {
    match s.to_lowercase().as_str() {
        "am" => Some(Meridiem::Am),
        "pm" => Some(Meridiem::Pm),
        _ => None,
    }
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(s: &str) -> Option<u32> {
    let month = match s.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn group_u32(caps: &Captures, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Clock from (hour, optional minute, optional meridiem) capture groups.
fn group_clock(caps: &Captures, hour_idx: usize) -> Option<Clock> {
    let hour = group_u32(caps, hour_idx)?;
    let minute = group_u32(caps, hour_idx + 1).unwrap_or(0);
    let meridiem = caps.get(hour_idx + 2).and_then(|m| parse_meridiem(m.as_str()));
    Some(Clock { hour, minute, meridiem })
}

fn day_ref(s: &str) -> Option<DayRef> {
    match s.to_lowercase().as_str() {
        "today" => Some(DayRef::Today),
        "tomorrow" => Some(DayRef::Tomorrow),
        other => parse_weekday(other).map(DayRef::Weekday),
    }
}

fn clock_then_day(caps: &Captures) -> Option<TimeExpr> {
    let clock = group_clock(caps, 1)?;
    let day = day_ref(caps.get(4)?.as_str())?;
    Some(TimeExpr::DayWithClock { day, clock })
}

fn day_then_clock(caps: &Captures) -> Option<TimeExpr> {
    let day = day_ref(caps.get(1)?.as_str())?;
    let clock = group_clock(caps, 2)?;
    Some(TimeExpr::DayWithClock { day, clock })
}

fn day_then_hour(caps: &Captures) -> Option<TimeExpr> {
    let day = day_ref(caps.get(1)?.as_str())?;
    let hour = group_u32(caps, 2)?;
    let meridiem = caps.get(3).and_then(|m| parse_meridiem(m.as_str()));
    Some(TimeExpr::DayWithClock { day, clock: Clock { hour, minute: 0, meridiem } })
}

fn weekday_at(caps: &Captures) -> Option<TimeExpr> {
    let weekday = parse_weekday(caps.get(1)?.as_str())?;
    let clock = group_clock(caps, 2);
    Some(TimeExpr::WeekdayAt { weekday, clock })
}

fn relative_offset(caps: &Captures) -> Option<TimeExpr> {
    let amount: i64 = caps.get(1)?.as_str().parse().ok()?;
    let unit_str = caps.get(2)?.as_str().to_lowercase();
    let unit = if unit_str.starts_with("hour") || unit_str.starts_with("hr") {
        OffsetUnit::Hours
    } else if unit_str.starts_with("day") {
        OffsetUnit::Days
    } else {
        OffsetUnit::Minutes
    };
    Some(TimeExpr::RelativeOffset { amount, unit })
}

fn clock_time(caps: &Captures) -> Option<TimeExpr> {
    Some(TimeExpr::ClockTime { clock: group_clock(caps, 1)? })
}

fn hour_time(caps: &Captures) -> Option<TimeExpr> {
    let hour = group_u32(caps, 1)?;
    let meridiem = caps.get(2).and_then(|m| parse_meridiem(m.as_str()));
    Some(TimeExpr::ClockTime { clock: Clock { hour, minute: 0, meridiem } })
}

fn numeric_date(caps: &Captures) -> Option<TimeExpr> {
    let month = group_u32(caps, 1)?;
    let day = group_u32(caps, 2)?;
    let year = caps.get(3).and_then(|m| {
        let raw: i32 = m.as_str().parse().ok()?;
        // Two-digit years are this century
        Some(if m.as_str().len() == 2 { 2000 + raw } else { raw })
    });
    let clock = group_clock(caps, 4);
    Some(TimeExpr::CalendarDate { month, day, year, clock })
}

fn month_name_date(caps: &Captures) -> Option<TimeExpr> {
    let month = parse_month(caps.get(1)?.as_str())?;
    let day = group_u32(caps, 2)?;
    let clock = group_clock(caps, 3);
    Some(TimeExpr::CalendarDate { month, day, year: None, clock })
}

fn keyword(caps: &Captures) -> Option<TimeExpr> {
    let keyword = match caps.get(1)?.as_str().to_lowercase().as_str() {
        "today" => DayKeyword::Today,
        "tomorrow" => DayKeyword::Tomorrow,
        "tonight" => DayKeyword::Tonight,
        "this morning" => DayKeyword::ThisMorning,
        "this afternoon" => DayKeyword::ThisAfternoon,
        "this evening" => DayKeyword::ThisEvening,
        _ => return None,
    };
    Some(TimeExpr::Keyword(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use pretty_assertions::assert_eq;

    fn fixed_now() -> DateTime<Local> {
        // Wednesday 2024-03-13, 10:30 local
        Local.with_ymd_and_hms(2024, 3, 13, 10, 30, 0).single().unwrap()
    }

    #[test]
    fn test_convert_to_24_hour() {
        let cases = [
            (12, Some(Meridiem::Pm), 12),
            (12, Some(Meridiem::Am), 0),
            (3, Some(Meridiem::Pm), 15),
            (3, Some(Meridiem::Am), 3),
            (11, Some(Meridiem::Pm), 23),
            (7, None, 7),
        ];
        for (hour, meridiem, expected) in cases {
            let (hour_24, _) = to_24_hour(Clock { hour, minute: 0, meridiem });
            assert_eq!(hour_24, expected, "failed for {}:{:?}", hour, meridiem);
        }
    }

    #[test]
    fn test_next_weekday_is_always_future() {
        let now = fixed_now();
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            let date = next_weekday(now, weekday);
            assert!(date > now.date_naive(), "{:?} resolved to a past day", weekday);
            assert_eq!(date.weekday(), weekday);
        }
    }

    #[test]
    fn test_same_weekday_rolls_a_full_week() {
        // fixed_now is a Wednesday
        let date = next_weekday(fixed_now(), Weekday::Wed);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    }

    #[test]
    fn test_combined_time_and_weekday() {
        let resolution = resolve_due_date("submit report at 2:30 PM on Friday", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).single().unwrap()
        );
        assert_eq!(resolution.matched_phrase, "at 2:30 PM on Friday");
    }

    #[test]
    fn test_tomorrow_with_time() {
        let resolution = resolve_due_date("take out trash tomorrow at 7 AM", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 14, 7, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_weekday_without_time_defaults_to_nine() {
        let resolution = resolve_due_date("meeting on Monday", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 18, 9, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_weekday_with_time() {
        let resolution = resolve_due_date("meeting on Friday at 10 AM", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_relative_offset_minutes() {
        let now = fixed_now();
        let resolution = resolve_due_date("check the oven in 45 minutes", now);
        assert_eq!(resolution.due_at, now + Duration::minutes(45));
    }

    #[test]
    fn test_relative_offset_days() {
        let now = fixed_now();
        let resolution = resolve_due_date("renew passport in 3 days", now);
        assert_eq!(resolution.due_at, now + Duration::days(3));
    }

    #[test]
    fn test_bare_clock_time_future_today() {
        let resolution = resolve_due_date("call mom at 3 PM", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 13, 15, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_bare_clock_time_already_past_rolls_to_tomorrow() {
        let resolution = resolve_due_date("call mom at 9 AM", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_numeric_date_with_defaults() {
        let resolution = resolve_due_date("taxes due on 12/25", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 12, 25, 9, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_numeric_date_with_year_and_time() {
        // 24-hour times reach the date pattern; "at 5 PM" would have
        // matched the bare clock pattern (higher priority) instead.
        let resolution = resolve_due_date("pay rent by 4/1/2025 at 17:00", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2025, 4, 1, 17, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_month_name_date() {
        let resolution = resolve_due_date("party on January 15th", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_bare_clock_outranks_trailing_date() {
        // Priority order is significant: "at 5 PM" (bare clock, rank 5)
        // wins over the calendar date (rank 6), matching source behavior.
        let now = fixed_now();
        let resolution = resolve_due_date("pay rent by 4/1/2025 at 5 PM", now);
        assert_eq!(resolution.matched_phrase, "at 5 PM");
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 13, 17, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_tonight_keyword() {
        let resolution = resolve_due_date("buy groceries tonight", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 13, 20, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn test_this_afternoon_keyword() {
        let resolution = resolve_due_date("walk the dog this afternoon", fixed_now());
        assert_eq!(resolution.due_at.hour(), 14);
        assert_eq!(resolution.due_at.date_naive(), fixed_now().date_naive());
    }

    #[test]
    fn test_bare_today_keeps_current_time() {
        let now = fixed_now();
        let resolution = resolve_due_date("finish the report today", now);
        assert_eq!(resolution.due_at, now);
        assert_eq!(resolution.matched_phrase, "today");
    }

    #[test]
    fn test_no_match_resolves_to_now() {
        let now = fixed_now();
        let resolution = resolve_due_date("buy groceries", now);
        assert_eq!(resolution.due_at, now);
        assert_eq!(resolution.matched_phrase, "");
    }

    #[test]
    fn test_impossible_date_degrades_to_now() {
        let now = fixed_now();
        let resolution = resolve_due_date("pay bills on 2/30", now);
        assert_eq!(resolution.due_at, now);
        // The phrase still reports so callers can strip it
        assert_eq!(resolution.matched_phrase, "on 2/30");
    }

    #[test]
    fn test_first_match_wins_over_keyword() {
        // "tomorrow" alone would hit the keyword pattern (09:00); the
        // combined pattern must win and honor the explicit time.
        let resolution = resolve_due_date("dentist at 4:15 PM tomorrow", fixed_now());
        assert_eq!(
            resolution.due_at,
            Local.with_ymd_and_hms(2024, 3, 14, 16, 15, 0).single().unwrap()
        );
    }

    #[test]
    fn test_result_is_deterministic_for_fixed_now() {
        let now = fixed_now();
        let first = resolve_due_date("lunch tomorrow at 12 pm", now);
        let second = resolve_due_date("lunch tomorrow at 12 pm", now);
        assert_eq!(first, second);
        assert_eq!(first.due_at.hour(), 12);
    }
}
