use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A structured task draft extracted from one natural-language message.
///
/// The draft is complete in itself: every field has a defensible value
/// even when the message carried no recognizable structure. Attaching an
/// owner and persisting the draft is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Short task title, never empty (falls back to the raw message).
    pub title: String,
    /// Secondary detail split off the title; empty when absent.
    #[serde(default)]
    pub description: String,
    /// Absolute due time in server-local time, RFC 3339 on the wire.
    #[serde(rename = "dueDate")]
    pub due_at: DateTime<Local>,
    /// Minutes before `due_at` to alert; 0 = alert exactly at due time.
    #[serde(rename = "reminderTime")]
    pub reminder_minutes: u32,
}

impl TaskDraft {
    /// Minimal draft used when nothing could be extracted: the raw
    /// message becomes the title and the task is due now.
    pub fn fallback(message: &str, now: DateTime<Local>, reminder_minutes: u32) -> Self {
        Self {
            title: message.to_string(),
            description: String::new(),
            due_at: now,
            reminder_minutes,
        }
    }
}
