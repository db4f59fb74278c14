//! Hugging Face inference API client
//!
//! One bounded request per parse, no retries. The bearer token comes
//! from the `HUGGINGFACE_API_TOKEN` environment variable; when it is
//! absent the caller falls back to the rule-based parser.

use chrono::{DateTime, Local};
use log::debug;
use lru::LruCache;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

pub const TOKEN_ENV_VAR: &str = "HUGGINGFACE_API_TOKEN";
const API_BASE: &str = "https://api-inference.huggingface.co/models";

static RESPONSE_CACHE: Lazy<Mutex<LruCache<String, String>>> =
    Lazy::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(100).unwrap())));

/// Failure classes for the enrichment call. Every one of them resolves
/// to the rule-based result at the call site; the variant only shapes
/// the warning log.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("HUGGINGFACE_API_TOKEN environment variable not set")]
    MissingToken,
    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("inference API returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed inference response: {0}")]
    MalformedResponse(String),
    #[error("model returned empty generated text")]
    EmptyGeneration,
}

/// Ask the hosted model to restate `input` as labeled task fields.
///
/// Returns the raw generated text; extracting the fields and merging
/// them with the rule-based result is the caller's job.
pub async fn generate_task_fields(
    input: &str,
    model: &str,
    timeout: Duration,
    now: DateTime<Local>,
) -> Result<String, EnrichError> {
    let token = env::var(TOKEN_ENV_VAR).map_err(|_| EnrichError::MissingToken)?;

    if let Some(cached) = RESPONSE_CACHE.lock().unwrap().get(input) {
        debug!("Enrichment cache hit for input");
        return Ok(cached.clone());
    }

    let prompt = build_prompt(input, now);
    debug!("Requesting task fields from model '{}'", model);

    let client = Client::builder().timeout(timeout).build()?;
    let response = client
        .post(format!("{}/{}", API_BASE, model))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": 120,
                "temperature": 0.3,
                "return_full_text": false
            }
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(EnrichError::Status(response.status()));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| EnrichError::MalformedResponse(e.to_string()))?;

    // The API returns either [{"generated_text": ...}] or {"generated_text": ...}
    let generated = body[0]["generated_text"]
        .as_str()
        .or_else(|| body["generated_text"].as_str())
        .ok_or_else(|| EnrichError::MalformedResponse("no generated_text field".to_string()))?
        .trim()
        .to_string();

    if generated.is_empty() {
        return Err(EnrichError::EmptyGeneration);
    }

    RESPONSE_CACHE.lock().unwrap().put(input.to_string(), generated.clone());
    Ok(generated)
}

fn build_prompt(input: &str, now: DateTime<Local>) -> String {
    format!(
        r#"Current date and time: {}

Extract the task from the message below. Respond with exactly these lines:
task: <short task title>
description: <optional detail, or leave blank>
due: <due date and time, e.g. "tomorrow 15:00" or "2024-03-15 09:00">
reminder: <minutes before the due time to alert, as a number>

Message: {}"#,
        now.format("%Y-%m-%d %H:%M"),
        input
    )
}
