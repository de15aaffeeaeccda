//! Goal decomposition: prompt construction and parsing/cleaning of the
//! model's step plan.
//!
//! The model is asked for a bare JSON array of `{title, deadline}` objects.
//! In practice responses sometimes arrive wrapped in markdown code fences, so
//! parsing first strips those, then cleans the entries: blank titles and
//! unparsable dates are dropped, out-of-range deadlines are clamped into
//! `[today, goal deadline]`, and the result is sorted by deadline.

use crate::error::{Result, StepwiseError};
use chrono::NaiveDate;
use serde::Deserialize;

/// One cleaned, dated sub-step of a goal, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub title: String,
    pub deadline: NaiveDate,
}

/// A step exactly as the model emitted it. Lenient on purpose: malformed
/// entries are skipped during cleaning rather than failing the whole plan.
#[derive(Debug, Deserialize)]
pub struct RawStep {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Build the decomposition prompt for a goal.
pub fn build_prompt(title: &str, goal_deadline: NaiveDate, today: NaiveDate) -> String {
    format!(
        r#"You are an expert task planner.
Break the following goal into 5-10 concrete, actionable steps.

Goal: "{title}"
Goal deadline: {goal_deadline}
Today's date: {today}

Requirements:
1. Each step must be a concrete, actionable item.
2. The steps must be in a logical order.
3. Assign each step a realistic deadline:
   - the first step close to today,
   - the last step on or just before the goal deadline,
   - dates formatted as YYYY-MM-DD.
4. Respond with ONLY a JSON array in the following shape. Do not use
   markdown code fences.

[
  {{ "title": "Step name", "deadline": "YYYY-MM-DD" }},
  ...
]"#
    )
}

/// Remove markdown code-fence artifacts the model sometimes wraps its JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a deadline string: `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_deadline(input: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    chrono::DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.date_naive())
        .map_err(|_| StepwiseError::InvalidDeadline(input.to_string()))
}

/// Parse the fence-stripped model text as a JSON array of raw steps.
pub fn parse_raw_plan(text: &str) -> Result<Vec<RawStep>> {
    serde_json::from_str(text).map_err(|e| StepwiseError::PlanUnparsable(e.to_string()))
}

/// Clean raw steps: trim titles, drop blank/undated entries, clamp deadlines
/// into `[today, goal_deadline]`, sort ascending. Errors if nothing survives.
pub fn clean_plan(
    raw: Vec<RawStep>,
    today: NaiveDate,
    goal_deadline: NaiveDate,
) -> Result<Vec<PlannedStep>> {
    let mut steps: Vec<PlannedStep> = raw
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            let deadline = parse_deadline(entry.deadline.as_deref()?).ok()?;
            let deadline = deadline.max(today).min(goal_deadline);
            Some(PlannedStep { title, deadline })
        })
        .collect();

    if steps.is_empty() {
        return Err(StepwiseError::PlanEmpty);
    }
    steps.sort_by(|a, b| a.deadline.cmp(&b.deadline));
    Ok(steps)
}

/// Full pipeline from raw model text to a cleaned, ordered plan.
pub fn parse_plan(
    raw_text: &str,
    today: NaiveDate,
    goal_deadline: NaiveDate,
) -> Result<Vec<PlannedStep>> {
    let raw = parse_raw_plan(&strip_code_fences(raw_text))?;
    clean_plan(raw, today, goal_deadline)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
