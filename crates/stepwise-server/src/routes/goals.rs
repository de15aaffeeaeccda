//! Goal endpoints: list, generate (via the Gemini planner) and delete.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use stepwise_core::goal::{Goal, Step};
use stepwise_core::plan;
use stepwise_core::StepwiseError;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateGoalBody {
    pub title: Option<String>,
    pub deadline: Option<String>,
}

/// GET /api/goals
///
/// Anonymous callers get an empty array rather than an error so a fresh
/// client can render before sign-in.
pub async fn list_goals(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let Some(user_id) = user.0 else {
        return Ok(Json(json!([])));
    };

    let today = Utc::now().date_naive();
    let goals = app.store.list_goals(&user_id).await?;
    let body: Vec<Value> = goals.iter().map(|g| goal_json(g, today)).collect();
    Ok(Json(Value::Array(body)))
}

/// POST /api/goals/generate
pub async fn generate_goal(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<GenerateGoalBody>,
) -> Result<Json<Value>, AppError> {
    let Some(user_id) = user.0 else {
        return Err(AppError::unauthorized());
    };

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(StepwiseError::InvalidTitle)?
        .to_string();
    let raw_deadline = body
        .deadline
        .as_deref()
        .ok_or(StepwiseError::MissingField("deadline"))?;
    let deadline = plan::parse_deadline(raw_deadline)?;

    let today = Utc::now().date_naive();
    if deadline < today {
        return Err(StepwiseError::DeadlineInPast.into());
    }

    let prompt = plan::build_prompt(&title, deadline, today);
    let text = app.gemini.generate_text(&prompt).await?;
    let planned = plan::parse_plan(&text, today, deadline).map_err(|e| {
        tracing::warn!(raw = %text, "model returned an unusable plan");
        e
    })?;

    let mut goal = Goal::new(&title, None, deadline, Some(user_id));
    goal.steps = planned
        .into_iter()
        .map(|p| Step::new(&goal.id, &p.title, p.deadline))
        .collect();
    app.store.create_goal(&goal).await?;

    tracing::info!(goal_id = %goal.id, steps = goal.steps.len(), "goal generated");
    Ok(Json(goal_json(&goal, today)))
}

/// DELETE /api/goals/{id}
pub async fn delete_goal(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let Some(user_id) = user.0 else {
        return Err(AppError::unauthorized());
    };

    let goal = app
        .store
        .find_goal(&id)
        .await?
        .ok_or_else(|| StepwiseError::GoalNotFound(id.clone()))?;

    // Goals without an owner are deletable by any signed-in user.
    if let Some(owner) = &goal.user_id {
        if owner != &user_id {
            return Err(StepwiseError::Forbidden.into());
        }
    }

    app.store.delete_goal(&id).await?;
    Ok(Json(json!({ "success": true })))
}

// ---------------------------------------------------------------------------
// JSON shaping
// ---------------------------------------------------------------------------

pub(crate) fn goal_json(goal: &Goal, today: NaiveDate) -> Value {
    let steps: Vec<Value> = goal.steps.iter().map(|s| step_json(s, today)).collect();
    json!({
        "id": goal.id,
        "title": goal.title,
        "description": goal.description,
        "deadline": goal.deadline.format("%Y-%m-%d").to_string(),
        "userId": goal.user_id,
        "createdAt": goal.created_at.to_rfc3339(),
        "progress": goal.progress(),
        "steps": steps,
    })
}

pub(crate) fn step_json(step: &Step, today: NaiveDate) -> Value {
    json!({
        "id": step.id,
        "goalId": step.goal_id,
        "title": step.title,
        "deadline": step.deadline.format("%Y-%m-%d").to_string(),
        "isCompleted": step.is_completed,
        "isOverdue": step.is_overdue(today),
        "isUrgent": step.is_urgent(today),
    })
}
