//! Step endpoints: partial updates (rename, completion toggle).

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use stepwise_core::goal::StepUpdate;
use stepwise_core::StepwiseError;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::routes::goals::step_json;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateStepBody {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
}

/// PATCH /api/steps/{id}
///
/// Only the fields present in the body change; everything else is left as
/// stored, deadlines included.
pub async fn update_step(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStepBody>,
) -> Result<Json<Value>, AppError> {
    let Some(user_id) = user.0 else {
        return Err(AppError::unauthorized());
    };

    let step = app
        .store
        .find_step(&id)
        .await?
        .ok_or_else(|| StepwiseError::StepNotFound(id.clone()))?;

    let goal = app
        .store
        .find_goal(&step.goal_id)
        .await?
        .ok_or_else(|| StepwiseError::GoalNotFound(step.goal_id.clone()))?;
    if let Some(owner) = &goal.user_id {
        if owner != &user_id {
            return Err(StepwiseError::Forbidden.into());
        }
    }

    let update = StepUpdate {
        title: body.title,
        is_completed: body.is_completed,
    };
    let updated = app.store.update_step(&id, &update).await?;

    let today = Utc::now().date_naive();
    Ok(Json(step_json(&updated, today)))
}
