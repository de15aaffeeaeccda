use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How close a step's deadline must be (in days) before it counts as urgent.
pub const URGENT_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub deadline: NaiveDate,
    /// Owner of the goal. Nullable: ownerless goals predate auth and are
    /// deletable by anyone.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Loaded separately, ordered by deadline ascending.
    #[sqlx(skip)]
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Goal {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        deadline: NaiveDate,
        user_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description,
            deadline,
            user_id,
            created_at: Utc::now(),
            steps: Vec::new(),
        }
    }

    /// Completed-step fraction in [0, 1]; 0 when there are no steps.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let done = self.steps.iter().filter(|s| s.is_completed).count();
        done as f64 / self.steps.len() as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Step {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub deadline: NaiveDate,
    pub is_completed: bool,
}

impl Step {
    pub fn new(goal_id: impl Into<String>, title: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            goal_id: goal_id.into(),
            title: title.into(),
            deadline,
            is_completed: false,
        }
    }

    /// Deadline has passed and the step is not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.deadline < today && !self.is_completed
    }

    /// Due within [`URGENT_WINDOW_DAYS`], not done, not already overdue.
    pub fn is_urgent(&self, today: NaiveDate) -> bool {
        !self.is_completed
            && !self.is_overdue(today)
            && (self.deadline - today).num_days() <= URGENT_WINDOW_DAYS
    }
}

/// Partial update applied to a step: only the provided fields change.
#[derive(Debug, Clone, Default)]
pub struct StepUpdate {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn progress_empty_goal_is_zero() {
        let goal = Goal::new("Ship v1", None, date("2026-12-31"), None);
        assert_eq!(goal.progress(), 0.0);
    }

    #[test]
    fn progress_counts_completed_fraction() {
        let mut goal = Goal::new("Ship v1", None, date("2026-12-31"), None);
        goal.steps = vec![
            Step::new(&goal.id, "Write spec", date("2026-09-01")),
            Step::new(&goal.id, "Implement", date("2026-10-01")),
        ];
        goal.steps[0].is_completed = true;
        assert_eq!(goal.progress(), 0.5);
    }

    #[test]
    fn overdue_requires_past_deadline_and_incomplete() {
        let today = date("2026-09-10");
        let mut step = Step::new("g1", "prepare", date("2026-09-09"));
        assert!(step.is_overdue(today));

        step.is_completed = true;
        assert!(!step.is_overdue(today));

        let future = Step::new("g1", "prepare", date("2026-09-11"));
        assert!(!future.is_overdue(today));
    }

    #[test]
    fn urgent_within_three_days_only() {
        let today = date("2026-09-10");
        assert!(Step::new("g1", "a", date("2026-09-10")).is_urgent(today));
        assert!(Step::new("g1", "b", date("2026-09-13")).is_urgent(today));
        assert!(!Step::new("g1", "c", date("2026-09-14")).is_urgent(today));
    }

    #[test]
    fn overdue_step_is_not_urgent() {
        let today = date("2026-09-10");
        let step = Step::new("g1", "late", date("2026-09-01"));
        assert!(step.is_overdue(today));
        assert!(!step.is_urgent(today));
    }

    #[test]
    fn completed_step_is_neither_overdue_nor_urgent() {
        let today = date("2026-09-10");
        let mut step = Step::new("g1", "done", date("2026-09-11"));
        step.is_completed = true;
        assert!(!step.is_overdue(today));
        assert!(!step.is_urgent(today));
    }

    #[test]
    fn new_goal_has_distinct_ids() {
        let a = Goal::new("A", None, date("2026-12-31"), None);
        let b = Goal::new("B", None, date("2026-12-31"), None);
        assert_ne!(a.id, b.id);
    }
}
