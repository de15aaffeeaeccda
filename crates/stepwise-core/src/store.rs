//! Relational store for goals, steps, and sessions, backed by SQLite via
//! sqlx. The schema is created on connect; goal deletion cascades to steps.

use crate::error::{Result, StepwiseError};
use crate::goal::{Goal, Step, StepUpdate};
use rand::{distributions::Alphanumeric, Rng};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS goals (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    deadline    TEXT NOT NULL,
    user_id     TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS steps (
    id           TEXT PRIMARY KEY,
    goal_id      TEXT NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
    title        TEXT NOT NULL,
    deadline     TEXT NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_steps_goal ON steps(goal_id);

CREATE TABLE IF NOT EXISTS sessions (
    token      TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// In-memory database for tests. Single connection: each SQLite memory
    /// connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Goals
    // -----------------------------------------------------------------------

    /// Insert a goal and all of its steps in one transaction.
    pub async fn create_goal(&self, goal: &Goal) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO goals (id, title, description, deadline, user_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&goal.id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.deadline)
        .bind(&goal.user_id)
        .bind(goal.created_at)
        .execute(&mut *tx)
        .await?;

        for step in &goal.steps {
            sqlx::query(
                "INSERT INTO steps (id, goal_id, title, deadline, is_completed) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&step.id)
            .bind(&step.goal_id)
            .bind(&step.title)
            .bind(step.deadline)
            .bind(step.is_completed)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(goal_id = %goal.id, steps = goal.steps.len(), "goal created");
        Ok(())
    }

    /// All goals owned by `user_id`, newest first, steps by deadline ascending.
    pub async fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = sqlx::query_as(
            "SELECT id, title, description, deadline, user_id, created_at \
             FROM goals WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        for goal in &mut goals {
            goal.steps = self.steps_for(&goal.id).await?;
        }
        Ok(goals)
    }

    /// A single goal with its steps, or `None`.
    pub async fn find_goal(&self, id: &str) -> Result<Option<Goal>> {
        let goal: Option<Goal> = sqlx::query_as(
            "SELECT id, title, description, deadline, user_id, created_at \
             FROM goals WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match goal {
            Some(mut goal) => {
                goal.steps = self.steps_for(&goal.id).await?;
                Ok(Some(goal))
            }
            None => Ok(None),
        }
    }

    /// Delete a goal; its steps go with it via the cascade.
    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM goals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StepwiseError::GoalNotFound(id.to_string()));
        }
        tracing::debug!(goal_id = %id, "goal deleted");
        Ok(())
    }

    async fn steps_for(&self, goal_id: &str) -> Result<Vec<Step>> {
        let steps = sqlx::query_as(
            "SELECT id, goal_id, title, deadline, is_completed \
             FROM steps WHERE goal_id = ? ORDER BY deadline ASC, rowid ASC",
        )
        .bind(goal_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(steps)
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    pub async fn find_step(&self, id: &str) -> Result<Option<Step>> {
        let step = sqlx::query_as(
            "SELECT id, goal_id, title, deadline, is_completed FROM steps WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(step)
    }

    /// Apply a partial update and return the updated step. Blank titles are
    /// ignored (the UI reverts empty edits silently).
    pub async fn update_step(&self, id: &str, update: &StepUpdate) -> Result<Step> {
        if let Some(completed) = update.is_completed {
            sqlx::query("UPDATE steps SET is_completed = ? WHERE id = ?")
                .bind(completed)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(title) = update.title.as_deref().map(str::trim) {
            if !title.is_empty() {
                sqlx::query("UPDATE steps SET title = ? WHERE id = ?")
                    .bind(title)
                    .bind(id)
                    .execute(&self.pool)
                    .await?;
            }
        }
        self.find_step(id)
            .await?
            .ok_or_else(|| StepwiseError::StepNotFound(id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Mint an opaque session token for `user_id`.
    pub async fn create_session(&self, user_id: &str) -> Result<String> {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(40)
            .map(char::from)
            .collect();
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(chrono::Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(token)
    }

    /// Resolve a session token to its user id.
    pub async fn user_for_token(&self, token: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT user_id FROM sessions WHERE token = ?")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(user_id,)| user_id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
