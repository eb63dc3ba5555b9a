/// Habit model and database operations
///
/// A habit is a trackable behavior owned by exactly one user. Every
/// operation here is scoped by the owning user: a habit belonging to user B
/// is indistinguishable from "does not exist" to user A.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE habits (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     is_positive BOOLEAN NOT NULL DEFAULT TRUE,
///     target_per_day INTEGER NOT NULL DEFAULT 1 CHECK (target_per_day >= 1),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use habitd_shared::models::habit::{CreateHabit, Habit, UpdateHabit};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner: Uuid) -> Result<(), sqlx::Error> {
/// let habit = Habit::create(
///     &pool,
///     owner,
///     CreateHabit {
///         name: "Morning run".to_string(),
///         description: Some("5k before work".to_string()),
///         is_positive: Some(true),
///         target_per_day: Some(1),
///     },
/// )
/// .await?;
///
/// let renamed = Habit::update(
///     &pool,
///     owner,
///     habit.id,
///     UpdateHabit {
///         name: Some("Evening run".to_string()),
///         ..Default::default()
///     },
/// )
/// .await?;
/// assert!(renamed.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Trackable behavior with a daily target
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Habit {
    /// Unique habit ID (UUID v4)
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Display name, required non-empty
    pub name: String,

    /// Free-form description, defaults to empty
    pub description: String,

    /// Polarity: true for a build-up habit, false for a break habit
    pub is_positive: bool,

    /// Daily completion target, always >= 1
    pub target_per_day: i32,

    /// When the habit was created
    pub created_at: DateTime<Utc>,

    /// When the habit was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new habit
///
/// Only `name` is required; the rest default as the schema does.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHabit {
    /// Display name (required non-empty)
    pub name: String,

    /// Description, defaults to ""
    pub description: Option<String>,

    /// Polarity, defaults to true
    pub is_positive: Option<bool>,

    /// Daily target, defaults to 1, must be >= 1
    pub target_per_day: Option<i32>,
}

/// Partial update for a habit
///
/// Only present fields are applied. The owner cannot be changed. Unknown
/// JSON keys are dropped during deserialization rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHabit {
    /// New display name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New polarity
    pub is_positive: Option<bool>,

    /// New daily target, must be >= 1
    pub target_per_day: Option<i32>,
}

impl UpdateHabit {
    /// True when no whitelisted field is present
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_positive.is_none()
            && self.target_per_day.is_none()
    }
}

const HABIT_COLUMNS: &str =
    "id, user_id, name, description, is_positive, target_per_day, created_at, updated_at";

impl Habit {
    /// Creates a new habit owned by `owner`
    ///
    /// # Errors
    ///
    /// Returns an error if the insert violates a constraint (e.g. the
    /// `target_per_day >= 1` check) or the database is unreachable.
    pub async fn create(pool: &PgPool, owner: Uuid, data: CreateHabit) -> Result<Self, sqlx::Error> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (user_id, name, description, is_positive, target_per_day)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, description, is_positive, target_per_day,
                      created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(data.name)
        .bind(data.description.unwrap_or_default())
        .bind(data.is_positive.unwrap_or(true))
        .bind(data.target_per_day.unwrap_or(1))
        .fetch_one(pool)
        .await?;

        Ok(habit)
    }

    /// Lists all habits owned by `owner`, in insertion order
    pub async fn list_for_user(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let habits = sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, user_id, name, description, is_positive, target_per_day,
                   created_at, updated_at
            FROM habits
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(habits)
    }

    /// Finds a habit by ID, scoped to its owner
    ///
    /// Returns `None` both when the habit is absent and when it belongs to a
    /// different user.
    pub async fn find_owned(
        pool: &PgPool,
        owner: Uuid,
        habit_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, user_id, name, description, is_positive, target_per_day,
                   created_at, updated_at
            FROM habits
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(habit_id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;

        Ok(habit)
    }

    /// Finds a habit by ID with a row lock, scoped to its owner
    ///
    /// `FOR UPDATE` serializes concurrent increments on the same habit: the
    /// second transaction blocks here until the first commits, so both
    /// observe a consistent view of today's log.
    pub async fn find_owned_for_update(
        tx: &mut Transaction<'_, Postgres>,
        owner: Uuid,
        habit_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, user_id, name, description, is_positive, target_per_day,
                   created_at, updated_at
            FROM habits
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(habit_id)
        .bind(owner)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(habit)
    }

    /// Applies a partial update to an owned habit
    ///
    /// Only fields present in `data` are written; `updated_at` is always
    /// refreshed. Returns `None` when the habit is absent or owned by a
    /// different user. An update with no present fields reads the habit
    /// back unchanged.
    pub async fn update(
        pool: &PgPool,
        owner: Uuid,
        habit_id: Uuid,
        data: UpdateHabit,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_owned(pool, owner, habit_id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE habits SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.is_positive.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_positive = ${}", bind_count));
        }
        if data.target_per_day.is_some() {
            bind_count += 1;
            query.push_str(&format!(", target_per_day = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 AND user_id = $2 RETURNING ");
        query.push_str(HABIT_COLUMNS);

        let mut q = sqlx::query_as::<_, Habit>(&query).bind(habit_id).bind(owner);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(is_positive) = data.is_positive {
            q = q.bind(is_positive);
        }
        if let Some(target_per_day) = data.target_per_day {
            q = q.bind(target_per_day);
        }

        let habit = q.fetch_optional(pool).await?;

        Ok(habit)
    }

    /// Deletes an owned habit
    ///
    /// The habit's logs are removed with it via the `ON DELETE CASCADE`
    /// foreign key on `habit_logs`.
    ///
    /// # Returns
    ///
    /// True if a habit was deleted, false when it was absent or owned by a
    /// different user
    pub async fn delete(pool: &PgPool, owner: Uuid, habit_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1 AND user_id = $2")
            .bind(habit_id)
            .bind(owner)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_habit_is_empty() {
        assert!(UpdateHabit::default().is_empty());

        let update = UpdateHabit {
            target_per_day: Some(3),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_update_habit_ignores_unknown_keys() {
        let update: UpdateHabit =
            serde_json::from_str(r#"{"name": "Read", "user_id": "not-applied", "bogus": 1}"#)
                .expect("Unknown keys should be ignored");

        assert_eq!(update.name.as_deref(), Some("Read"));
        assert!(update.description.is_none());
        assert!(update.is_positive.is_none());
        assert!(update.target_per_day.is_none());
    }
}
