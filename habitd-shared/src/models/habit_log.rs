/// Habit log model and the daily log state machine
///
/// A `HabitLog` records progress toward one habit's target on one UTC
/// calendar day. Rows are not pre-created: the absence of a log means zero
/// progress. The `date` column is the creation instant and its UTC calendar
/// day is the "day" discriminator.
///
/// Two entry points write logs:
///
/// - [`HabitLog::increment`] is the idempotent daily tracker. It keeps at
///   most one row per (habit, UTC day): the first call of the day inserts
///   with count 1, later calls update the same row in place. The habit row
///   is locked `FOR UPDATE` for the duration, so concurrent increments
///   serialize instead of both inserting.
/// - [`HabitLog::insert`] appends a new row unconditionally, bypassing the
///   one-row-per-day invariant. Callers that want distinct rows for repeat
///   activity on the same day (several workouts, say) use this.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE habit_log_status AS ENUM ('in_progress', 'completed');
///
/// CREATE TABLE habit_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     habit_id UUID NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
///     date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     count INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
///     status habit_log_status NOT NULL DEFAULT 'in_progress'
/// );
/// ```

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::habit::Habit;

/// Completion status of a day's log
///
/// Always a pure function of the log's count and the habit's target: see
/// [`HabitLogStatus::for_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "habit_log_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HabitLogStatus {
    /// Count has not reached the daily target yet
    InProgress,

    /// Count reached or exceeded the daily target
    Completed,
}

impl HabitLogStatus {
    /// Derives the status for a count against a daily target
    pub fn for_count(count: i32, target_per_day: i32) -> Self {
        if count >= target_per_day {
            HabitLogStatus::Completed
        } else {
            HabitLogStatus::InProgress
        }
    }

    /// Status as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitLogStatus::InProgress => "in_progress",
            HabitLogStatus::Completed => "completed",
        }
    }
}

/// Progress record for one habit on one UTC calendar day
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HabitLog {
    /// Unique log ID (UUID v4)
    pub id: Uuid,

    /// Habit this log belongs to
    pub habit_id: Uuid,

    /// Creation instant; its UTC calendar day identifies the log's day
    pub date: DateTime<Utc>,

    /// Number of completions recorded
    pub count: i32,

    /// Completion status derived from count and the habit's target
    pub status: HabitLogStatus,
}

/// Input for an explicit (append-style) log insert
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabitLog {
    /// Completion count, defaults to 1
    pub count: Option<i32>,

    /// Status, defaults to completed
    pub status: Option<HabitLogStatus>,
}

/// Truncates an instant to the preceding UTC midnight
///
/// Logs dated at or after this instant belong to the same UTC calendar day
/// as `at`.
pub fn utc_day_start(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

impl HabitLog {
    /// Advances today's count for an owned habit by one
    ///
    /// The whole read-modify-write runs in a transaction holding a row lock
    /// on the habit, so two concurrent increments for the same habit land on
    /// the same log row rather than both inserting.
    ///
    /// # Returns
    ///
    /// The habit snapshot and today's log after the increment, or `None`
    /// when the habit is absent or owned by a different user.
    pub async fn increment(
        pool: &PgPool,
        owner: Uuid,
        habit_id: Uuid,
    ) -> Result<Option<(Habit, Self)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(habit) = Habit::find_owned_for_update(&mut tx, owner, habit_id).await? else {
            return Ok(None);
        };

        let today_start = utc_day_start(Utc::now());
        let existing = Self::latest_since(&mut tx, habit_id, today_start).await?;

        let log = match existing {
            Some(log) => {
                let count = log.count + 1;
                let status = HabitLogStatus::for_count(count, habit.target_per_day);

                sqlx::query_as::<_, HabitLog>(
                    r#"
                    UPDATE habit_logs
                    SET count = $2, status = $3
                    WHERE id = $1
                    RETURNING id, habit_id, date, count, status
                    "#,
                )
                .bind(log.id)
                .bind(count)
                .bind(status)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                let status = HabitLogStatus::for_count(1, habit.target_per_day);

                sqlx::query_as::<_, HabitLog>(
                    r#"
                    INSERT INTO habit_logs (habit_id, count, status)
                    VALUES ($1, $2, $3)
                    RETURNING id, habit_id, date, count, status
                    "#,
                )
                .bind(habit_id)
                .bind(1i32)
                .bind(status)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        Ok(Some((habit, log)))
    }

    /// Appends a log row for an owned habit, unconditionally
    ///
    /// Does not look at existing rows for today; calling this twice on the
    /// same day produces two rows.
    ///
    /// # Returns
    ///
    /// The inserted log, or `None` when the habit is absent or owned by a
    /// different user.
    pub async fn insert(
        pool: &PgPool,
        owner: Uuid,
        habit_id: Uuid,
        data: NewHabitLog,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Ownership check and insert in one statement: nothing is inserted
        // when the habit is absent or belongs to someone else.
        let log = sqlx::query_as::<_, HabitLog>(
            r#"
            INSERT INTO habit_logs (habit_id, count, status)
            SELECT h.id, $3, $4
            FROM habits h
            WHERE h.id = $1 AND h.user_id = $2
            RETURNING id, habit_id, date, count, status
            "#,
        )
        .bind(habit_id)
        .bind(owner)
        .bind(data.count.unwrap_or(1))
        .bind(data.status.unwrap_or(HabitLogStatus::Completed))
        .fetch_optional(pool)
        .await?;

        Ok(log)
    }

    /// Lists all logs for an owned habit, newest first
    ///
    /// # Returns
    ///
    /// `None` when the habit is absent or owned by a different user.
    pub async fn list_for_habit(
        pool: &PgPool,
        owner: Uuid,
        habit_id: Uuid,
    ) -> Result<Option<Vec<Self>>, sqlx::Error> {
        if Habit::find_owned(pool, owner, habit_id).await?.is_none() {
            return Ok(None);
        }

        let logs = sqlx::query_as::<_, HabitLog>(
            r#"
            SELECT id, habit_id, date, count, status
            FROM habit_logs
            WHERE habit_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(habit_id)
        .fetch_all(pool)
        .await?;

        Ok(Some(logs))
    }

    /// Fetches the newest log dated at or after `since` for a habit
    async fn latest_since(
        tx: &mut Transaction<'_, Postgres>,
        habit_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let log = sqlx::query_as::<_, HabitLog>(
            r#"
            SELECT id, habit_id, date, count, status
            FROM habit_logs
            WHERE habit_id = $1 AND date >= $2
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(habit_id)
        .bind(since)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_for_count_reaches_target() {
        assert_eq!(
            HabitLogStatus::for_count(0, 1),
            HabitLogStatus::InProgress
        );
        assert_eq!(HabitLogStatus::for_count(1, 1), HabitLogStatus::Completed);
        assert_eq!(HabitLogStatus::for_count(2, 1), HabitLogStatus::Completed);
    }

    #[test]
    fn test_status_below_target_is_in_progress() {
        // target N: N-1 increments stay in_progress, the Nth completes
        let target = 5;
        for count in 1..target {
            assert_eq!(
                HabitLogStatus::for_count(count, target),
                HabitLogStatus::InProgress,
                "count {} of {} should be in_progress",
                count,
                target
            );
        }
        assert_eq!(
            HabitLogStatus::for_count(target, target),
            HabitLogStatus::Completed
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&HabitLogStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);

        let json = serde_json::to_string(&HabitLogStatus::Completed).unwrap();
        assert_eq!(json, r#""completed""#);
    }

    #[test]
    fn test_utc_day_start_truncates() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 17, 42, 9).unwrap();
        let start = utc_day_start(at);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_utc_day_start_midnight_boundary() {
        // 23:59:59 and 00:00:01 the next day fall into different windows
        let before = Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 1).unwrap();

        assert_ne!(utc_day_start(before), utc_day_start(after));
        assert!(before < utc_day_start(after));
        assert!(after >= utc_day_start(after));
    }

    #[test]
    fn test_new_habit_log_defaults() {
        let data: NewHabitLog = serde_json::from_str("{}").unwrap();
        assert!(data.count.is_none());
        assert!(data.status.is_none());

        let data: NewHabitLog =
            serde_json::from_str(r#"{"count": 3, "status": "in_progress"}"#).unwrap();
        assert_eq!(data.count, Some(3));
        assert_eq!(data.status, Some(HabitLogStatus::InProgress));
    }
}
