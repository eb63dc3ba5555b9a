/// Daily progress aggregation
///
/// Joins each of a user's habits with today's log — or a synthesized zero
/// default when no activity has been recorded yet. The default is a
/// read-only view; no log row is ever created here.
///
/// # Example
///
/// ```no_run
/// use habitd_shared::progress::progress_for_user;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// for entry in progress_for_user(&pool, user_id).await? {
///     println!("{}: {}/{}", entry.name, entry.today.count, entry.target_per_day);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::habit_log::{utc_day_start, HabitLogStatus};

/// Today's progress for one habit
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TodayProgress {
    /// Completions recorded today (0 when no log exists)
    pub count: i32,

    /// Derived status (`in_progress` when no log exists)
    pub status: HabitLogStatus,
}

/// A habit joined with its progress for the current UTC day
#[derive(Debug, Clone, Serialize)]
pub struct HabitProgress {
    /// Habit ID
    pub id: Uuid,

    /// Habit name
    pub name: String,

    /// Habit description
    pub description: String,

    /// Habit polarity
    pub is_positive: bool,

    /// Daily target
    pub target_per_day: i32,

    /// Today's count and status
    pub today: TodayProgress,
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    id: Uuid,
    name: String,
    description: String,
    is_positive: bool,
    target_per_day: i32,
    today_count: i32,
    today_status: HabitLogStatus,
}

/// Builds the progress summary for every habit a user owns
///
/// Uses the same "newest log dated today or later" lookup as the increment
/// path, so the view and the state machine agree on what "today's log" is.
/// Habits without a log today report `{count: 0, status: in_progress}`.
/// An empty result means the user owns no habits; the caller decides how to
/// surface that.
pub async fn progress_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<HabitProgress>, sqlx::Error> {
    let today_start = utc_day_start(Utc::now());

    let rows = sqlx::query_as::<_, ProgressRow>(
        r#"
        SELECT h.id, h.name, h.description, h.is_positive, h.target_per_day,
               COALESCE(l.count, 0) AS today_count,
               COALESCE(l.status, 'in_progress'::habit_log_status) AS today_status
        FROM habits h
        LEFT JOIN LATERAL (
            SELECT count, status
            FROM habit_logs
            WHERE habit_id = h.id AND date >= $2
            ORDER BY date DESC
            LIMIT 1
        ) l ON TRUE
        WHERE h.user_id = $1
        ORDER BY h.created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(today_start)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| HabitProgress {
            id: row.id,
            name: row.name,
            description: row.description,
            is_positive: row.is_positive,
            target_per_day: row.target_per_day,
            today: TodayProgress {
                count: row.today_count,
                status: row.today_status,
            },
        })
        .collect())
}
