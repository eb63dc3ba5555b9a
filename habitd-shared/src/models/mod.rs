/// Database models for habitd
///
/// All models expose their CRUD operations as static async methods taking a
/// `PgPool`. Every habit and log operation is scoped by the owning user: a
/// row owned by someone else is indistinguishable from a missing row.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `habit`: Trackable behaviors with a daily target
/// - `habit_log`: Per-habit, per-day progress records

pub mod habit;
pub mod habit_log;
pub mod user;
