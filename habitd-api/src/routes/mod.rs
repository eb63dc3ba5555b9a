/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health and liveness checks
/// - `auth`: Registration and login
/// - `habits`: Habit CRUD
/// - `logs`: Daily log engine endpoints (increment, explicit log, listing)
/// - `progress`: Today's progress summary

pub mod auth;
pub mod habits;
pub mod health;
pub mod logs;
pub mod progress;
