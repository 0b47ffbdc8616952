//! Primitive aliases shared by every layer.

/// Row ids for users, cases, questions, revisions and audit entries
/// (PostgreSQL `BIGSERIAL`).
pub type DbId = i64;

/// Creation and interview timestamps, always UTC (`TIMESTAMPTZ`).
pub type Timestamp = chrono::DateTime<chrono::Utc>;
