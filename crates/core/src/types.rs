/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Persistent key of a tracked user, taken verbatim from the webhook path.
pub type UserId = String;
