/// Job identifiers are random UUIDs, opaque to clients.
pub type JobId = uuid::Uuid;

/// Principal that owns a job (the seller id carried in the access token).
pub type OwnerId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
