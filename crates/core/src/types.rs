/// Opaque user identifier issued by the external auth service.
pub type UserId = String;

/// Generation primary keys are UUIDs.
pub type GenerationId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
