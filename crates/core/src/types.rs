/// Primary keys and user ids are UUIDs issued by the identity provider.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
