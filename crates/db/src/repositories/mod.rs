//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod conversation_metric_repo;

pub use conversation_metric_repo::ConversationMetricRepo;
