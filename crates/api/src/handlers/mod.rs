//! Request handlers.
//!
//! Handlers stay thin: they authenticate, hand work to the pipeline
//! services or repositories, and map errors via [`crate::error::AppError`].

pub mod conversation;
pub mod generation;
pub mod metrics;
