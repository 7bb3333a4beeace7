//! Voice conversation agent integration (ElevenLabs Conversational AI).
//!
//! Hands out agent sessions for a practice conversation and, once the
//! conversation has ended, waits for the provider's analysis and turns
//! it into [`metrics::ConversationMetrics`].

pub mod api;
pub mod config;
pub mod metrics;
pub mod service;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
