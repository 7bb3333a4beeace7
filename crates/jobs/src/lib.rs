//! Asynchronous job submission and bounded polling against external
//! generation APIs.
//!
//! A [`gateway::JobGateway`] drives one pipeline per request: the
//! [`submit`] stage queues a job through a [`backend::JobBackend`], the
//! [`poller`] waits for a terminal status, and the [`extract`] stage pulls
//! the result locator out of the completed payload. [`fal`] implements the
//! backend for the fal.ai queue API.

pub mod backend;
pub mod config;
pub mod extract;
pub mod fal;
pub mod gateway;
pub mod job;
pub mod poller;
pub mod submit;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
