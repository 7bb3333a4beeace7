//! Verification of access tokens issued by the external identity provider.

pub mod jwt;
