//! HTTP middleware stack: shared-secret auth, CORS and per-request tracing.

pub mod auth;
pub mod cors;
pub mod trace;
