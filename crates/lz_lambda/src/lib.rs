//! AWS-oriented adapters and handlers for landing-zone custom resources.
//!
//! This crate owns runtime integration details (Lambda handlers, AWS SDK
//! adapters with throttling back-off, and response delivery) on top of the
//! lifecycle contract in `lz_core`. Each handler reconciles one external
//! resource with list-before-mutate semantics so re-invocation converges
//! without duplicate side effects.

pub mod adapters;
pub mod delivery;
pub mod error;
pub mod handlers;
pub mod telemetry;
