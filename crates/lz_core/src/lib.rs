//! Shared landing-zone custom-resource domain primitives.
//!
//! This crate owns the deployment-engine lifecycle contract, physical
//! resource id derivation, the throttling back-off schedule, and asset
//! fingerprinting. It intentionally excludes AWS SDK and Lambda runtime
//! concerns; those live in `lz_lambda` and `lz_stacks`.

pub mod backoff;
pub mod contract;
pub mod fingerprint;
pub mod physical_id;
