//! Declarative construct wrappers for the landing-zone deployment stacks.
//!
//! Each wrapper packages a handler's code location, the least-privilege IAM
//! statements its calls need, and a custom resource whose properties carry a
//! fresh per-synthesis update token so the deployment engine re-invokes the
//! handler on every update instead of relying on property diffing.

pub mod assets;
pub mod custom_resource;
pub mod error;
pub mod iam;
pub mod pipeline;
pub mod template;
