//! Common types used across the workspace.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{Currency, TOLERANCE, approx_eq, is_negligible};
