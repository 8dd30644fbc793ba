//! # dashclaw-guardrails
//!
//! Converts stored guardrail policies into the canonical portable
//! document form and evaluates actions against canonical policies.
//!
//! The canonical form is the interchange shape external test generators
//! consume; evaluation is fully deterministic and side-effect free. The
//! rate-limit and webhook policy types carry their configuration through
//! conversion but are enforced by the calling layer, which owns counters
//! and network access.

#![deny(unsafe_code)]

pub mod convert;
pub mod evaluate;
pub mod pattern;

pub use convert::{convert_policies, convert_policy, ConvertError};
pub use evaluate::{evaluate_policies, evaluate_policy, PolicyEvalResult, PolicyInput};
pub use pattern::tool_matches;
