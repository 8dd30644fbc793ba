//! # dashclaw
//!
//! The DashClaw Governance Core: pure computational engines that turn raw
//! agent action and episode records into quantitative judgments.
//!
//! This facade re-exports every engine crate under one roof:
//!
//! - [`types`]: the shared record and policy types
//! - [`scoring`]: multi-dimension quality profiles, risk templates, and
//!   statistical auto-calibration
//! - [`drift`]: baseline vs window behavior drift detection
//! - [`learning`]: episode scoring and behavior recommendations
//! - [`guardrails`]: policy conversion and deterministic evaluation
//! - [`compliance`]: control mapping, gap analysis, and reporting
//! - [`signals`]: the seven cross-cutting governance risk signals
//!
//! The core performs no I/O of its own. Callers fetch records, implement
//! the async store capabilities (`DriftStore`, `SignalStore`), and
//! persist or deliver what the engines return.

#![deny(unsafe_code)]

pub use dashclaw_compliance as compliance;
pub use dashclaw_drift as drift;
pub use dashclaw_guardrails as guardrails;
pub use dashclaw_learning as learning;
pub use dashclaw_scoring as scoring;
pub use dashclaw_signals as signals;
pub use dashclaw_types as types;
