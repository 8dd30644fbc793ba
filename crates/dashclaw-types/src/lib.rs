//! # dashclaw-types
//!
//! Shared record types for the DashClaw governance core.
//!
//! Every engine crate (scoring, drift, learning, guardrails, compliance,
//! signals) consumes these plain records and returns plain results. The
//! types here carry no behavior beyond small predicates and parsing
//! helpers; callers own fetching and persistence.
//!
//! The guardrail policy document (`PolicyDocument`) is a stable interchange
//! format consumed by external test generators. Its serialized field names
//! (including the `_dashclaw_*` extension keys) must not change.

pub mod action;
pub mod compliance;
pub mod guardrail;
pub mod learning;
pub mod scoring;

pub use action::{ActionRecord, ActionStatus};
pub use compliance::{
    AgentRelevance, ComplianceControl, Framework, MappingCoverage, PolicyMapping, PolicyPattern,
};
pub use guardrail::{
    AppliesTo, GuardrailPolicy, PolicyDocument, PolicyRule, PolicyTest, PolicyType, SourcePolicy,
};
pub use learning::EpisodeSnapshot;
pub use scoring::{
    CompositeMethod, DataConfig, DataSource, Dimension, ProfileStatus, RawValue, RiskRule,
    RiskTemplate, RuleValue, ScaleOp, ScaleRule, ScoringProfile,
};
