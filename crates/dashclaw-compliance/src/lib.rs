//! # dashclaw-compliance
//!
//! Maps guardrail policy documents onto regulatory framework controls,
//! analyzes the resulting gaps into a prioritized remediation plan, and
//! renders audit-ready reports.
//!
//! Framework definitions are caller-supplied data
//! ([`dashclaw_types::Framework`]); this crate never touches the
//! filesystem.

#![deny(unsafe_code)]

pub mod analyzer;
pub mod error;
pub mod mapper;
pub mod reporter;

pub use analyzer::{
    analyze_gaps, GapAnalysis, GapSummary, RemediationItem, RiskAssessment, RiskLevel,
};
pub use error::ComplianceError;
pub use mapper::{
    map_policies, ComplianceMap, ComplianceSummary, ControlMapping, ControlStatus, MatchedPolicy,
};
pub use reporter::{generate_json_report, generate_markdown_report};
