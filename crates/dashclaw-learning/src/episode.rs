//! Deterministic episode scoring.
//!
//! Every finished (or in-flight) action gets a 0-100 quality score from a
//! fixed additive heuristic over outcome, risk posture, reversibility,
//! runtime, cost, confidence calibration, and hygiene counters. The full
//! factor breakdown is returned so callers can explain a score.

use dashclaw_types::{ActionStatus, EpisodeSnapshot};
use serde::{Deserialize, Serialize};

/// Coarse outcome bucket derived from the action status alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeLabel {
    Success,
    Failure,
    Pending,
}

impl OutcomeLabel {
    pub fn from_status(status: ActionStatus) -> Self {
        match status {
            ActionStatus::Completed => OutcomeLabel::Success,
            ActionStatus::Failed | ActionStatus::Cancelled => OutcomeLabel::Failure,
            _ => OutcomeLabel::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeLabel::Success => "success",
            OutcomeLabel::Failure => "failure",
            OutcomeLabel::Pending => "pending",
        }
    }
}

/// Signed contribution of each factor. Summing all fields (including
/// `base`) and clamping to 0-100 reproduces the score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: i32,
    pub status: i32,
    pub risk: i32,
    pub reversibility: i32,
    pub duration: i32,
    pub cost: i32,
    pub confidence: i32,
    pub invalidated_assumptions: i32,
    pub open_loops: i32,
}

impl ScoreBreakdown {
    fn total(&self) -> i32 {
        self.base
            + self.status
            + self.risk
            + self.reversibility
            + self.duration
            + self.cost
            + self.confidence
            + self.invalidated_assumptions
            + self.open_loops
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeScore {
    pub score: u32,
    pub outcome_label: OutcomeLabel,
    pub breakdown: ScoreBreakdown,
}

/// Score one episode. Missing risk defaults to 0, missing confidence to
/// 50; duration and cost contribute nothing when absent.
pub fn score_action_episode(snapshot: &EpisodeSnapshot) -> EpisodeScore {
    let status = snapshot.status;
    let risk_score = (snapshot.risk_score.unwrap_or(0.0).round() as i32).clamp(0, 100);
    let confidence = (snapshot.confidence.unwrap_or(50.0).round() as i32).clamp(0, 100);

    let mut breakdown = ScoreBreakdown {
        base: 50,
        ..ScoreBreakdown::default()
    };

    breakdown.status = match status {
        ActionStatus::Completed => 30,
        ActionStatus::Failed => -35,
        ActionStatus::Cancelled => -20,
        ActionStatus::PendingApproval => -8,
        ActionStatus::Running => -5,
        ActionStatus::Pending => 0,
    };

    if risk_score > 60 {
        breakdown.risk -= ((risk_score - 60) as f64 / 2.0).round().min(20.0) as i32;
    } else if risk_score <= 30 {
        breakdown.risk += 4;
    }

    breakdown.reversibility = if snapshot.reversible { 5 } else { -8 };

    if let Some(duration_ms) = snapshot.duration_ms {
        breakdown.duration = if duration_ms <= 60_000.0 {
            6
        } else if duration_ms <= 300_000.0 {
            3
        } else if duration_ms <= 1_800_000.0 {
            -4
        } else {
            -10
        };
    }

    if let Some(cost) = snapshot.cost_estimate {
        breakdown.cost = if cost <= 0.05 {
            4
        } else if cost <= 1.0 {
            1
        } else if cost <= 5.0 {
            -4
        } else {
            -8
        };
    }

    if status == ActionStatus::Completed && confidence >= 70 {
        breakdown.confidence += 4;
    }
    if status == ActionStatus::Failed && confidence >= 80 {
        breakdown.confidence -= 8;
    }

    breakdown.invalidated_assumptions =
        -((snapshot.invalidated_assumptions as i32 * 4).min(16));
    breakdown.open_loops = -((snapshot.open_loops as i32 * 2).min(10));

    EpisodeScore {
        score: breakdown.total().clamp(0, 100) as u32,
        outcome_label: OutcomeLabel::from_status(status),
        breakdown,
    }
}
