//! Ensemble aggregation: majority vote plus accuracy-weighted scoring.
//!
//! Both computations are pure and commutative over the three verdicts;
//! the arity of three is fixed by the deployment, not configurable.

use crate::domain::{EnsembleResult, ModelVerdict, RiskTier};

/// Combined binary decision and continuous score, before tier bucketing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleVote {
    /// True when at least two of the three models predicted positive
    pub positive: bool,
    /// Accuracy-weighted confidence on the [0, 100] scale
    pub risk_score: f64,
}

/// Combine three model verdicts into one ensemble decision.
///
/// The binary decision is a simple majority (ties are impossible with
/// three voters). The risk score weights each model's
/// confidence-as-percentage by its declared accuracy:
/// `sum(p_i * 100 * a_i) / sum(a_i)`, which stays within [0, 100] for
/// probabilities in [0, 1].
#[must_use]
pub fn aggregate(verdicts: &[ModelVerdict; 3]) -> EnsembleVote {
    let positive_votes = verdicts.iter().filter(|v| v.predicted_positive).count();

    let weight_sum: f64 = verdicts.iter().map(|v| v.declared_accuracy).sum();
    let weighted: f64 = verdicts
        .iter()
        .map(|v| v.probability * 100.0 * v.declared_accuracy)
        .sum();

    EnsembleVote {
        positive: positive_votes >= 2,
        risk_score: weighted / weight_sum,
    }
}

/// Aggregate, bucket, and assemble the full assessment.
#[must_use]
pub fn assess(verdicts: [ModelVerdict; 3]) -> EnsembleResult {
    let vote = aggregate(&verdicts);
    EnsembleResult {
        per_model: verdicts,
        ensemble_positive: vote.positive,
        risk_score: vote.risk_score,
        risk_tier: RiskTier::from_score(vote.risk_score),
    }
}
