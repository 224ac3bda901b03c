//! Risk scoring: pure functions mapping a filtered subset to the two
//! agent scores and the derived epidemic phase.
//!
//! The baseline (Agent A) score is the focus-region case ratio plus a
//! time-progress term; the enhanced (Agent B) score adds a weighted
//! context bonus on top. The phase comes from a fixed threshold table
//! over the enhanced score, evaluated top-down.

use chrono::NaiveDate;

use herdwatch_common::{OutbreakRecord, Phase, RiskAssessment};

/// Region whose case share drives the import-risk ratio.
pub const FOCUS_REGION: &str = "Asia";

/// Weight of time progress in the baseline score.
const TIME_WEIGHT: f64 = 20.0;
/// Per-case weight of the enhanced context bonus.
const CONTEXT_BONUS_WEIGHT: f64 = 1.5;
/// Scores saturate here instead of reaching 100.
const SCORE_CAP: f64 = 99.0;

struct PhaseTier {
    /// Strict lower bound: the tier applies when `score > min_score`.
    min_score: f64,
    phase: Phase,
    index: f64,
    baseline_advice: &'static str,
    enhanced_advice: &'static str,
}

/// Ordered threshold table; the first tier the enhanced score exceeds
/// wins. The last tier is the unconditional floor.
static PHASE_TIERS: [PhaseTier; 3] = [
    PhaseTier {
        min_score: 80.0,
        phase: Phase::Diffusion,
        index: 9.5,
        baseline_advice: "Widespread across Asia; risk climbing sharply.",
        enhanced_advice: "URGENT ALERT: a diffusion-phase pattern was detected. \
            Introduction risk from neighboring countries is at its peak. (risk 9.5/10)",
    },
    PhaseTier {
        min_score: 50.0,
        phase: Phase::Early,
        index: 7.0,
        baseline_advice: "Spreading through southern Asia; monitoring required.",
        enhanced_advice: "WARNING: an early-epidemic pattern was detected. \
            Asian routes carry elevated risk. (risk 7.0/10)",
    },
    PhaseTier {
        min_score: f64::NEG_INFINITY,
        phase: Phase::Latent,
        index: 4.0,
        baseline_advice: "Occurrences centered on Europe and Africa.",
        enhanced_advice: "ADVISORY: a latent-phase pattern was detected. \
            Continued global monitoring is recommended. (risk 4.0/10)",
    },
];

/// Normalized progress of `cutoff` through the dataset's date range:
/// clamped linear interpolation, floored at 0.1 so early dates still
/// carry some weight. A single-day range counts as fully progressed.
pub fn time_factor(cutoff: NaiveDate, min_date: NaiveDate, max_date: NaiveDate) -> f64 {
    let span_days = (max_date - min_date).num_days();
    if span_days <= 0 {
        return 1.0;
    }
    let elapsed_days = (cutoff - min_date).num_days() as f64;
    (elapsed_days / span_days as f64).clamp(0.1, 1.0)
}

/// Score one filtered subset. No error paths: the `+1` denominator
/// avoids dividing by zero on an empty subset, and both scores saturate
/// at the cap.
pub fn assess(
    subset: &[OutbreakRecord],
    cutoff: NaiveDate,
    min_date: NaiveDate,
    max_date: NaiveDate,
    enhanced: bool,
) -> RiskAssessment {
    let total_cases = subset.len();
    let focus_cases = subset.iter().filter(|r| r.region == FOCUS_REGION).count();
    let progress = time_factor(cutoff, min_date, max_date);

    let case_ratio = focus_cases as f64 / (total_cases as f64 + 1.0);
    let baseline_score = (case_ratio * 100.0 + progress * TIME_WEIGHT).min(SCORE_CAP);

    let bonus = if enhanced {
        focus_cases as f64 * progress * CONTEXT_BONUS_WEIGHT
    } else {
        0.0
    };
    let enhanced_score = (baseline_score + bonus).min(SCORE_CAP);

    let tier = classify(enhanced_score);

    RiskAssessment {
        baseline_score,
        enhanced_score,
        phase: tier.phase,
        phase_index: tier.index,
        baseline_advice: tier.baseline_advice.to_string(),
        enhanced_advice: tier.enhanced_advice.to_string(),
        total_cases,
        focus_cases,
        time_factor: progress,
    }
}

fn classify(score: f64) -> &'static PhaseTier {
    PHASE_TIERS
        .iter()
        .find(|tier| score > tier.min_score)
        .unwrap_or(&PHASE_TIERS[PHASE_TIERS.len() - 1])
}
