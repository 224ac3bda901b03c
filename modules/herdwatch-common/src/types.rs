use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// --- Records ---

/// One validated outbreak occurrence from a CSV export.
///
/// Rows that fail validation at load time (unparseable date, missing
/// essential column, zero coordinates) never become records; anything
/// that does is immutable for the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakRecord {
    pub occurred_on: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    /// Coarse geographic grouping — a continent label in the LSD exports.
    pub region: String,
    pub country: Option<String>,
    pub locality: Option<String>,
    pub species: Option<String>,
    pub cases: Option<u32>,
    /// Derived month bucket, used by the trend chart.
    pub month: MonthKey,
}

/// Year + month bucket. Ordered, displayed `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// --- Scenario ---

/// Per-request simulation parameters. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Simulated "today": records after this date are excluded.
    pub cutoff: NaiveDate,
    /// Selected region labels. Empty means no records, not all records.
    pub regions: Vec<String>,
    /// Whether the enhanced (Agent B) scorer contributes its bonus.
    pub enhanced: bool,
}

// --- Risk assessment ---

/// Epidemic phase derived from the enhanced score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Latent,
    Early,
    Diffusion,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Latent => write!(f, "Latent"),
            Phase::Early => write!(f, "Early"),
            Phase::Diffusion => write!(f, "Diffusion"),
        }
    }
}

/// Output of one scoring pass. Recomputed from scratch per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Agent A: case-ratio plus time progress, saturating at 99.
    pub baseline_score: f64,
    /// Agent B: baseline plus the context bonus, saturating at 99.
    pub enhanced_score: f64,
    pub phase: Phase,
    /// The phase's self-assessed severity on a 0-10 scale.
    pub phase_index: f64,
    pub baseline_advice: String,
    pub enhanced_advice: String,
    // Score breakdown, shown on the dashboard.
    pub total_cases: usize,
    pub focus_cases: usize,
    pub time_factor: f64,
}

impl RiskAssessment {
    /// Percentage-point gain of the enhanced score over the baseline.
    pub fn improvement(&self) -> f64 {
        self.enhanced_score - self.baseline_score
    }
}
