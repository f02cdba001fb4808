//! Weighted per-factor breakdown shown on the employee detail view.

use serde::{Deserialize, Serialize};

/// Upper bound every raw factor value is clamped to before weighting.
pub const FACTOR_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFactorKind {
    ActiveRequests,
    ResponseTime,
    InterviewLoad,
    DaysSinceLastActivity,
}

impl LoadFactorKind {
    pub const fn ordered() -> [LoadFactorKind; 4] {
        [
            LoadFactorKind::ActiveRequests,
            LoadFactorKind::ResponseTime,
            LoadFactorKind::InterviewLoad,
            LoadFactorKind::DaysSinceLastActivity,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoadFactorKind::ActiveRequests => "Active Requests",
            LoadFactorKind::ResponseTime => "Response Time",
            LoadFactorKind::InterviewLoad => "Interview Load",
            LoadFactorKind::DaysSinceLastActivity => "Days Since Last Activity",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            LoadFactorKind::ActiveRequests => "Number of active tasks in progress",
            LoadFactorKind::ResponseTime => "Average response time to requests (days)",
            LoadFactorKind::InterviewLoad => "Number of scheduled interviews",
            LoadFactorKind::DaysSinceLastActivity => "Number of days since last activity",
        }
    }
}

/// Percentage weights per factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub active_requests: u32,
    pub response_time: u32,
    pub interview_load: u32,
    pub days_since_last_activity: u32,
}

impl FactorWeights {
    pub const fn weight(&self, kind: LoadFactorKind) -> u32 {
        match kind {
            LoadFactorKind::ActiveRequests => self.active_requests,
            LoadFactorKind::ResponseTime => self.response_time,
            LoadFactorKind::InterviewLoad => self.interview_load,
            LoadFactorKind::DaysSinceLastActivity => self.days_since_last_activity,
        }
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            active_requests: 30,
            response_time: 25,
            interview_load: 25,
            days_since_last_activity: 20,
        }
    }
}

/// Raw load inputs for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadFactors {
    pub active_requests: usize,
    pub response_time_days: f64,
    pub interview_load: u32,
    pub days_since_last_activity: u32,
}

impl LoadFactors {
    pub fn value(&self, kind: LoadFactorKind) -> f64 {
        match kind {
            LoadFactorKind::ActiveRequests => self.active_requests as f64,
            LoadFactorKind::ResponseTime => self.response_time_days,
            LoadFactorKind::InterviewLoad => f64::from(self.interview_load),
            LoadFactorKind::DaysSinceLastActivity => f64::from(self.days_since_last_activity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub factor: LoadFactorKind,
    pub label: &'static str,
    pub description: &'static str,
    pub raw_value: f64,
    pub normalized: f64,
    pub weight: u32,
}

/// Per-factor contributions plus their weighted mean on a 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorBreakdown {
    pub contributions: Vec<FactorContribution>,
    pub weighted_index: f64,
}

impl FactorBreakdown {
    pub fn from_factors(factors: &LoadFactors) -> Self {
        Self::weighted(factors, &FactorWeights::default())
    }

    pub fn weighted(factors: &LoadFactors, weights: &FactorWeights) -> Self {
        let contributions: Vec<FactorContribution> = LoadFactorKind::ordered()
            .into_iter()
            .map(|kind| {
                let raw_value = factors.value(kind);
                FactorContribution {
                    factor: kind,
                    label: kind.label(),
                    description: kind.description(),
                    raw_value,
                    normalized: normalize(raw_value),
                    weight: weights.weight(kind),
                }
            })
            .collect();

        let total_weight: u32 = contributions.iter().map(|entry| entry.weight).sum();
        let weighted_index = if total_weight == 0 {
            0.0
        } else {
            contributions
                .iter()
                .map(|entry| entry.normalized * f64::from(entry.weight))
                .sum::<f64>()
                / f64::from(total_weight)
        };

        Self {
            contributions,
            weighted_index,
        }
    }
}

fn normalize(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, FACTOR_SCALE)
}
