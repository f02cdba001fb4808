//! Workload index computation and status classification.
//!
//! The canonical rule is saturating-linear on the number of active requests:
//! `min(count * 1.2, 3.0)`, classified against [`ThresholdTable::standard`].
//! The weighted four-factor index in [`factors`] is informational only and
//! never feeds the status.

pub mod factors;
mod thresholds;

pub use factors::{FactorBreakdown, FactorContribution, LoadFactorKind, LoadFactors};
pub use thresholds::{
    classify_status, ClassificationError, LoadStatus, StatusThreshold, ThresholdError,
    ThresholdTable,
};

use serde::{Deserialize, Serialize};

pub const REQUEST_WEIGHT: f64 = 1.2;
pub const INDEX_CEILING: f64 = 3.0;

/// Saturating linear rule parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaturatingRule {
    pub per_request: f64,
    pub ceiling: f64,
}

impl SaturatingRule {
    pub fn index(&self, active_requests: usize) -> f64 {
        (active_requests as f64 * self.per_request).min(self.ceiling)
    }
}

impl Default for SaturatingRule {
    fn default() -> Self {
        Self {
            per_request: REQUEST_WEIGHT,
            ceiling: INDEX_CEILING,
        }
    }
}

/// `min(active_requests * 1.2, 3.0)`.
pub fn compute_index(active_requests: usize) -> f64 {
    SaturatingRule::default().index(active_requests)
}

/// Derived load score. Only [`WorkloadEngine`] can build one, so `status`
/// always matches `current_index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkloadScore {
    current_index: f64,
    status: LoadStatus,
}

impl WorkloadScore {
    pub fn current_index(&self) -> f64 {
        self.current_index
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }
}

/// Stateless scorer pairing the index rule with a threshold table.
#[derive(Debug, Clone, Default)]
pub struct WorkloadEngine {
    rule: SaturatingRule,
    thresholds: ThresholdTable,
}

impl WorkloadEngine {
    pub fn new(rule: SaturatingRule, thresholds: ThresholdTable) -> Self {
        Self { rule, thresholds }
    }

    pub fn rule(&self) -> SaturatingRule {
        self.rule
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn score(&self, active_requests: usize) -> Result<WorkloadScore, ClassificationError> {
        let current_index = self.rule.index(active_requests);
        let status = self.thresholds.classify(current_index)?;
        Ok(WorkloadScore {
            current_index,
            status,
        })
    }
}
