use serde::{Deserialize, Serialize};

/// Three-bucket workload classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Available,
    Busy,
    Overloaded,
}

impl LoadStatus {
    pub const fn ordered() -> [LoadStatus; 3] {
        [
            LoadStatus::Available,
            LoadStatus::Busy,
            LoadStatus::Overloaded,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoadStatus::Available => "available",
            LoadStatus::Busy => "busy",
            LoadStatus::Overloaded => "overloaded",
        }
    }

    /// Dashboard color used for badges and cards.
    pub const fn color(self) -> &'static str {
        match self {
            LoadStatus::Available => "green",
            LoadStatus::Busy => "yellow",
            LoadStatus::Overloaded => "red",
        }
    }
}

/// One `[min, max)` bucket of the threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThreshold {
    pub min: f64,
    pub max: f64,
    pub status: LoadStatus,
}

impl StatusThreshold {
    pub const fn new(min: f64, max: f64, status: LoadStatus) -> Self {
        Self { min, max, status }
    }
}

/// Ordered, gap-free set of buckets covering `[first.min, last.max]`.
///
/// Every bucket is closed on the lower bound and open on the upper bound,
/// except the last one which also includes its upper bound. Only the last
/// bucket may use `f64::INFINITY` as its upper bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    buckets: Vec<StatusThreshold>,
}

impl ThresholdTable {
    pub fn new(buckets: Vec<StatusThreshold>) -> Result<Self, ThresholdError> {
        if buckets.is_empty() {
            return Err(ThresholdError::Empty);
        }

        let last = buckets.len() - 1;
        for (position, bucket) in buckets.iter().enumerate() {
            let max_ok = bucket.max.is_finite()
                || (position == last && bucket.max == f64::INFINITY);
            if !bucket.min.is_finite() || !max_ok || bucket.min >= bucket.max {
                return Err(ThresholdError::Inverted {
                    status: bucket.status,
                    min: bucket.min,
                    max: bucket.max,
                });
            }
        }

        for pair in buckets.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if next.min > previous.max {
                return Err(ThresholdError::Gap {
                    from: previous.max,
                    to: next.min,
                });
            }
            if next.min < previous.max {
                return Err(ThresholdError::Overlap {
                    first: previous.status,
                    second: next.status,
                    at: next.min,
                });
            }
        }

        Ok(Self { buckets })
    }

    /// `[0, 1)` available, `[1, 2)` busy, `[2, inf)` overloaded.
    pub fn standard() -> Self {
        Self {
            buckets: vec![
                StatusThreshold::new(0.0, 1.0, LoadStatus::Available),
                StatusThreshold::new(1.0, 2.0, LoadStatus::Busy),
                StatusThreshold::new(2.0, f64::INFINITY, LoadStatus::Overloaded),
            ],
        }
    }

    pub fn buckets(&self) -> &[StatusThreshold] {
        &self.buckets
    }

    pub fn classify(&self, index: f64) -> Result<LoadStatus, ClassificationError> {
        let last = self.buckets.len() - 1;
        self.buckets
            .iter()
            .enumerate()
            .find(|(position, bucket)| {
                if *position == last {
                    bucket.min <= index && index <= bucket.max
                } else {
                    bucket.min <= index && index < bucket.max
                }
            })
            .map(|(_, bucket)| bucket.status)
            .ok_or(ClassificationError::OutOfRange {
                index,
                min: self.buckets[0].min,
                max: self.buckets[last].max,
            })
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Classify `index` against `thresholds`.
pub fn classify_status(
    index: f64,
    thresholds: &ThresholdTable,
) -> Result<LoadStatus, ClassificationError> {
    thresholds.classify(index)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    #[error("workload index {index} is outside the threshold table range [{min}, {max}]")]
    OutOfRange { index: f64, min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("threshold table must contain at least one bucket")]
    Empty,
    #[error("bucket for {status:?} has an invalid range [{min}, {max})")]
    Inverted {
        status: LoadStatus,
        min: f64,
        max: f64,
    },
    #[error("threshold table leaves indexes in [{from}, {to}) unclassified")]
    Gap { from: f64, to: f64 },
    #[error("buckets {first:?} and {second:?} overlap at {at}")]
    Overlap {
        first: LoadStatus,
        second: LoadStatus,
        at: f64,
    },
}
