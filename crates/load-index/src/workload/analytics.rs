use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Employee, EmployeeLanguage};
use super::engine::LoadStatus;

/// Head count and average index for one language group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub language: EmployeeLanguage,
    pub average_index: f64,
    pub employee_count: usize,
}

/// Team-wide workload statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAnalytics {
    pub total_employees: usize,
    pub available: usize,
    pub busy: usize,
    pub overloaded: usize,
    pub average_index: f64,
    pub average_response_time: f64,
    pub average_planned_interviews: f64,
    pub total_active_requests: usize,
    /// Share of the team that is busy or overloaded, 0-100.
    pub load_percentage: f64,
    pub language_stats: Vec<LanguageStats>,
}

impl TeamAnalytics {
    pub fn count_for(&self, status: LoadStatus) -> usize {
        match status {
            LoadStatus::Available => self.available,
            LoadStatus::Busy => self.busy,
            LoadStatus::Overloaded => self.overloaded,
        }
    }
}

#[derive(Default)]
struct LanguageAccumulator {
    index_sum: f64,
    count: usize,
}

/// Aggregate statistics over `employees`. An empty slice yields zeros.
pub fn aggregate_team_stats(employees: &[Employee]) -> TeamAnalytics {
    if employees.is_empty() {
        return TeamAnalytics::default();
    }

    let mut analytics = TeamAnalytics {
        total_employees: employees.len(),
        ..TeamAnalytics::default()
    };
    let mut index_sum = 0.0;
    let mut response_time_sum = 0.0;
    let mut interview_sum = 0u64;
    let mut by_language: BTreeMap<EmployeeLanguage, LanguageAccumulator> = BTreeMap::new();

    for employee in employees {
        let score = employee.score();
        match score.status() {
            LoadStatus::Available => analytics.available += 1,
            LoadStatus::Busy => analytics.busy += 1,
            LoadStatus::Overloaded => analytics.overloaded += 1,
        }
        index_sum += score.current_index();
        response_time_sum += employee.response_time_days();
        interview_sum += u64::from(employee.planned_interviews());
        analytics.total_active_requests += employee.active_requests().len();

        let entry = by_language.entry(employee.language()).or_default();
        entry.index_sum += score.current_index();
        entry.count += 1;
    }

    let total = employees.len() as f64;
    analytics.average_index = index_sum / total;
    analytics.average_response_time = response_time_sum / total;
    analytics.average_planned_interviews = interview_sum as f64 / total;
    analytics.load_percentage = (analytics.busy + analytics.overloaded) as f64 / total * 100.0;
    analytics.language_stats = by_language
        .into_iter()
        .map(|(language, totals)| LanguageStats {
            language,
            average_index: totals.index_sum / totals.count as f64,
            employee_count: totals.count,
        })
        .collect();

    analytics
}
