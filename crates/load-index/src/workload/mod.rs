//! Employee workload tracking: the index engine, the roster service over an
//! injected repository, its HTTP router, and the matching REST client.

pub mod analytics;
pub mod client;
pub mod domain;
pub mod engine;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analytics::{aggregate_team_stats, LanguageStats, TeamAnalytics};
pub use client::{ClientError, EmployeeClient};
pub use domain::{
    Employee, EmployeeId, EmployeeLanguage, EmployeePatch, EmployeeRate, NewEmployee,
    NewProjectRequest, ProjectId, ProjectRequest, ProjectStatus, ValidationError,
};
pub use engine::{
    classify_status, compute_index, ClassificationError, FactorBreakdown, LoadStatus,
    StatusThreshold, ThresholdError, ThresholdTable, WorkloadEngine, WorkloadScore,
};
pub use import::{RosterImportError, RosterImporter};
pub use repository::{EmployeeRepository, RepositoryError};
pub use router::employee_router;
pub use service::{
    EmployeeDetail, EmployeeQuery, EmployeeService, EmployeeServiceError, EmployeeSort,
};
