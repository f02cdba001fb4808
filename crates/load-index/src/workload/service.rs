use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::analytics::{aggregate_team_stats, TeamAnalytics};
use super::domain::{
    validate_project_name, Employee, EmployeeId, EmployeeLanguage, EmployeePatch, NewEmployee,
    NewProjectRequest, ValidationError,
};
use super::engine::{
    ClassificationError, FactorBreakdown, LoadStatus, WorkloadEngine, WorkloadScore,
};
use super::repository::{EmployeeRepository, RepositoryError};

/// Listing filters shared by the roster and analytics views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub language: Option<EmployeeLanguage>,
    #[serde(default)]
    pub status: Option<LoadStatus>,
    #[serde(default)]
    pub sort: EmployeeSort,
}

impl EmployeeQuery {
    pub fn matches(&self, employee: &Employee) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |term| employee.matches_search(term));
        let language_ok = self
            .language
            .map_or(true, |language| employee.language() == language);
        let status_ok = self
            .status
            .map_or(true, |status| employee.score().status() == status);
        search_ok && language_ok && status_ok
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSort {
    #[default]
    IndexDesc,
    IndexAsc,
    Name,
}

impl EmployeeSort {
    fn compare(self, left: &Employee, right: &Employee) -> CmpOrdering {
        let by_index = left
            .score()
            .current_index()
            .total_cmp(&right.score().current_index());
        let primary = match self {
            EmployeeSort::IndexDesc => by_index.reverse(),
            EmployeeSort::IndexAsc => by_index,
            EmployeeSort::Name => left.name().cmp(right.name()),
        };
        primary
            .then_with(|| left.name().cmp(right.name()))
            .then_with(|| left.id().cmp(&right.id()))
    }
}

/// Employee plus the weighted factor breakdown for the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
    pub breakdown: FactorBreakdown,
}

/// Millisecond-timestamp ids that never repeat within one service.
#[derive(Debug, Default)]
struct IdSequence {
    last: AtomicU64,
}

impl IdSequence {
    fn next(&self, now_millis: u64) -> EmployeeId {
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now_millis.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return EmployeeId(candidate),
                Err(observed) => current = observed,
            }
        }
    }
}

/// Service composing the repository and the workload engine. Every mutation
/// rescores the employee before it is stored.
pub struct EmployeeService<R> {
    repository: Arc<R>,
    engine: Arc<WorkloadEngine>,
    ids: IdSequence,
}

impl<R> EmployeeService<R>
where
    R: EmployeeRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_engine(repository, WorkloadEngine::default())
    }

    pub fn with_engine(repository: Arc<R>, engine: WorkloadEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            ids: IdSequence::default(),
        }
    }

    pub fn engine(&self) -> &WorkloadEngine {
        &self.engine
    }

    /// Validate, assign an id, score, and store a new employee.
    pub fn create(&self, draft: NewEmployee) -> Result<Employee, EmployeeServiceError> {
        draft.validate()?;
        let now = Utc::now();
        let id = self
            .ids
            .next(u64::try_from(now.timestamp_millis()).unwrap_or_default());
        let employee = Employee::create(id, draft, now.date_naive(), &self.engine)?;

        let stored = self.repository.insert(employee)?;
        info!(
            employee_id = %stored.id(),
            index = stored.score().current_index(),
            status = stored.score().status().label(),
            "employee created"
        );
        Ok(stored)
    }

    /// Apply a partial update and persist the rescored record.
    pub fn update(
        &self,
        id: EmployeeId,
        patch: EmployeePatch,
    ) -> Result<Employee, EmployeeServiceError> {
        patch.validate()?;
        let mut employee = self.get(id)?;
        employee.apply(patch, &self.engine)?;

        let stored = self.repository.update(employee)?;
        debug!(
            employee_id = %id,
            index = stored.score().current_index(),
            status = stored.score().status().label(),
            "employee updated"
        );
        Ok(stored)
    }

    /// Attach a new project request to an employee.
    pub fn assign_project(
        &self,
        id: EmployeeId,
        project: NewProjectRequest,
    ) -> Result<Employee, EmployeeServiceError> {
        validate_project_name(&project.name)?;
        let mut employee = self.get(id)?;
        let project_id = employee.assign_project(project, &self.engine)?.id;

        let stored = self.repository.update(employee)?;
        info!(
            employee_id = %id,
            project_id = project_id.0,
            active_requests = stored.active_requests().len(),
            "project assigned"
        );
        Ok(stored)
    }

    pub fn delete(&self, id: EmployeeId) -> Result<(), EmployeeServiceError> {
        self.repository.delete(id)?;
        info!(employee_id = %id, "employee removed");
        Ok(())
    }

    pub fn get(&self, id: EmployeeId) -> Result<Employee, EmployeeServiceError> {
        let employee = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(employee)
    }

    /// Filtered and sorted roster.
    pub fn list(&self, query: &EmployeeQuery) -> Result<Vec<Employee>, EmployeeServiceError> {
        let mut employees: Vec<Employee> = self
            .repository
            .list()?
            .into_iter()
            .filter(|employee| query.matches(employee))
            .collect();
        employees.sort_by(|left, right| query.sort.compare(left, right));
        Ok(employees)
    }

    pub fn analytics(&self, query: &EmployeeQuery) -> Result<TeamAnalytics, EmployeeServiceError> {
        let employees = self.list(query)?;
        Ok(aggregate_team_stats(&employees))
    }

    pub fn factor_breakdown(
        &self,
        id: EmployeeId,
        today: NaiveDate,
    ) -> Result<EmployeeDetail, EmployeeServiceError> {
        let employee = self.get(id)?;
        let breakdown = FactorBreakdown::from_factors(&employee.load_factors(today));
        Ok(EmployeeDetail {
            employee,
            breakdown,
        })
    }

    /// Score a hypothetical request count without touching storage.
    pub fn preview(&self, active_requests: usize) -> Result<WorkloadScore, EmployeeServiceError> {
        Ok(self.engine.score(active_requests)?)
    }
}

/// Error raised by the employee service.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scoring(#[from] ClassificationError),
}

impl EmployeeServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EmployeeServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EmployeeServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            EmployeeServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            EmployeeServiceError::Repository(RepositoryError::Unavailable(_))
            | EmployeeServiceError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
