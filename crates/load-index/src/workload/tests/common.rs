use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workload::domain::{
    Employee, EmployeeId, EmployeeLanguage, EmployeeRate, NewEmployee, NewProjectRequest,
    ProjectStatus,
};
use crate::workload::repository::{EmployeeRepository, RepositoryError};
use crate::workload::{employee_router, EmployeeService};

pub(super) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

pub(super) fn project(name: &str) -> NewProjectRequest {
    NewProjectRequest {
        name: name.to_string(),
        submitted_at: date(6, 1),
        status: ProjectStatus::Submitted,
    }
}

pub(super) fn draft(name: &str, language: EmployeeLanguage, projects: usize) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        rate: EmployeeRate::Senior,
        language,
        active_requests: (0..projects)
            .map(|n| project(&format!("Project {n}")))
            .collect(),
        planned_interviews: 1,
        response_time_days: 1.5,
        last_activity: Some(date(6, 3)),
        skills: vec!["Playwright".to_string(), "PyTest".to_string()],
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<BTreeMap<EmployeeId, Employee>>,
}

impl MemoryRepository {
    pub(super) fn snapshot(&self) -> Vec<Employee> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl EmployeeRepository for MemoryRepository {
    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.snapshot())
    }

    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&employee.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(employee.id(), employee.clone());
        Ok(employee)
    }

    fn update(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&employee.id()) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(employee.id(), employee.clone());
        Ok(employee)
    }

    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct ConflictRepository;

impl EmployeeRepository for ConflictRepository {
    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(Vec::new())
    }

    fn fetch(&self, _id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(None)
    }

    fn insert(&self, _employee: Employee) -> Result<Employee, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _employee: Employee) -> Result<Employee, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn delete(&self, _id: EmployeeId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl EmployeeRepository for UnavailableRepository {
    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _employee: Employee) -> Result<Employee, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _employee: Employee) -> Result<Employee, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: EmployeeId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (EmployeeService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = EmployeeService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(service: EmployeeService<MemoryRepository>) -> axum::Router {
    employee_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
