use chrono::NaiveDate;
use load_index::error::AppError;
use load_index::workload::{
    Employee, EmployeeId, EmployeeRepository, EmployeeService, RepositoryError, RosterImporter,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local roster. Concurrent updates to the same employee are
/// last-write-wins.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEmployeeRepository {
    records: Arc<Mutex<HashMap<EmployeeId, Employee>>>,
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
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
        if guard.contains_key(&employee.id()) {
            guard.insert(employee.id(), employee.clone());
            Ok(employee)
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Load a CSV roster into `service`, returning how many employees were added.
pub(crate) fn seed_from_csv<R>(
    service: &EmployeeService<R>,
    path: &Path,
    imported_on: NaiveDate,
) -> Result<usize, AppError>
where
    R: EmployeeRepository + 'static,
{
    let drafts = RosterImporter::from_path(path, imported_on)?;
    let count = drafts.len();
    for draft in drafts {
        service.create(draft)?;
    }
    Ok(count)
}
