use super::domain::{Employee, EmployeeId};

/// Storage abstraction injected into the employee service.
///
/// `update` replaces the stored record outright; concurrent writers resolve
/// as last write wins.
pub trait EmployeeRepository: Send + Sync {
    fn list(&self) -> Result<Vec<Employee>, RepositoryError>;
    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn update(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("employee already exists")]
    Conflict,
    #[error("employee not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
