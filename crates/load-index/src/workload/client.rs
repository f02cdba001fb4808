//! REST client for the employee roster API.
//!
//! The roster list is cached for the configured stale window and dropped on
//! every successful mutation. A failed list fetch is retried once right away.
//! A fetch that overlaps a mutation is returned to its caller but not cached.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::analytics::TeamAnalytics;
use super::domain::{Employee, EmployeeId, EmployeePatch, NewEmployee, NewProjectRequest};
use super::engine::{ClassificationError, WorkloadEngine};
use crate::config::ClientConfig;

struct CachedRoster {
    fetched_at: Instant,
    employees: Vec<Employee>,
}

/// Cached roster plus a generation bumped on every invalidation.
#[derive(Default)]
struct RosterCache {
    generation: u64,
    roster: Option<CachedRoster>,
}

pub struct EmployeeClient {
    http: reqwest::Client,
    base_url: String,
    stale_after: Duration,
    engine: WorkloadEngine,
    cache: Mutex<RosterCache>,
}

impl EmployeeClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_engine(config, WorkloadEngine::default())
    }

    /// Client that rescores every received employee with `engine`, matching
    /// a server built with the same engine.
    pub fn with_engine(
        config: &ClientConfig,
        engine: WorkloadEngine,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stale_after: config.stale_after,
            engine,
            cache: Mutex::new(RosterCache::default()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn rescored(&self, mut employee: Employee) -> Result<Employee, ClientError> {
        employee.rescore(&self.engine)?;
        Ok(employee)
    }

    async fn decode_employee(&self, response: reqwest::Response) -> Result<Employee, ClientError> {
        let employee = decode(response).await?;
        self.rescored(employee)
    }

    /// Full roster, served from cache while it is fresh.
    pub async fn list(&self) -> Result<Vec<Employee>, ClientError> {
        let generation = {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.roster.as_ref() {
                if cached.fetched_at.elapsed() < self.stale_after {
                    debug!(count = cached.employees.len(), "serving cached roster");
                    return Ok(cached.employees.clone());
                }
            }
            cache.generation
        };

        let employees = match self.fetch_roster().await {
            Ok(employees) => employees,
            Err(error) => {
                warn!(%error, "roster fetch failed, retrying once");
                self.fetch_roster().await?
            }
        };

        let mut cache = self.cache.lock().await;
        if cache.generation == generation {
            cache.roster = Some(CachedRoster {
                fetched_at: Instant::now(),
                employees: employees.clone(),
            });
        } else {
            debug!("roster changed during fetch, not caching");
        }
        Ok(employees)
    }

    async fn fetch_roster(&self) -> Result<Vec<Employee>, ClientError> {
        let response = self.http.get(self.url("/employees")).send().await?;
        let employees: Vec<Employee> = decode(response).await?;
        employees
            .into_iter()
            .map(|employee| self.rescored(employee))
            .collect()
    }

    pub async fn get(&self, id: EmployeeId) -> Result<Employee, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/employees/{id}")))
            .send()
            .await?;
        self.decode_employee(response).await
    }

    pub async fn create(&self, draft: &NewEmployee) -> Result<Employee, ClientError> {
        let response = self
            .http
            .post(self.url("/employees"))
            .json(draft)
            .send()
            .await?;
        let employee = self.decode_employee(response).await?;
        self.invalidate().await;
        Ok(employee)
    }

    pub async fn update(
        &self,
        id: EmployeeId,
        patch: &EmployeePatch,
    ) -> Result<Employee, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/employees/{id}")))
            .json(patch)
            .send()
            .await?;
        let employee = self.decode_employee(response).await?;
        self.invalidate().await;
        Ok(employee)
    }

    pub async fn assign_project(
        &self,
        id: EmployeeId,
        project: &NewProjectRequest,
    ) -> Result<Employee, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/employees/{id}/projects")))
            .json(project)
            .send()
            .await?;
        let employee = self.decode_employee(response).await?;
        self.invalidate().await;
        Ok(employee)
    }

    pub async fn delete(&self, id: EmployeeId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/employees/{id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        self.invalidate().await;
        Ok(())
    }

    pub async fn analytics(&self) -> Result<TeamAnalytics, ClientError> {
        let response = self.http.get(self.url("/analytics/team")).send().await?;
        decode(response).await
    }

    /// Drop the cached roster so the next `list` refetches.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        cache.generation = cache.generation.wrapping_add(1);
        cache.roster = None;
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    Ok(response.json().await?)
}

async fn status_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Scoring(#[from] ClassificationError),
}
