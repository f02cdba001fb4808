//! CSV roster import.
//!
//! Expected headers: `name, rate, language, active_projects,
//! planned_interviews, response_time_days, skills`. List columns are
//! `;`-separated.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{
    normalize_skills, EmployeeLanguage, EmployeeRate, NewEmployee, NewProjectRequest,
    ProjectStatus, UnknownVariant,
};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, source: UnknownVariant },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Row { line, source } => {
                write!(f, "roster line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Row { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        imported_on: NaiveDate,
    ) -> Result<Vec<NewEmployee>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, imported_on)
    }

    /// Parse drafts; every listed project is recorded as submitted on
    /// `imported_on`.
    pub fn from_reader<R: Read>(
        reader: R,
        imported_on: NaiveDate,
    ) -> Result<Vec<NewEmployee>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut drafts = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |position| position.line());
            let row: RosterRow = record.deserialize(Some(&headers))?;
            drafts.push(
                row.into_draft(imported_on)
                    .map_err(|source| RosterImportError::Row { line, source })?,
            );
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    rate: String,
    language: String,
    #[serde(default, deserialize_with = "split_list")]
    active_projects: Vec<String>,
    #[serde(default)]
    planned_interviews: Option<u32>,
    #[serde(default)]
    response_time_days: Option<f64>,
    #[serde(default, deserialize_with = "split_list")]
    skills: Vec<String>,
}

impl RosterRow {
    fn into_draft(self, imported_on: NaiveDate) -> Result<NewEmployee, UnknownVariant> {
        let rate: EmployeeRate = self.rate.parse()?;
        let language: EmployeeLanguage = self.language.parse()?;
        let active_requests = self
            .active_projects
            .into_iter()
            .map(|name| NewProjectRequest {
                name,
                submitted_at: imported_on,
                status: ProjectStatus::Submitted,
            })
            .collect();

        Ok(NewEmployee {
            name: self.name,
            rate,
            language,
            active_requests,
            planned_interviews: self.planned_interviews.unwrap_or(0),
            response_time_days: self.response_time_days.unwrap_or(1.0),
            last_activity: Some(imported_on),
            skills: normalize_skills(self.skills),
        })
    }
}

fn split_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect())
}
