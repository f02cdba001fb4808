use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::engine::{ClassificationError, LoadFactors, WorkloadEngine, WorkloadScore};

/// Identifier assigned when an employee is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

/// Seniority billed to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmployeeRate {
    #[serde(alias = "intern")]
    Intern,
    #[serde(alias = "junior")]
    Junior,
    #[serde(alias = "middle")]
    Middle,
    #[serde(alias = "senior")]
    Senior,
    #[serde(alias = "lead")]
    Lead,
}

impl EmployeeRate {
    pub const fn label(self) -> &'static str {
        match self {
            EmployeeRate::Intern => "Intern",
            EmployeeRate::Junior => "Junior",
            EmployeeRate::Middle => "Middle",
            EmployeeRate::Senior => "Senior",
            EmployeeRate::Lead => "Lead",
        }
    }
}

impl FromStr for EmployeeRate {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "intern" => Ok(EmployeeRate::Intern),
            "junior" => Ok(EmployeeRate::Junior),
            "middle" => Ok(EmployeeRate::Middle),
            "senior" => Ok(EmployeeRate::Senior),
            "lead" => Ok(EmployeeRate::Lead),
            _ => Err(UnknownVariant::new("rate", value)),
        }
    }
}

/// Primary programming language, used for filtering and per-language stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmployeeLanguage {
    #[serde(rename = "Java", alias = "java")]
    Java,
    #[serde(rename = "C#", alias = "csharp")]
    CSharp,
    #[serde(rename = "JS/TS", alias = "js_ts")]
    JsTs,
    #[serde(rename = "Python", alias = "python")]
    Python,
}

impl EmployeeLanguage {
    pub const fn ordered() -> [EmployeeLanguage; 4] {
        [
            EmployeeLanguage::Java,
            EmployeeLanguage::CSharp,
            EmployeeLanguage::JsTs,
            EmployeeLanguage::Python,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            EmployeeLanguage::Java => "Java",
            EmployeeLanguage::CSharp => "C#",
            EmployeeLanguage::JsTs => "JS/TS",
            EmployeeLanguage::Python => "Python",
        }
    }
}

impl FromStr for EmployeeLanguage {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(EmployeeLanguage::Java),
            "c#" | "csharp" | "c-sharp" => Ok(EmployeeLanguage::CSharp),
            "js/ts" | "js_ts" | "js" | "ts" | "javascript" | "typescript" => {
                Ok(EmployeeLanguage::JsTs)
            }
            "python" | "py" => Ok(EmployeeLanguage::Python),
            _ => Err(UnknownVariant::new("language", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.trim().to_string(),
        }
    }
}

/// Review state of a submitted project request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Submitted,
    WaitingFeedback,
    PassedStage,
    Rejected,
    NoUpdates,
}

impl ProjectStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProjectStatus::Submitted => "Submitted",
            ProjectStatus::WaitingFeedback => "Waiting feedback",
            ProjectStatus::PassedStage => "Passed stage",
            ProjectStatus::Rejected => "Rejected",
            ProjectStatus::NoUpdates => "No updates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub id: ProjectId,
    pub name: String,
    pub submitted_at: NaiveDate,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Project request as supplied by a caller, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProjectRequest {
    pub name: String,
    pub submitted_at: NaiveDate,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Creation payload. The index and status are never accepted from callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub rate: EmployeeRate,
    pub language: EmployeeLanguage,
    #[serde(default)]
    pub active_requests: Vec<NewProjectRequest>,
    #[serde(default)]
    pub planned_interviews: u32,
    #[serde(default = "default_response_time")]
    pub response_time_days: f64,
    #[serde(default)]
    pub last_activity: Option<NaiveDate>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_response_time(self.response_time_days)?;
        self.active_requests
            .iter()
            .try_for_each(|project| validate_project_name(&project.name))
    }
}

/// Partial update. Absent fields are left untouched; unknown keys such as
/// `current_index` or `status` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rate: Option<EmployeeRate>,
    #[serde(default)]
    pub language: Option<EmployeeLanguage>,
    #[serde(default)]
    pub active_requests: Option<Vec<ProjectRequest>>,
    #[serde(default)]
    pub planned_interviews: Option<u32>,
    #[serde(default)]
    pub response_time_days: Option<f64>,
    #[serde(default)]
    pub last_activity: Option<NaiveDate>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

impl EmployeePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(response_time) = self.response_time_days {
            validate_response_time(response_time)?;
        }
        if let Some(projects) = &self.active_requests {
            projects
                .iter()
                .try_for_each(|project| validate_project_name(&project.name))?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &EmployeePatch::default()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("employee name must contain at least 2 characters")]
    NameTooShort,
    #[error("response time must be a positive number of days, got {0}")]
    InvalidResponseTime(f64),
    #[error("project name cannot be empty")]
    EmptyProjectName,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

fn validate_response_time(days: f64) -> Result<(), ValidationError> {
    if !days.is_finite() || days <= 0.0 {
        return Err(ValidationError::InvalidResponseTime(days));
    }
    Ok(())
}

pub(crate) fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyProjectName);
    }
    Ok(())
}

fn default_response_time() -> f64 {
    1.0
}

/// Trims tags, drops blanks and repeats, keeps first-seen order.
pub fn normalize_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for skill in skills {
        let trimmed = skill.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if normalized
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(trimmed))
        {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

/// Employee with a derived workload score.
///
/// Fields are private so every mutation goes through a method that rescores
/// the record; deserialization also recomputes the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EmployeeWire")]
pub struct Employee {
    id: EmployeeId,
    name: String,
    rate: EmployeeRate,
    language: EmployeeLanguage,
    active_requests: Vec<ProjectRequest>,
    planned_interviews: u32,
    response_time_days: f64,
    last_activity: NaiveDate,
    skills: Vec<String>,
    #[serde(flatten)]
    score: WorkloadScore,
}

impl Employee {
    pub fn create(
        id: EmployeeId,
        draft: NewEmployee,
        today: NaiveDate,
        engine: &WorkloadEngine,
    ) -> Result<Self, ClassificationError> {
        let active_requests: Vec<ProjectRequest> = draft
            .active_requests
            .into_iter()
            .zip(1u64..)
            .map(|(project, id)| ProjectRequest {
                id: ProjectId(id),
                name: project.name.trim().to_string(),
                submitted_at: project.submitted_at,
                status: project.status,
            })
            .collect();
        let score = engine.score(active_requests.len())?;

        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            rate: draft.rate,
            language: draft.language,
            active_requests,
            planned_interviews: draft.planned_interviews,
            response_time_days: draft.response_time_days,
            last_activity: draft.last_activity.unwrap_or(today),
            skills: normalize_skills(draft.skills),
            score,
        })
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rate(&self) -> EmployeeRate {
        self.rate
    }

    pub fn language(&self) -> EmployeeLanguage {
        self.language
    }

    pub fn active_requests(&self) -> &[ProjectRequest] {
        &self.active_requests
    }

    pub fn planned_interviews(&self) -> u32 {
        self.planned_interviews
    }

    pub fn response_time_days(&self) -> f64 {
        self.response_time_days
    }

    pub fn last_activity(&self) -> NaiveDate {
        self.last_activity
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn score(&self) -> WorkloadScore {
        self.score
    }

    /// Apply a partial update and rescore. On error the record is unchanged.
    pub fn apply(
        &mut self,
        patch: EmployeePatch,
        engine: &WorkloadEngine,
    ) -> Result<(), ClassificationError> {
        let request_count = patch
            .active_requests
            .as_ref()
            .map_or(self.active_requests.len(), Vec::len);
        let score = engine.score(request_count)?;

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(active_requests) = patch.active_requests {
            self.active_requests = active_requests;
        }
        if let Some(planned_interviews) = patch.planned_interviews {
            self.planned_interviews = planned_interviews;
        }
        if let Some(response_time_days) = patch.response_time_days {
            self.response_time_days = response_time_days;
        }
        if let Some(last_activity) = patch.last_activity {
            self.last_activity = last_activity;
        }
        if let Some(skills) = patch.skills {
            self.skills = normalize_skills(skills);
        }
        self.score = score;
        Ok(())
    }

    /// Append a project request with the next free project id and rescore.
    pub fn assign_project(
        &mut self,
        project: NewProjectRequest,
        engine: &WorkloadEngine,
    ) -> Result<&ProjectRequest, ClassificationError> {
        let score = engine.score(self.active_requests.len() + 1)?;
        let next_id = self
            .active_requests
            .iter()
            .map(|existing| existing.id.0)
            .max()
            .unwrap_or(0)
            + 1;

        self.active_requests.push(ProjectRequest {
            id: ProjectId(next_id),
            name: project.name.trim().to_string(),
            submitted_at: project.submitted_at,
            status: project.status,
        });
        self.score = score;

        Ok(&self.active_requests[self.active_requests.len() - 1])
    }

    /// Recompute the score under `engine`. Deserialized records carry the
    /// standard engine's score, so holders of a custom engine rescore them.
    pub fn rescore(&mut self, engine: &WorkloadEngine) -> Result<(), ClassificationError> {
        self.score = engine.score(self.active_requests.len())?;
        Ok(())
    }

    pub fn load_factors(&self, today: NaiveDate) -> LoadFactors {
        let days_since_last_activity = (today - self.last_activity).num_days().max(0);
        LoadFactors {
            active_requests: self.active_requests.len(),
            response_time_days: self.response_time_days,
            interview_load: self.planned_interviews,
            days_since_last_activity: u32::try_from(days_since_last_activity).unwrap_or(u32::MAX),
        }
    }

    /// Case-insensitive match against name, rate and language.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.rate.label().to_lowercase().contains(&needle)
            || self.language.label().to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Deserialize)]
struct EmployeeWire {
    id: EmployeeId,
    name: String,
    rate: EmployeeRate,
    language: EmployeeLanguage,
    #[serde(default)]
    active_requests: Vec<ProjectRequest>,
    #[serde(default)]
    planned_interviews: u32,
    #[serde(default = "default_response_time")]
    response_time_days: f64,
    last_activity: NaiveDate,
    #[serde(default)]
    skills: Vec<String>,
}

/// Wire records are scored with [`WorkloadEngine::default`]; see
/// [`Employee::rescore`] for other engines.
impl TryFrom<EmployeeWire> for Employee {
    type Error = ClassificationError;

    fn try_from(wire: EmployeeWire) -> Result<Self, Self::Error> {
        let score = WorkloadEngine::default().score(wire.active_requests.len())?;
        Ok(Self {
            id: wire.id,
            name: wire.name,
            rate: wire.rate,
            language: wire.language,
            active_requests: wire.active_requests,
            planned_interviews: wire.planned_interviews,
            response_time_days: wire.response_time_days,
            last_activity: wire.last_activity,
            skills: normalize_skills(wire.skills),
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::engine::{LoadStatus, SaturatingRule, ThresholdTable};
    use serde_json::json;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
    }

    fn project(name: &str, day: u32) -> NewProjectRequest {
        NewProjectRequest {
            name: name.to_string(),
            submitted_at: date(day),
            status: ProjectStatus::Submitted,
        }
    }

    fn draft() -> NewEmployee {
        NewEmployee {
            name: "  Ivan Petrov ".to_string(),
            rate: EmployeeRate::Senior,
            language: EmployeeLanguage::JsTs,
            active_requests: vec![project("Checkout revamp", 1)],
            planned_interviews: 1,
            response_time_days: 1.2,
            last_activity: None,
            skills: vec![
                "Playwright".to_string(),
                " PyTest".to_string(),
                "playwright".to_string(),
                "".to_string(),
            ],
        }
    }

    #[test]
    fn create_scores_and_normalizes_the_draft() {
        let engine = WorkloadEngine::default();
        let employee =
            Employee::create(EmployeeId(7), draft(), date(10), &engine).expect("scored");

        assert_eq!(employee.name(), "Ivan Petrov");
        assert_eq!(employee.last_activity(), date(10));
        assert_eq!(employee.skills(), ["Playwright", "PyTest"]);
        assert_eq!(employee.active_requests()[0].id, ProjectId(1));
        assert_eq!(employee.score().current_index(), 1.2);
        assert_eq!(employee.score().status(), LoadStatus::Busy);
    }

    #[test]
    fn patching_requests_rescores_the_employee() {
        let engine = WorkloadEngine::default();
        let mut employee =
            Employee::create(EmployeeId(7), draft(), date(10), &engine).expect("scored");

        employee
            .apply(
                EmployeePatch {
                    active_requests: Some(Vec::new()),
                    ..EmployeePatch::default()
                },
                &engine,
            )
            .expect("rescored");

        assert_eq!(employee.score().current_index(), 0.0);
        assert_eq!(employee.score().status(), LoadStatus::Available);
    }

    #[test]
    fn assigning_projects_uses_next_id_and_rescores() {
        let engine = WorkloadEngine::default();
        let mut employee =
            Employee::create(EmployeeId(7), draft(), date(10), &engine).expect("scored");

        let assigned = employee
            .assign_project(project("Data migration", 5), &engine)
            .expect("assigned")
            .clone();

        assert_eq!(assigned.id, ProjectId(2));
        assert_eq!(employee.score().current_index(), 2.4);
        assert_eq!(employee.score().status(), LoadStatus::Overloaded);
    }

    #[test]
    fn wire_payloads_cannot_smuggle_a_score() {
        let payload = json!({
            "id": 3,
            "name": "Elena Smirnova",
            "rate": "Junior",
            "language": "Java",
            "active_requests": [
                { "id": 1, "name": "A", "submitted_at": "2024-06-01", "status": "submitted" },
                { "id": 2, "name": "B", "submitted_at": "2024-06-02", "status": "waiting_feedback" },
                { "id": 3, "name": "C", "submitted_at": "2024-06-03", "status": "no_updates" }
            ],
            "planned_interviews": 1,
            "last_activity": "2024-06-03",
            "current_index": 0.0,
            "status": "available"
        });

        let employee: Employee = serde_json::from_value(payload).expect("valid payload");
        assert_eq!(employee.score().current_index(), 3.0);
        assert_eq!(employee.score().status(), LoadStatus::Overloaded);
    }

    #[test]
    fn rescore_applies_a_custom_engine() {
        let mut employee: Employee = serde_json::from_value(json!({
            "id": 4,
            "name": "Ivan Petrov",
            "rate": "Senior",
            "language": "JS/TS",
            "active_requests": [
                { "id": 1, "name": "Checkout", "submitted_at": "2024-06-01", "status": "submitted" }
            ],
            "planned_interviews": 0,
            "last_activity": "2024-06-03"
        }))
        .expect("valid payload");
        assert_eq!(employee.score().status(), LoadStatus::Busy);

        let lenient = WorkloadEngine::new(
            SaturatingRule {
                per_request: 0.5,
                ceiling: 3.0,
            },
            ThresholdTable::standard(),
        );
        employee.rescore(&lenient).expect("rescored");

        assert_eq!(employee.score().current_index(), 0.5);
        assert_eq!(employee.score().status(), LoadStatus::Available);
    }

    #[test]
    fn serialized_employee_exposes_derived_fields() {
        let engine = WorkloadEngine::default();
        let employee =
            Employee::create(EmployeeId(7), draft(), date(10), &engine).expect("scored");
        let value = serde_json::to_value(&employee).expect("serializes");

        assert_eq!(value["id"], json!(7));
        assert_eq!(value["language"], json!("JS/TS"));
        assert_eq!(value["current_index"], json!(1.2));
        assert_eq!(value["status"], json!("busy"));
    }

    #[test]
    fn search_matches_name_rate_and_language() {
        let engine = WorkloadEngine::default();
        let employee =
            Employee::create(EmployeeId(7), draft(), date(10), &engine).expect("scored");

        assert!(employee.matches_search("petrov"));
        assert!(employee.matches_search("SENIOR"));
        assert!(employee.matches_search("js/"));
        assert!(employee.matches_search("  "));
        assert!(!employee.matches_search("python"));
    }

    #[test]
    fn validation_rejects_bad_drafts() {
        let mut short = draft();
        short.name = " A ".to_string();
        assert_eq!(short.validate(), Err(ValidationError::NameTooShort));

        let mut slow = draft();
        slow.response_time_days = 0.0;
        assert!(matches!(
            slow.validate(),
            Err(ValidationError::InvalidResponseTime(_))
        ));

        let mut unnamed = draft();
        unnamed.active_requests.push(project("  ", 2));
        assert_eq!(unnamed.validate(), Err(ValidationError::EmptyProjectName));
    }

    #[test]
    fn load_factors_count_days_since_activity() {
        let engine = WorkloadEngine::default();
        let mut draft = draft();
        draft.last_activity = Some(date(3));
        let employee = Employee::create(EmployeeId(7), draft, date(10), &engine).expect("scored");

        let factors = employee.load_factors(date(10));
        assert_eq!(factors.active_requests, 1);
        assert_eq!(factors.days_since_last_activity, 7);
        assert_eq!(employee.load_factors(date(1)).days_since_last_activity, 0);
    }

    #[test]
    fn languages_and_rates_parse_leniently() {
        assert_eq!("c#".parse::<EmployeeLanguage>(), Ok(EmployeeLanguage::CSharp));
        assert_eq!("TypeScript".parse::<EmployeeLanguage>(), Ok(EmployeeLanguage::JsTs));
        assert_eq!(" lead ".parse::<EmployeeRate>(), Ok(EmployeeRate::Lead));
        assert!("Rust".parse::<EmployeeLanguage>().is_err());
    }
}
