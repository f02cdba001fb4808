use crate::infra::{seed_from_csv, InMemoryEmployeeRepository};
use chrono::Local;
use clap::Args;
use load_index::config::AppConfig;
use load_index::error::AppError;
use load_index::workload::{
    Employee, EmployeeClient, EmployeeQuery, EmployeeService, EmployeeServiceError, LoadStatus,
    TeamAnalytics, WorkloadEngine, WorkloadScore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RosterReportArgs {
    /// CSV roster export to summarise
    #[arg(long, required_unless_present = "remote", conflicts_with = "remote")]
    pub(crate) roster: Option<PathBuf>,
    /// Summarise the roster served at APP_API_URL instead of a CSV export
    #[arg(long)]
    pub(crate) remote: bool,
    /// Include every employee, highest index first
    #[arg(long)]
    pub(crate) list: bool,
}

#[derive(Args, Debug)]
pub(crate) struct IndexArgs {
    /// Number of active project requests to score
    #[arg(long)]
    pub(crate) active_requests: usize,
}

pub(crate) async fn run_roster_report(args: RosterReportArgs) -> Result<(), AppError> {
    let RosterReportArgs {
        roster,
        remote,
        list,
    } = args;

    let (analytics, employees) = match roster {
        Some(path) if !remote => local_report(&path, list)?,
        _ => {
            let config = AppConfig::load()?;
            let client = EmployeeClient::new(&config.client)?;
            remote_report(&client, list).await?
        }
    };

    print!(
        "{}",
        render_roster_report(&analytics, employees.as_deref())
    );
    Ok(())
}

type ReportData = (TeamAnalytics, Option<Vec<Employee>>);

fn local_report(roster: &Path, list: bool) -> Result<ReportData, AppError> {
    let service = EmployeeService::new(Arc::new(InMemoryEmployeeRepository::default()));
    seed_from_csv(&service, roster, Local::now().date_naive())?;

    let query = EmployeeQuery::default();
    let analytics = service.analytics(&query)?;
    let employees = if list {
        Some(service.list(&query)?)
    } else {
        None
    };
    Ok((analytics, employees))
}

/// Report built from a running roster service.
async fn remote_report(client: &EmployeeClient, list: bool) -> Result<ReportData, AppError> {
    let analytics = client.analytics().await?;
    let employees = if list {
        Some(client.list().await?)
    } else {
        None
    };
    Ok((analytics, employees))
}

pub(crate) fn run_index_preview(args: IndexArgs) -> Result<(), AppError> {
    let engine = WorkloadEngine::default();
    let score = engine
        .score(args.active_requests)
        .map_err(EmployeeServiceError::from)?;
    println!("{}", render_index_preview(args.active_requests, &score));
    Ok(())
}

pub(crate) fn render_roster_report(
    analytics: &TeamAnalytics,
    employees: Option<&[Employee]>,
) -> String {
    let mut out = String::new();
    out.push_str("Team workload report\n");
    out.push_str(&format!(
        "Employees: {} (load {:.0}%)\n",
        analytics.total_employees, analytics.load_percentage
    ));
    out.push_str(&format!(
        "Average index: {:.2}, response time: {:.1} days, planned interviews: {:.1}\n",
        analytics.average_index,
        analytics.average_response_time,
        analytics.average_planned_interviews
    ));
    out.push_str(&format!(
        "Active requests: {}\n",
        analytics.total_active_requests
    ));

    out.push_str("\nStatus breakdown\n");
    for status in LoadStatus::ordered() {
        out.push_str(&format!(
            "- {}: {}\n",
            status.label(),
            analytics.count_for(status)
        ));
    }

    if analytics.language_stats.is_empty() {
        out.push_str("\nLanguages: none\n");
    } else {
        out.push_str("\nLanguages\n");
        for stats in &analytics.language_stats {
            out.push_str(&format!(
                "- {}: {} employees, average index {:.2}\n",
                stats.language.label(),
                stats.employee_count,
                stats.average_index
            ));
        }
    }

    if let Some(employees) = employees {
        out.push_str("\nEmployees\n");
        for employee in employees {
            out.push_str(&format!(
                "- {} ({}, {}): index {:.1}, {}, {} active requests\n",
                employee.name(),
                employee.rate().label(),
                employee.language().label(),
                employee.score().current_index(),
                employee.score().status().label(),
                employee.active_requests().len()
            ));
        }
    }

    out
}

pub(crate) fn render_index_preview(active_requests: usize, score: &WorkloadScore) -> String {
    format!(
        "{} active requests -> index {:.1} ({}, {})",
        active_requests,
        score.current_index(),
        score.status().label(),
        score.status().color()
    )
}
