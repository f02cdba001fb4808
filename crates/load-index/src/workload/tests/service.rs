use super::common::*;
use crate::workload::domain::{EmployeeId, EmployeeLanguage, EmployeePatch, ValidationError};
use crate::workload::engine::LoadStatus;
use crate::workload::repository::{EmployeeRepository, RepositoryError};
use crate::workload::{EmployeeQuery, EmployeeService, EmployeeServiceError, EmployeeSort};
use std::sync::Arc;

#[test]
fn create_computes_index_and_status() {
    let (service, repository) = build_service();

    let employee = service
        .create(draft("Maria Sidorova", EmployeeLanguage::Python, 2))
        .expect("employee created");

    assert_eq!(employee.score().current_index(), 2.4);
    assert_eq!(employee.score().status(), LoadStatus::Overloaded);
    let stored = repository
        .fetch(employee.id())
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, employee);
}

#[test]
fn create_assigns_distinct_ids() {
    let (service, _) = build_service();

    let first = service
        .create(draft("Ivan Petrov", EmployeeLanguage::JsTs, 0))
        .expect("first created");
    let second = service
        .create(draft("Alexey Kozlov", EmployeeLanguage::CSharp, 0))
        .expect("second created");

    assert!(second.id() > first.id());
}

#[test]
fn create_rejects_invalid_drafts() {
    let (service, repository) = build_service();

    match service.create(draft("A", EmployeeLanguage::Java, 0)) {
        Err(EmployeeServiceError::Validation(ValidationError::NameTooShort)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(repository.snapshot().is_empty());
}

#[test]
fn update_rescores_when_requests_change() {
    let (service, _) = build_service();
    let employee = service
        .create(draft("Elena Smirnova", EmployeeLanguage::Java, 3))
        .expect("employee created");
    assert_eq!(employee.score().status(), LoadStatus::Overloaded);

    let updated = service
        .update(
            employee.id(),
            EmployeePatch {
                active_requests: Some(employee.active_requests()[..1].to_vec()),
                ..EmployeePatch::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(updated.active_requests().len(), 1);
    assert_eq!(updated.score().current_index(), 1.2);
    assert_eq!(updated.score().status(), LoadStatus::Busy);
    assert_eq!(service.get(employee.id()).expect("stored"), updated);
}

#[test]
fn update_leaves_score_alone_for_unrelated_fields() {
    let (service, _) = build_service();
    let employee = service
        .create(draft("Elena Smirnova", EmployeeLanguage::Java, 1))
        .expect("employee created");

    let updated = service
        .update(
            employee.id(),
            EmployeePatch {
                planned_interviews: Some(4),
                skills: Some(vec!["Selenium".to_string()]),
                ..EmployeePatch::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(updated.planned_interviews(), 4);
    assert_eq!(updated.skills(), ["Selenium"]);
    assert_eq!(updated.score(), employee.score());
}

#[test]
fn update_propagates_not_found() {
    let (service, _) = build_service();

    match service.update(EmployeeId(42), EmployeePatch::default()) {
        Err(EmployeeServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn assign_project_appends_and_rescores() {
    let (service, _) = build_service();
    let employee = service
        .create(draft("Alexey Kozlov", EmployeeLanguage::CSharp, 0))
        .expect("employee created");
    assert_eq!(employee.score().status(), LoadStatus::Available);

    let updated = service
        .assign_project(employee.id(), project("Billing API"))
        .expect("project assigned");

    assert_eq!(updated.active_requests().len(), 1);
    assert_eq!(updated.active_requests()[0].name, "Billing API");
    assert_eq!(updated.score().status(), LoadStatus::Busy);
}

#[test]
fn assign_project_requires_a_name() {
    let (service, _) = build_service();
    let employee = service
        .create(draft("Alexey Kozlov", EmployeeLanguage::CSharp, 0))
        .expect("employee created");

    let result = service.assign_project(employee.id(), project("   "));
    assert!(matches!(
        result,
        Err(EmployeeServiceError::Validation(
            ValidationError::EmptyProjectName
        ))
    ));
}

#[test]
fn delete_removes_the_employee() {
    let (service, repository) = build_service();
    let employee = service
        .create(draft("Ivan Petrov", EmployeeLanguage::JsTs, 1))
        .expect("employee created");

    service.delete(employee.id()).expect("delete succeeds");

    assert!(repository.snapshot().is_empty());
    assert!(matches!(
        service.delete(employee.id()),
        Err(EmployeeServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn list_filters_and_sorts() {
    let (service, _) = build_service();
    for (name, language, projects) in [
        ("Ivan Petrov", EmployeeLanguage::JsTs, 1),
        ("Maria Sidorova", EmployeeLanguage::Python, 2),
        ("Alexey Kozlov", EmployeeLanguage::CSharp, 0),
        ("Elena Smirnova", EmployeeLanguage::Java, 4),
    ] {
        service
            .create(draft(name, language, projects))
            .expect("employee created");
    }

    let by_index: Vec<String> = service
        .list(&EmployeeQuery::default())
        .expect("list succeeds")
        .iter()
        .map(|employee| employee.name().to_string())
        .collect();
    assert_eq!(
        by_index,
        vec![
            "Elena Smirnova",
            "Maria Sidorova",
            "Ivan Petrov",
            "Alexey Kozlov"
        ]
    );

    let overloaded = service
        .list(&EmployeeQuery {
            status: Some(LoadStatus::Overloaded),
            sort: EmployeeSort::Name,
            ..EmployeeQuery::default()
        })
        .expect("list succeeds");
    let names: Vec<&str> = overloaded.iter().map(|employee| employee.name()).collect();
    assert_eq!(names, vec!["Elena Smirnova", "Maria Sidorova"]);

    let searched = service
        .list(&EmployeeQuery {
            search: Some("python".to_string()),
            ..EmployeeQuery::default()
        })
        .expect("list succeeds");
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].name(), "Maria Sidorova");

    let java = service
        .list(&EmployeeQuery {
            language: Some(EmployeeLanguage::Java),
            ..EmployeeQuery::default()
        })
        .expect("list succeeds");
    assert_eq!(java.len(), 1);
}

#[test]
fn analytics_reflect_the_filtered_roster() {
    let (service, _) = build_service();
    for (name, projects) in [("A. One", 0), ("B. Two", 1), ("C. Three", 2), ("D. Four", 3)] {
        service
            .create(draft(name, EmployeeLanguage::Java, projects))
            .expect("employee created");
    }

    let analytics = service
        .analytics(&EmployeeQuery::default())
        .expect("analytics succeed");
    assert_eq!(analytics.total_employees, 4);
    assert_eq!(analytics.load_percentage, 75.0);

    let empty = service
        .analytics(&EmployeeQuery {
            language: Some(EmployeeLanguage::Python),
            ..EmployeeQuery::default()
        })
        .expect("analytics succeed");
    assert_eq!(empty.total_employees, 0);
    assert_eq!(empty.load_percentage, 0.0);
}

#[test]
fn factor_breakdown_uses_employee_factors() {
    let (service, _) = build_service();
    let employee = service
        .create(draft("Ivan Petrov", EmployeeLanguage::JsTs, 2))
        .expect("employee created");

    let detail = service
        .factor_breakdown(employee.id(), date(6, 8))
        .expect("breakdown");

    assert_eq!(detail.employee.id(), employee.id());
    assert_eq!(detail.breakdown.contributions.len(), 4);
    assert_eq!(detail.breakdown.contributions[0].raw_value, 2.0);
    assert_eq!(detail.breakdown.contributions[3].raw_value, 5.0);
    assert_eq!(detail.employee.score().status(), LoadStatus::Overloaded);
}

#[test]
fn repository_failures_propagate() {
    let service = EmployeeService::new(Arc::new(UnavailableRepository));

    assert!(matches!(
        service.list(&EmployeeQuery::default()),
        Err(EmployeeServiceError::Repository(
            RepositoryError::Unavailable(_)
        ))
    ));
    assert!(matches!(
        service.create(draft("Ivan Petrov", EmployeeLanguage::JsTs, 0)),
        Err(EmployeeServiceError::Repository(
            RepositoryError::Unavailable(_)
        ))
    ));
}

#[test]
fn preview_scores_without_storage() {
    let (service, repository) = build_service();

    let score = service.preview(1).expect("preview");
    assert_eq!(score.current_index(), 1.2);
    assert_eq!(score.status(), LoadStatus::Busy);
    assert!(repository.snapshot().is_empty());
}
