use super::*;
use crate::models::{ProcurementMethod, ProjectFilter, ProjectStatus};

fn ids(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn empty_filter_returns_everything() {
    let store = MockStore::default();
    assert_eq!(store.filter_projects(&ProjectFilter::new()).len(), 4);
    assert_eq!(
        store.filter_projects(&ProjectFilter::new().ministry("").search("")).len(),
        4
    );
}

#[test]
fn ministry_filter_is_exact_and_case_sensitive() {
    let store = MockStore::default();

    for ministry in store.projects().iter().map(|p| p.ministry.clone()) {
        let filtered = store.filter_projects(&ProjectFilter::new().ministry(ministry.clone()));
        let expected: Vec<&str> = store
            .projects()
            .iter()
            .filter(|p| p.ministry == ministry)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids(&filtered), expected);
    }

    assert!(store
        .filter_projects(&ProjectFilter::new().ministry("ministry of health"))
        .is_empty());
    assert!(store
        .filter_projects(&ProjectFilter::new().ministry("Ministry"))
        .is_empty());
}

#[test]
fn health_in_progress_yields_single_project() {
    let store = MockStore::default();
    let filter = ProjectFilter::new()
        .ministry("Ministry of Health")
        .status(ProjectStatus::InProgress);

    assert_eq!(ids(&store.filter_projects(&filter)), vec!["PRJ-2087-002"]);
}

#[test]
fn search_is_case_insensitive_across_id_details_and_ministry() {
    let store = MockStore::default();

    assert_eq!(
        ids(&store.filter_projects(&ProjectFilter::new().search("school building"))),
        vec!["PRJ-2087-003"]
    );
    assert_eq!(
        ids(&store.filter_projects(&ProjectFilter::new().search("prj-2087-004"))),
        vec!["PRJ-2087-004"]
    );
    assert_eq!(
        ids(&store.filter_projects(&ProjectFilter::new().search("EDUCATION"))),
        vec!["PRJ-2087-003"]
    );
    assert!(store
        .filter_projects(&ProjectFilter::new().search("bridge over river"))
        .is_empty());
}

#[test]
fn amount_range_bounds_are_inclusive() {
    let store = MockStore::default();
    let filter = ProjectFilter::new().amount_range(Some(12_000_000.0), Some(18_500_000.0));
    assert_eq!(
        ids(&store.filter_projects(&filter)),
        vec!["PRJ-2087-002", "PRJ-2087-003"]
    );
}

#[test]
fn amount_range_excludes_projects_without_amount() {
    let mut projects = MockStore::default().projects().to_vec();
    projects[0].procurement_plan.contract_amount = None;
    let store = MockStore::new(projects);

    let filtered = store.filter_projects(&ProjectFilter::new().amount_range(Some(0.0), None));
    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|p| p.id != "PRJ-2087-001"));
}

#[test]
fn statistics_match_dataset() {
    let store = MockStore::default();
    let stats = store.build_statistics();

    assert_eq!(stats.total_projects, store.projects().len());
    assert_eq!(stats.total_contract_value, 486_000_000.0);
    assert_eq!(stats.average_progress, 53.75);
    assert_eq!(stats.status_breakdown.get(&ProjectStatus::InProgress), Some(&2));
    assert_eq!(stats.status_breakdown.get(&ProjectStatus::Completed), Some(&1));
    assert_eq!(stats.status_breakdown.get(&ProjectStatus::Delayed), Some(&1));
    assert_eq!(stats.total_citizen_reports, 5);
    assert_eq!(stats.ministries_count, 4);
    assert_eq!(stats.fiscal_years, vec!["2086/87".to_string()]);
}

#[test]
fn average_progress_is_rounded_mean() {
    let mut projects = MockStore::default().projects()[..3].to_vec();
    projects[0].progress_percentage = 10;
    projects[1].progress_percentage = 20;
    projects[2].progress_percentage = 21;
    let stats = MockStore::new(projects).build_statistics();

    assert_eq!(stats.average_progress, 17.0);

    let mut projects = MockStore::default().projects()[..3].to_vec();
    projects[0].progress_percentage = 0;
    projects[1].progress_percentage = 0;
    projects[2].progress_percentage = 1;
    assert_eq!(MockStore::new(projects).build_statistics().average_progress, 0.33);
}

#[test]
fn empty_store_statistics() {
    let stats = MockStore::new(Vec::new()).build_statistics();
    assert_eq!(stats.total_projects, 0);
    assert_eq!(stats.average_progress, 0.0);
    assert_eq!(stats.total_contract_value, 0.0);
    assert!(stats.status_breakdown.is_empty());
}

#[test]
fn missing_amount_counts_as_zero() {
    let mut projects = MockStore::default().projects().to_vec();
    projects[3].procurement_plan.contract_amount = None;
    let stats = MockStore::new(projects).build_statistics();
    assert_eq!(stats.total_contract_value, 36_000_000.0);
}

#[test]
fn filter_options_are_distinct_in_order() {
    let options = MockStore::default().build_filter_options();

    assert_eq!(
        options.ministries,
        vec![
            "Likhu Tamakoshi Rural Municipality",
            "Ministry of Health",
            "Ministry of Education",
            "Ministry of Physical Infrastructure",
        ]
    );
    assert_eq!(options.fiscal_years, vec!["2086/87"]);
    assert_eq!(
        options.statuses,
        vec![
            ProjectStatus::InProgress,
            ProjectStatus::Completed,
            ProjectStatus::Delayed
        ]
    );
    assert_eq!(
        options.procurement_methods,
        vec![ProcurementMethod::WorksNcb, ProcurementMethod::WorksIcb]
    );
}

#[test]
fn lookups_by_id() {
    let store = MockStore::default();

    assert_eq!(store.project_reports("PRJ-2087-004").map(|r| r.len()), Some(2));
    assert!(store.project("PRJ-2087-999").is_none());

    let progress = store.project_progress("PRJ-2087-003").unwrap();
    assert_eq!(progress.progress_percentage, 100);
    assert_eq!(progress.contractor.as_deref(), Some("Everest Builders Pvt. Ltd."));
    assert_eq!(progress.citizen_reports_count, 1);
}

#[test]
fn no_fallback_never_answers() {
    let policy = NoFallback;
    assert!(policy.projects(&ProjectFilter::new()).is_none());
    assert!(policy.statistics().is_none());
    assert!(policy.project("PRJ-2087-001").is_none());
}

#[test]
fn mock_fallback_delegates_to_store() {
    let policy = MockFallback::default();
    assert_eq!(policy.statistics(), Some(policy.store().build_statistics()));
    assert_eq!(policy.project("PRJ-2087-999"), None);
    assert_eq!(
        policy.projects(&ProjectFilter::new()).map(|p| p.len()),
        Some(4)
    );
}
