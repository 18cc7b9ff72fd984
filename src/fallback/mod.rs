//! Offline data for read endpoints.
//!
//! When the backend cannot be reached at all, the resource modules ask a
//! [`FallbackPolicy`] for a substitute answer. [`MockFallback`] answers from
//! the bundled [`MockStore`]; [`NoFallback`] never answers, so every error
//! propagates.

mod data;

#[cfg(test)]
mod tests;

use crate::models::{
    CitizenReport, FilterOptions, ProcurementMethod, Project, ProjectFilter, ProjectProgress,
    ProjectStatus, Statistics,
};
use std::collections::BTreeMap;

/// Substitute answers for read endpoints. `None` means "no substitute", in
/// which case the caller surfaces the original error.
pub trait FallbackPolicy: Send + Sync {
    fn projects(&self, _filter: &ProjectFilter) -> Option<Vec<Project>> {
        None
    }

    fn project(&self, _id: &str) -> Option<Project> {
        None
    }

    fn project_progress(&self, _id: &str) -> Option<ProjectProgress> {
        None
    }

    fn project_reports(&self, _id: &str) -> Option<Vec<CitizenReport>> {
        None
    }

    fn statistics(&self) -> Option<Statistics> {
        None
    }

    fn filter_options(&self) -> Option<FilterOptions> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackPolicy for NoFallback {}

#[derive(Debug, Clone, Default)]
pub struct MockFallback {
    store: MockStore,
}

impl MockFallback {
    pub fn new(store: MockStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }
}

impl FallbackPolicy for MockFallback {
    fn projects(&self, filter: &ProjectFilter) -> Option<Vec<Project>> {
        Some(self.store.filter_projects(filter))
    }

    fn project(&self, id: &str) -> Option<Project> {
        self.store.project(id).cloned()
    }

    fn project_progress(&self, id: &str) -> Option<ProjectProgress> {
        self.store.project_progress(id)
    }

    fn project_reports(&self, id: &str) -> Option<Vec<CitizenReport>> {
        self.store.project_reports(id)
    }

    fn statistics(&self) -> Option<Statistics> {
        Some(self.store.build_statistics())
    }

    fn filter_options(&self) -> Option<FilterOptions> {
        Some(self.store.build_filter_options())
    }
}

/// Fixed sample dataset plus the derivations the backend would otherwise
/// compute.
#[derive(Debug, Clone)]
pub struct MockStore {
    projects: Vec<Project>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new(data::sample_projects())
    }
}

impl MockStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_reports(&self, id: &str) -> Option<Vec<CitizenReport>> {
        self.project(id).map(|p| p.citizen_reports.clone())
    }

    pub fn project_progress(&self, id: &str) -> Option<ProjectProgress> {
        self.project(id).map(ProjectProgress::from)
    }

    /// Applies the backend's filter semantics: ministry, status and fiscal
    /// year match exactly; `search` is a case-insensitive substring of the
    /// id, the work details or the ministry; amount bounds drop projects with
    /// no contract amount.
    pub fn filter_projects(&self, filter: &ProjectFilter) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect()
    }

    pub fn build_statistics(&self) -> Statistics {
        let projects = &self.projects;

        let total_contract_value = projects
            .iter()
            .map(|p| p.contract_amount().unwrap_or(0.0))
            .sum();

        let average_progress = if projects.is_empty() {
            0.0
        } else {
            let total: f64 = projects.iter().map(|p| f64::from(p.progress_percentage)).sum();
            round2(total / projects.len() as f64)
        };

        let mut status_breakdown: BTreeMap<ProjectStatus, usize> = BTreeMap::new();
        for project in projects {
            *status_breakdown.entry(project.status).or_insert(0) += 1;
        }

        let ministries = distinct(projects.iter().map(|p| p.ministry.clone()));

        Statistics {
            total_projects: projects.len(),
            total_contract_value,
            average_progress,
            status_breakdown,
            total_citizen_reports: projects.iter().map(Project::reports_count).sum(),
            ministries_count: ministries.len(),
            fiscal_years: distinct(projects.iter().map(|p| p.fiscal_year.clone())),
        }
    }

    pub fn build_filter_options(&self) -> FilterOptions {
        FilterOptions {
            ministries: distinct(self.projects.iter().map(|p| p.ministry.clone())),
            fiscal_years: distinct(self.projects.iter().map(|p| p.fiscal_year.clone())),
            statuses: distinct(self.projects.iter().map(|p| p.status)),
            procurement_methods: distinct::<ProcurementMethod>(
                self.projects
                    .iter()
                    .map(|p| p.procurement_plan.procurement_method),
            ),
        }
    }
}

fn matches_filter(project: &Project, filter: &ProjectFilter) -> bool {
    if let Some(ministry) = filter.ministry_value() {
        if project.ministry != ministry {
            return false;
        }
    }

    if let Some(status) = filter.status {
        if project.status != status {
            return false;
        }
    }

    if let Some(fiscal_year) = filter.fiscal_year_value() {
        if project.fiscal_year != fiscal_year {
            return false;
        }
    }

    if filter.min_amount.is_some() || filter.max_amount.is_some() {
        let Some(amount) = project.contract_amount() else {
            return false;
        };
        if filter.min_amount.is_some_and(|min| amount < min) {
            return false;
        }
        if filter.max_amount.is_some_and(|max| amount > max) {
            return false;
        }
    }

    if let Some(search) = filter.search_value() {
        let needle = search.to_lowercase();
        let haystacks = [
            project.id.as_str(),
            project.procurement_plan.details_of_work.as_str(),
            project.ministry.as_str(),
        ];
        if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
            return false;
        }
    }

    true
}

/// Distinct values in first-appearance order.
fn distinct<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
