use super::{ApiClient, ApiError, ApiResult, path_segment};
use crate::fallback::{FallbackPolicy, NoFallback};
use crate::models::{
    CitizenReport, FilterOptions, NewCitizenReport, Project, ProjectFilter, ProjectProgress,
    ReportSubmission, Statistics,
};
use std::sync::Arc;
use tracing::warn;

/// Projects sub-API. Read endpoints degrade to the injected
/// [`FallbackPolicy`] when the backend is unreachable; writes never do.
#[derive(Clone)]
pub struct ProjectsApi {
    client: ApiClient,
    fallback: Arc<dyn FallbackPolicy>,
}

impl ProjectsApi {
    pub fn new(client: ApiClient) -> Self {
        Self::with_fallback(client, Arc::new(NoFallback))
    }

    pub fn with_fallback(client: ApiClient, fallback: Arc<dyn FallbackPolicy>) -> Self {
        Self { client, fallback }
    }

    pub async fn get_projects(&self, filter: &ProjectFilter) -> ApiResult<Vec<Project>> {
        let result = self
            .client
            .get_with_query("/api/projects/", filter.to_query())
            .await;
        recover(result, "projects", || self.fallback.projects(filter))
    }

    pub async fn get_project(&self, project_id: &str) -> ApiResult<Project> {
        let endpoint = format!("/api/projects/{}", path_segment("project id", project_id)?);
        let result = self.client.get(&endpoint).await;
        recover(result, &endpoint, || self.fallback.project(project_id))
    }

    pub async fn get_project_progress(&self, project_id: &str) -> ApiResult<ProjectProgress> {
        let endpoint = format!(
            "/api/projects/{}/progress",
            path_segment("project id", project_id)?
        );
        let result = self.client.get(&endpoint).await;
        recover(result, &endpoint, || self.fallback.project_progress(project_id))
    }

    pub async fn get_project_reports(&self, project_id: &str) -> ApiResult<Vec<CitizenReport>> {
        let endpoint = format!(
            "/api/projects/{}/reports",
            path_segment("project id", project_id)?
        );
        let result = self.client.get(&endpoint).await;
        recover(result, &endpoint, || self.fallback.project_reports(project_id))
    }

    pub async fn get_statistics(&self) -> ApiResult<Statistics> {
        let result = self.client.get("/api/projects/stats/overview").await;
        recover(result, "statistics", || self.fallback.statistics())
    }

    pub async fn get_filter_options(&self) -> ApiResult<FilterOptions> {
        let result = self.client.get("/api/projects/filters/options").await;
        recover(result, "filter options", || self.fallback.filter_options())
    }

    /// Legacy JSON report submission.
    pub async fn submit_report(&self, report: &NewCitizenReport) -> ApiResult<ReportSubmission> {
        if report.report_text.trim().is_empty() {
            return Err(ApiError::InvalidInput("Report text is required".to_string()));
        }
        let endpoint = format!(
            "/api/projects/{}/report",
            path_segment("project id", &report.project_id)?
        );
        self.client.post(&endpoint, report).await
    }
}

/// Replaces a network-unreachable failure with fallback data when the policy
/// has an answer. Every other outcome passes through untouched.
fn recover<T>(
    result: ApiResult<T>,
    what: &str,
    fallback: impl FnOnce() -> Option<T>,
) -> ApiResult<T> {
    match result {
        Err(error) if error.is_unreachable() => match fallback() {
            Some(data) => {
                warn!("Backend unreachable ({}), serving offline data for {}", error, what);
                Ok(data)
            }
            None => Err(error),
        },
        other => other,
    }
}
