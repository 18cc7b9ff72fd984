//! Ready-made resources and mutations over the API modules.
//!
//! Each function clones the API handle into the fetch closure, so the
//! returned [`Resource`] or [`Mutation`] is self-contained and can be handed
//! to a screen or to the bevy adapter.

use crate::api::ApiResult;
use crate::api::assistant::{ChatMessage, ChatReply};
use crate::api::reviews::{ReviewDraft, ReviewSubmission, ReviewSummary};
use crate::api::{AssistantApi, ProjectsApi, ReviewsApi};
use crate::models::{
    CitizenReport, FilterOptions, NewCitizenReport, Project, ProjectFilter, ProjectProgress,
    ReportSubmission, Statistics,
};
use crate::resource::{Mutation, Resource};
use std::future::Future;

fn bind<A, D, T, F, Fut>(api: &A, deps: D, fetch: F) -> Resource<D, T>
where
    A: Clone + Send + Sync + 'static,
    D: Clone + PartialEq + Send + 'static,
    T: Clone + Send + 'static,
    F: Fn(A, D) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    let api = api.clone();
    Resource::new(deps, move |deps| fetch(api.clone(), deps))
}

/// Project list for a filter. Call [`Resource::set_deps`] with a new filter
/// to refetch.
pub fn projects(api: &ProjectsApi, filter: ProjectFilter) -> Resource<ProjectFilter, Vec<Project>> {
    bind(api, filter, |api: ProjectsApi, filter: ProjectFilter| async move {
        api.get_projects(&filter).await
    })
}

pub fn project(api: &ProjectsApi, project_id: String) -> Resource<String, Project> {
    bind(api, project_id, |api: ProjectsApi, id: String| async move {
        api.get_project(&id).await
    })
}

pub fn project_reports(api: &ProjectsApi, project_id: String) -> Resource<String, Vec<CitizenReport>> {
    bind(api, project_id, |api: ProjectsApi, id: String| async move {
        api.get_project_reports(&id).await
    })
}

pub fn project_progress(api: &ProjectsApi, project_id: String) -> Resource<String, ProjectProgress> {
    bind(api, project_id, |api: ProjectsApi, id: String| async move {
        api.get_project_progress(&id).await
    })
}

pub fn statistics(api: &ProjectsApi) -> Resource<(), Statistics> {
    bind(api, (), |api: ProjectsApi, _: ()| async move { api.get_statistics().await })
}

pub fn filter_options(api: &ProjectsApi) -> Resource<(), FilterOptions> {
    bind(api, (), |api: ProjectsApi, _: ()| async move {
        api.get_filter_options().await
    })
}

pub fn review_summary(api: &ReviewsApi, project_id: String) -> Resource<String, ReviewSummary> {
    bind(api, project_id, |api: ReviewsApi, id: String| async move {
        api.get_review_summary(&id).await
    })
}

pub fn submit_report(api: &ProjectsApi) -> Mutation<NewCitizenReport, ReportSubmission> {
    let api = api.clone();
    Mutation::new(move |report: NewCitizenReport| {
        let api = api.clone();
        async move { api.submit_report(&report).await }
    })
}

/// Takes `(project_id, draft)`.
pub fn submit_review(api: &ReviewsApi) -> Mutation<(String, ReviewDraft), ReviewSubmission> {
    let api = api.clone();
    Mutation::new(move |(project_id, draft): (String, ReviewDraft)| {
        let api = api.clone();
        async move { api.submit_review_with_images(&project_id, draft).await }
    })
}

/// Takes the whole conversation so far.
pub fn assistant_chat(api: &AssistantApi) -> Mutation<Vec<ChatMessage>, ChatReply> {
    let api = api.clone();
    Mutation::new(move |messages: Vec<ChatMessage>| {
        let api = api.clone();
        async move { api.chat(&messages).await }
    })
}
