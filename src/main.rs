use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use transparency_client::api::{ApiClient, ApiConfig, ProjectsApi};
use transparency_client::fallback::MockFallback;
use transparency_client::hooks;
use transparency_client::models::ProjectFilter;
use transparency_client::resource::{RequestState, Resource};

/// Waits until the resource leaves the loading state.
async fn settled<D, T>(resource: &Resource<D, T>) -> RequestState<T>
where
    D: Clone + PartialEq + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    let (tx, mut rx) = watch::channel(None);
    let subscription = resource.subscribe(move |state| {
        if !state.loading {
            tx.send_replace(Some(state.clone()));
        }
    });

    let current = resource.get_state();
    let state = if current.loading {
        match rx.wait_for(Option::is_some).await {
            Ok(state) => state.clone().unwrap_or(current),
            Err(_) => resource.get_state(),
        }
    } else {
        current
    };
    resource.unsubscribe(subscription);
    state
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();
    info!("Using API at {}", config.base_url);
    let offline_fallback = config.offline_fallback;

    let client = match ApiClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };
    let api = if offline_fallback {
        ProjectsApi::with_fallback(client, Arc::new(MockFallback::default()))
    } else {
        ProjectsApi::new(client)
    };

    let statistics = hooks::statistics(&api);
    let projects = hooks::projects(&api, ProjectFilter::new());

    match settled(&statistics).await {
        RequestState { data: Some(stats), .. } => {
            println!("Projects:        {}", stats.total_projects);
            println!("Contract value:  NPR {:.2}", stats.total_contract_value);
            println!("Average progress {:.2}%", stats.average_progress);
            println!("Citizen reports: {}", stats.total_citizen_reports);
            for (status, count) in &stats.status_breakdown {
                println!("  {:<12} {}", status, count);
            }
        }
        RequestState { error, .. } => {
            println!("Statistics unavailable: {}", error.unwrap_or_default());
        }
    }
    println!();

    match settled(&projects).await {
        RequestState { data: Some(list), .. } => {
            for project in list {
                println!(
                    "{}  {:<12} {:>3}%  {}  {}",
                    project.id,
                    project.status,
                    project.progress_percentage,
                    project.ministry,
                    project.procurement_plan.details_of_work
                );
            }
        }
        RequestState { error, .. } => {
            println!("Projects unavailable: {}", error.unwrap_or_default());
        }
    }

    if let Some(project_id) = std::env::args().nth(1) {
        println!();
        let progress = hooks::project_progress(&api, project_id.clone());
        let reports = hooks::project_reports(&api, project_id.clone());

        match settled(&progress).await {
            RequestState { data: Some(p), .. } => {
                println!("{} ({}): {}% {}", p.project_name, p.project_id, p.progress_percentage, p.status);
                if let Some(contractor) = p.contractor {
                    println!("Contractor: {}", contractor);
                }
            }
            RequestState { error, .. } => {
                println!("{}: {}", project_id, error.unwrap_or_default());
            }
        }
        if let Some(list) = settled(&reports).await.data {
            for report in list {
                let mark = if report.verified { "verified" } else { "unverified" };
                println!("  [{}] {}", mark, report.review_text);
            }
        }
        progress.dispose();
        reports.dispose();
    }

    statistics.dispose();
    projects.dispose();
}
