//! Example consumer: a separate Rust project that uses dashboard-sdk as a dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`
//!
//! Needs a running backend at `API_BASE_URL` and `EMAIL` / `PASSWORD` of a dashboard user.

use dashboard_sdk::endpoints::ListEmployees;
use dashboard_sdk::models::{Employee, ListRequest};
use dashboard_sdk::{init_tracing, AuthFlow, Dispatcher, ListController, ListSource, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    init_tracing(&settings);

    let registry = settings.registry().await?;
    tracing::info!(endpoints = registry.len(), base_url = %settings.api_base_url, "registry loaded");
    let dispatcher = Dispatcher::from_settings(&settings, registry, settings.session())?;

    if !dispatcher.session().is_authenticated() {
        let email = std::env::var("EMAIL")?;
        let password = std::env::var("PASSWORD")?;
        let mut auth = AuthFlow::new(dispatcher.clone());
        let user = auth.login(&email, &password, true).await?;
        tracing::info!(user = ?user.map(|u| u.email), "signed in");
    }

    let first = dispatcher
        .call::<ListEmployees>(&ListRequest {
            page_number: 1,
            ..Default::default()
        })
        .await?;
    tracing::info!(rows = first.data.rows.len(), count = first.data.count, "employees page 1");

    let source: Arc<dyn ListSource> = Arc::new(dispatcher.clone());
    let list: ListController<Employee> = ListController::builder(source, "employees.list")
        .search(std::env::var("SEARCH").unwrap_or_default())
        .spawn();
    let state = list.wait_for(|s| s.is_settled()).await;
    for employee in &state.rows {
        tracing::info!(name = %employee.name_en, email = %employee.email, "employee");
    }
    tracing::info!(page = state.page_number + 1, pages = state.page_count(), "done");
    Ok(())
}
