// storefront_server/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use crate::config::{AppConfig, StoreBackend};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use storefront::{MemoryStore, PgStore, Shop, Store};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
  match config.store_backend {
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; all data is lost at shutdown.");
      Ok(Arc::new(MemoryStore::new()))
    }
    StoreBackend::Postgres => {
      let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres store")?;
      let store = PgStore::connect(database_url, config.database_max_connections)
        .await
        .context("Failed to connect to the database")?;
      tracing::info!("Successfully connected to the database.");
      if config.run_migrations {
        store.migrate().await.context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied.");
      }
      Ok(Arc::new(store))
    }
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  let store = build_store(&app_config).await?;

  let app_state = AppState {
    shop: Shop::new(Arc::clone(&store)),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Binding server to {}...", server_address);

  let served = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await;

  tracing::info!("Server stopped; closing the store.");
  store.close().await;
  served.context("HTTP server terminated with an error")
}
