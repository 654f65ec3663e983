/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! User service entry point.
//!
//! A standalone Axum service that signs users in through the Cognito hosted
//! UI, provisions local user records, and serves profile endpoints.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use user_api::config::{Config, StoreBackend};
use user_api::db::{IdentityStore, MemoryIdentityStore, PgIdentityStore};
use user_api::routes;
use user_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");
    config.cognito.log_summary();

    let store: Arc<dyn IdentityStore> = match &config.store {
        StoreBackend::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(20)
                .connect(database_url)
                .await
                .expect("failed to connect to PostgreSQL");

            tracing::info!("Connected to PostgreSQL");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("failed to run migrations");

            Arc::new(PgIdentityStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("USER_STORE=memory: user records are lost on restart");
            Arc::new(MemoryIdentityStore::new())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState::from_config(config.cognito.clone(), store)
        .expect("failed to initialize application state");
    let app = routes::router().layer(cors).with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("User service listening on {}", config.listen_addr);

    axum::serve(listener, app).await.expect("server error");
}
