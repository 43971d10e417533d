use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod entities;
mod error;
mod handler;
mod openapi;
mod repo;
mod schema;
mod service;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ems_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = state::AppState::new().await;
    let port = state.config().port();

    let app = axum::Router::new()
        .merge(handler::health::routes(state.clone()))
        .merge(handler::auth::routes(state.clone()))
        .merge(handler::department::routes(state.clone()))
        .merge(handler::employee::routes(state.clone()))
        .merge(handler::leave::routes(state.clone()))
        .merge(handler::salary::routes(state.clone()))
        .merge(handler::attendance::routes(state))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        );

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("failed to bind to {}", bind_addr));

    tracing::info!(%bind_addr, "listening");
    axum::serve(listener, app).await.expect("server error");
}
