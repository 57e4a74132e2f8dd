use proposal_discovery::{create_router, telemetry, AppState, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_tracing();

    let config = Config::from_env()?;
    tracing::info!(
        backend = ?config.repository_backend,
        supported_service_types = ?config.supported_service_types,
        "Starting proposal discovery"
    );

    let app_state = AppState::from_config(&config).await?;
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    tracing::info!(address = %config.bind_address, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
