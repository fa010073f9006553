//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use agencia_crm::{
    config::{AppConfig, AppState},
    handlers,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new(&config).await?;

    // Primeira checagem na hora, depois a cada intervalo
    app_state
        .lembrete_service
        .clone()
        .spawn(app_state.repo.clone(), config.lembrete_intervalo);

    let app = handlers::router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
