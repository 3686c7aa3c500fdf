// src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use exam_coordination::{build_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG manda; padrão info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr.clone();

    let app_state = AppState::new(settings)
        .await
        .context("Falha ao inicializar o estado da aplicação.")?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Falha ao escutar em {}", bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
