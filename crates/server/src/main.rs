use db::DBService;
use server::{AppState, config::Config, config::ConfigError, routes};
use services::services::mirror::FolderMirrorClient;
use sqlx::Error as SqlxError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlx(#[from] SqlxError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = DBService::new(&config.database_path).await?;

    let mut mirror = FolderMirrorClient::new(config.github_owner.clone(), config.github_token.clone());
    if let Some(api_base) = config.github_api_base.clone() {
        mirror = mirror.with_api_base(api_base);
    }

    let state = AppState::new(db, mirror);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
