use anyhow::Context;
use htmx_todo::adapters::{AppState, HttpServer, HttpServerConfig, Templates};
use htmx_todo::config::Config;
use htmx_todo::core::TodoService;
use htmx_todo::storage::postgres::PgTodoRepository;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("could not connect to database")?;
    tracing::info!("Connected to database");

    let repository = PgTodoRepository::new(pool.clone())
        .await
        .context("schema bootstrap failed")?;
    let state = AppState::new(TodoService::new(repository), Templates::new()?);

    let server = HttpServer::new(
        state,
        HttpServerConfig {
            bind_addr: config.bind_addr,
            public_dir: config.public_dir,
            tls: config.tls,
        },
    );
    let result = server.run().await;

    pool.close().await;
    tracing::info!("Database pool closed");
    result
}
