use std::sync::Arc;

use usergate_api::app;
use usergate_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    usergate_observability::init();

    let config = AppConfig::from_env();
    let services = Arc::new(app::AppServices::from_config(&config).await?);
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
