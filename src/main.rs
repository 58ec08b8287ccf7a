use std::sync::Arc;

use anyhow::{Context, Result};
use snippetbox::store::SnippetStore;
use snippetbox::{App, Config, Server};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing(&config);

    info!(env = ?config.env, "snippetbox starting");

    let store = SnippetStore::connect(&config.dsn)
        .await
        .context("failed to connect to database")?;
    store.bootstrap().await.context("failed to bootstrap schema")?;

    let server = Server::bind(&config.addr())?;
    let app = Arc::new(App::new(store.clone()));
    server.serve(app.routes()).await?;

    store.close().await;
    Ok(())
}

/// `RUST_LOG` wins; otherwise the environment's default filter applies.
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
