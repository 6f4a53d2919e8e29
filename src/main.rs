//! shelf-rs server entry point

use shelf::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ShelfConfig::load()?;

    tracing::info!(
        users = config.users.len(),
        base = config.books.base.len(),
        privileged = config.books.privileged.len(),
        "configuration loaded"
    );

    ServerBuilder::new().with_config(config).serve().await
}
