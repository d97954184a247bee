mod config;
mod errors;
mod export;
mod layout;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::assets::asset_source_for;
use crate::export::delivery::{DirectoryDelivery, FileDelivery};
use crate::layout::PageGeometry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-export v{}", env!("CARGO_PKG_VERSION"));

    let assets = asset_source_for(&config.badge_asset, config.asset_fetch_timeout)?;
    info!(
        "Badge source: {} (timeout {:?})",
        assets.describe(),
        config.asset_fetch_timeout
    );

    let delivery = config.export_dir.as_ref().map(|dir| {
        info!("DOCX exports will also be saved to {}", dir.display());
        Arc::new(DirectoryDelivery::new(dir)) as Arc<dyn FileDelivery>
    });

    let page_geometry = PageGeometry::a4();

    let state = AppState {
        assets,
        delivery,
        page_geometry,
    };

    let app = build_router(state)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
