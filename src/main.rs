use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod api;
mod cache;
mod config;
mod demo;
mod fetch;
mod scrape;
mod types;
mod utils;

use api::AppState;
use cache::LotteryCache;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let state = AppState {
        cache: Arc::new(LotteryCache::new()),
        sources: Arc::new(scrape::default_sources()),
    };

    let app = api::create_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Xổ số TP.HCM trực tuyến: http://localhost:{}", config.port);
    tracing::info!("Nguồn ưu tiên: xskt.com.vn | backup: xoso.com.vn, minhngoc.net.vn");
    tracing::info!("Lịch quay: Thứ 2 & Thứ 7 lúc 16:15 | cache 2 phút");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    Ok(())
}
