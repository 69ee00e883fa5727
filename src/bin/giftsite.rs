//! Static site server for the browser frontend bundle.

use std::net::SocketAddr;

use axum::Router;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "giftsite=debug,tower_http=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let site_dir = std::env::var("SITE_DIR").unwrap_or_else(|_| "site".into());
    let index = ServeFile::new(format!("{site_dir}/index.html"));

    // "/" and "/app" both land on the bundle's index, like any built SPA.
    let app = Router::new()
        .route_service("/app", index.clone())
        .fallback_service(ServeDir::new(&site_dir).not_found_service(index))
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("SITE_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("SITE_PORT").unwrap_or_else(|_| "9000".into())
    )
    .parse()?;

    tracing::info!("serving {} on {}", site_dir, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
