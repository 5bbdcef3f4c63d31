//! Basic example demonstrating the axum-ip-allow middleware.
//!
//! Run with: `cargo run --example basic`
//!
//! Test with:
//! ```sh
//! # Local requests are on the allow-list (127.0.0.1)
//! curl http://localhost:3000/admin/dashboard
//!
//! # Spoof a different client through the forwarded header (denied)
//! curl -H "X-Forwarded-For: 203.0.113.7" http://localhost:3000/admin/dashboard
//!
//! # An address inside the configured CIDR block (allowed)
//! curl -H "X-Forwarded-For: 192.168.178.200" http://localhost:3000/admin/dashboard
//!
//! # An address inside the dash range (allowed)
//! curl -H "X-Forwarded-For: 10.0.0.25" http://localhost:3000/admin/dashboard
//! ```

use axum::{routing::get, Router};
use axum_ip_allow::{AccessConfig, IpAllowLayer, JsonDeniedHandler};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Handler functions
async fn admin_dashboard() -> &'static str {
    "Admin Dashboard - restricted to the IP allow-list"
}

async fn admin_settings() -> &'static str {
    "Admin Settings - restricted to the IP allow-list"
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "axum_ip_allow=trace,basic=debug".into()),
        )
        .init();

    // One entry per notation
    let config = AccessConfig::with_allowed_ips([
        "127.0.0.1",          // exact
        "10.0.0.0-50",        // dash range over the last octet
        "192.168.178.0/24",   // CIDR block
        "172.16.*",           // wildcard prefix
    ]);

    tracing::info!(
        "Allow-list configured: enabled={}, {} entries",
        config.enabled,
        config.allowed_ips.len()
    );

    // Build the router with the allow-list middleware
    let app = Router::new()
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/settings", get(admin_settings))
        .layer(
            IpAllowLayer::new(config)
                // Use JSON responses for denied requests
                .with_denied_handler(JsonDeniedHandler::new())
                // Trust the forwarded header for demo purposes only
                .with_forwarded_ip_header("X-Forwarded-For"),
        );

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Test with:");
    tracing::info!("  curl http://localhost:3000/admin/dashboard");
    tracing::info!("  curl -H 'X-Forwarded-For: 203.0.113.7' http://localhost:3000/admin/dashboard");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Important: Use into_make_service_with_connect_info for IP extraction
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
