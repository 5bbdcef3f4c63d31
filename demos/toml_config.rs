//! Example demonstrating TOML configuration for the allow-list.
//!
//! This example shows two methods:
//! 1. Compile-time embedded configuration (include_str!)
//! 2. Runtime file loading
//!
//! Run with: `cargo run --example toml_config`
//!
//! Test endpoints:
//! ```sh
//! # Local request, on the allow-list (allowed)
//! curl http://localhost:3000/admin/dashboard
//!
//! # Forwarded client outside the list (403)
//! curl -H "X-Forwarded-For: 203.0.113.7" http://localhost:3000/admin/dashboard
//!
//! # Inside the configured CIDR block (allowed)
//! curl -H "X-Forwarded-For: 192.168.178.42" http://localhost:3000/admin/dashboard
//! ```

use axum::{routing::get, Router};
use axum_ip_allow::{AllowConfig, IpAllowLayer};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// METHOD 1: Compile-time embedded configuration
// ============================================================================
// The configuration is baked into the binary at compile time.
// Changes require recompilation.

const EMBEDDED_CONFIG: &str = r#"
[access]
enabled = true
allowed_ips = [
    "127.0.0.1",           # exact address
    "192.168.178.0/24",    # CIDR block
    "10.0.0.0-50",         # dash range over the last octet
    "172.16.*",            # wildcard prefix
]
"#;

// Alternative: Load from file at compile time
// const EMBEDDED_CONFIG: &str = include_str!("access.toml");

// ============================================================================
// METHOD 2: Runtime file loading (commented out)
// ============================================================================
// fn load_config_from_file() -> axum_ip_allow::AccessConfig {
//     axum_ip_allow::AllowConfig::from_file("config/access.toml")
//         .expect("Failed to load allow-list config")
//         .into_config()
// }

// Handlers
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
                .unwrap_or_else(|_| "axum_ip_allow=trace,toml_config=info".into()),
        )
        .init();

    // Load the allow-list from embedded TOML
    let config = AllowConfig::from_toml(EMBEDDED_CONFIG)
        .expect("Failed to parse embedded allow-list config")
        .into_config();

    tracing::info!(
        "Loaded allow-list: enabled={}, {} entries",
        config.enabled,
        config.allowed_ips.len()
    );

    // Build router
    let app = Router::new()
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/settings", get(admin_settings))
        .layer(IpAllowLayer::new(config).with_forwarded_ip_header("X-Forwarded-For"));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Starting server on {}", addr);
    tracing::info!("");
    tracing::info!("Test commands:");
    tracing::info!("  curl http://localhost:3000/admin/dashboard                                  # localhost (allowed)");
    tracing::info!("  curl -H 'X-Forwarded-For: 203.0.113.7' http://localhost:3000/admin/dashboard  # outside list (403)");
    tracing::info!("  curl -H 'X-Forwarded-For: 192.168.178.42' http://localhost:3000/admin/dashboard # CIDR (allowed)");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
