//! # axum-ip-allow
//!
//! IPv4 allow-list access control middleware for [axum](https://docs.rs/axum) 0.8.
//!
//! This crate restricts access to a set of routes (typically an admin
//! area) by comparing the client IP against an operator-configured
//! allow-list written in four human-friendly notations:
//!
//! - **Exact**: `192.168.178.8`
//! - **Dash range**: `192.168.178.0-50` (last octet, inclusive both ends)
//! - **CIDR**: `192.168.178.0/24`
//! - **Wildcard**: `192.168.178.*` or `192.168.*` (literal string prefix)
//!
//! The core is the pure decision function [`decide`]; the [`IpAllowLayer`]
//! middleware wires it into axum.
//!
//! ## Quick Start
//!
//! ```no_run
//! use axum::{Router, routing::get};
//! use axum_ip_allow::{AccessConfig, IpAllowLayer};
//! use std::net::SocketAddr;
//!
//! async fn admin_dashboard() -> &'static str {
//!     "Admin only"
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AccessConfig::with_allowed_ips([
//!         "192.168.178.8",
//!         "192.168.178.0/24",
//!         "192.168.178.0-50",
//!         "192.168.*",
//!     ]);
//!
//!     let app = Router::new()
//!         .route("/admin/dashboard", get(admin_dashboard))
//!         .layer(IpAllowLayer::new(config));
//!
//!     // Important: Use into_make_service_with_connect_info for IP extraction
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(
//!         listener,
//!         app.into_make_service_with_connect_info::<SocketAddr>()
//!     ).await.unwrap();
//! }
//! ```
//!
//! ## Decision Rules
//!
//! 1. Restriction disabled (`enabled = false`, the default): **allow**.
//! 2. Empty allow-list: **allow** — see the warning below.
//! 3. Pattern families are tried in a fixed order, short-circuiting on
//!    the first match: exact, dash range, CIDR, wildcard. The matched
//!    entry is reported in [`MatchResult`] for diagnostics.
//! 4. No entry matched: **deny** (the middleware responds 403).
//!
//! Malformed entries never match and never raise an error, so a broken
//! pattern degrades to "denies less", not to a crash.
//!
//! <div class="warning">
//!
//! An **empty allow-list allows all traffic**, even with `enabled = true`.
//! The empty list means "no restriction configured", not "deny everyone".
//! Enabling the feature without populating the list leaves the restricted
//! area open; always configure at least one entry.
//!
//! </div>
//!
//! ## Wildcard Semantics
//!
//! Wildcards are literal string prefixes with no octet-boundary
//! awareness: `192.168.1*` matches `192.168.10.5` as well as
//! `192.168.1.5`. End the pattern with a `.` (`192.168.1.*`) to stay on
//! an octet boundary.
//!
//! ## TOML Configuration
//!
//! ```no_run
//! use axum_ip_allow::{AllowConfig, IpAllowLayer};
//!
//! let config = AllowConfig::from_file("config/access.toml")
//!     .expect("readable config")
//!     .into_config();
//! let layer = IpAllowLayer::new(config);
//! ```
//!
//! ## Behind a Reverse Proxy
//!
//! When running behind a reverse proxy, configure the middleware to read
//! the client IP from a header:
//!
//! ```
//! use axum_ip_allow::{AccessConfig, IpAllowLayer};
//!
//! let layer = IpAllowLayer::new(AccessConfig::with_allowed_ips(["10.0.0.0/8"]))
//!     .with_forwarded_ip_header("X-Forwarded-For");
//! ```
//!
//! ## Custom Denied Response
//!
//! The default denial is a plain-text 403 whose body reads like a missing
//! page, so the restricted area is not advertised. Use
//! [`JsonDeniedHandler`] or implement [`DeniedHandler`] for anything
//! else:
//!
//! ```
//! use axum_ip_allow::{AccessConfig, AccessDenied, DeniedHandler, IpAllowLayer, JsonDeniedHandler};
//! use axum::response::{IntoResponse, Response};
//! use http::StatusCode;
//!
//! // Use the built-in JSON handler
//! let layer = IpAllowLayer::new(AccessConfig::default())
//!     .with_denied_handler(JsonDeniedHandler::new());
//!
//! // Or implement your own
//! struct CustomHandler;
//!
//! impl DeniedHandler for CustomHandler {
//!     fn handle(&self, denied: &AccessDenied) -> Response {
//!         (StatusCode::FORBIDDEN, "Custom denied message").into_response()
//!     }
//! }
//! ```
//!
//! ## Hot Reload
//!
//! Implement [`ConfigProvider`] to serve config snapshots from a
//! swappable source; the middleware asks for one snapshot per request
//! and the engine itself holds no state:
//!
//! ```
//! use axum_ip_allow::{AccessConfig, ConfigProvider, IpAllowLayer};
//! use std::sync::{Arc, RwLock};
//!
//! struct ReloadableProvider {
//!     current: RwLock<Arc<AccessConfig>>,
//! }
//!
//! impl ConfigProvider for ReloadableProvider {
//!     fn snapshot(&self) -> Arc<AccessConfig> {
//!         self.current.read().unwrap().clone()
//!     }
//! }
//!
//! let provider = ReloadableProvider {
//!     current: RwLock::new(Arc::new(AccessConfig::with_allowed_ips(["10.0.0.5"]))),
//! };
//! let layer = IpAllowLayer::with_provider(provider);
//! ```
//!
//! IPv6 is out of scope: all four notations are IPv4 dotted-quad shaped.
//! A non-IPv4 client address can still match the exact and wildcard
//! families (they are string tests) but never a range or CIDR entry.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![forbid(unsafe_code)]

mod config;
mod decider;
mod entry;
mod error;
mod middleware;

// Re-export main types
pub use config::{AllowConfig, ConfigError};
pub use decider::{decide, AccessConfig, ConfigProvider, MatchResult, StaticConfigProvider};
pub use entry::{AllowEntry, EntryKind};
pub use error::{AccessDenied, DefaultDeniedHandler, DeniedHandler, JsonDeniedHandler};
pub use middleware::{IpAllowConfig, IpAllowLayer, IpAllowMiddleware};

/// Prelude module for convenient imports.
///
/// ```
/// use axum_ip_allow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AllowConfig, ConfigError};
    pub use crate::decider::{decide, AccessConfig, ConfigProvider, MatchResult};
    pub use crate::entry::{AllowEntry, EntryKind};
    pub use crate::error::{AccessDenied, DeniedHandler};
    pub use crate::middleware::IpAllowLayer;
}
