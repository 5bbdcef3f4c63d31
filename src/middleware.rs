//! Allow-list middleware implementation for axum.
//!
//! This module provides the [`IpAllowLayer`] and [`IpAllowMiddleware`]
//! types that integrate the decision engine with axum's middleware
//! system. Per request the middleware extracts the client IP, takes one
//! config snapshot from its provider, calls [`decide`](crate::decide)
//! and either forwards the request or renders a denial.

use crate::decider::{decide, AccessConfig, ConfigProvider, StaticConfigProvider};
use crate::error::{AccessDenied, DefaultDeniedHandler, DeniedHandler};

use axum::body::{Body as AxumBody, Bytes};
use axum::extract::ConnectInfo;
use axum::response::Response;
use futures_util::future::BoxFuture;
use http::{Request, StatusCode};
use http_body::Body;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Configuration for the allow-list middleware.
#[derive(Clone)]
pub struct IpAllowConfig {
    /// Source of per-request config snapshots.
    pub provider: Arc<dyn ConfigProvider>,
    /// The handler for denied requests.
    pub denied_handler: Arc<dyn DeniedHandler>,
    /// Header to check for the forwarded client IP (e.g. X-Forwarded-For).
    pub forwarded_ip_header: Option<String>,
}

/// A Tower layer that restricts requests to an IP allow-list.
///
/// # Example
/// ```no_run
/// use axum::{Router, routing::get};
/// use axum_ip_allow::{AccessConfig, IpAllowLayer};
/// use std::net::SocketAddr;
///
/// async fn admin() -> &'static str {
///     "admin area"
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let config = AccessConfig::with_allowed_ips([
///         "192.168.178.8",
///         "192.168.178.0/24",
///         "10.0.*",
///     ]);
///
///     let app = Router::new()
///         .route("/admin", get(admin))
///         .layer(IpAllowLayer::new(config));
///
///     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
///     // Important: use into_make_service_with_connect_info for IP extraction
///     axum::serve(
///         listener,
///         app.into_make_service_with_connect_info::<SocketAddr>(),
///     ).await.unwrap();
/// }
/// ```
#[derive(Clone)]
pub struct IpAllowLayer {
    config: IpAllowConfig,
}

impl IpAllowLayer {
    /// Create a new layer around a fixed config.
    ///
    /// Uses the default denied handler (plain-text 403) and no forwarded
    /// IP header.
    pub fn new(config: AccessConfig) -> Self {
        Self::with_provider(StaticConfigProvider::new(config))
    }

    /// Create a new layer around a custom config provider.
    ///
    /// The provider is asked for a snapshot once per request, which is
    /// the hot-reload seam: swap the config behind the provider and the
    /// next request sees it.
    pub fn with_provider(provider: impl ConfigProvider + 'static) -> Self {
        Self {
            config: IpAllowConfig {
                provider: Arc::new(provider),
                denied_handler: Arc::new(DefaultDeniedHandler),
                forwarded_ip_header: None,
            },
        }
    }

    /// Set a custom denied handler.
    pub fn with_denied_handler(mut self, handler: impl DeniedHandler + 'static) -> Self {
        self.config.denied_handler = Arc::new(handler);
        self
    }

    /// Set a header to extract the client IP from (e.g. X-Forwarded-For).
    ///
    /// When behind a reverse proxy, the client IP may be in a header.
    /// Whether that header is trustworthy is the deployment's concern;
    /// the middleware takes the leftmost entry as written.
    pub fn with_forwarded_ip_header(mut self, header: impl Into<String>) -> Self {
        self.config.forwarded_ip_header = Some(header.into());
        self
    }
}

impl<S> Layer<S> for IpAllowLayer {
    type Service = IpAllowMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IpAllowMiddleware {
            inner,
            config: self.config.clone(),
        }
    }
}

/// The allow-list middleware service.
#[derive(Clone)]
pub struct IpAllowMiddleware<S> {
    inner: S,
    config: IpAllowConfig,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for IpAllowMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Body + Send + 'static,
    ResBody: Body<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<axum::BoxError>,
{
    // Inner response bodies are boxed into the axum body type so denial
    // handlers can return their responses unaltered, body included.
    type Response = Response<AxumBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let config = self.config.clone();
        let mut inner = self.inner.clone();

        // Extract the client IP synchronously before entering the async block
        let client_ip = extract_client_ip(&request, config.forwarded_ip_header.as_deref());

        // One config snapshot per request; no interior re-reads
        let snapshot = config.provider.snapshot();

        let path = request.uri().path().to_string();

        Box::pin(async move {
            let Some(client_ip) = client_ip else {
                tracing::warn!("Failed to extract client IP address");
                let response = Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(AxumBody::empty())
                    .unwrap();
                return Ok(response);
            };

            let ip = client_ip.to_string();
            let result = decide(&ip, &snapshot);

            if result.allowed {
                tracing::trace!(
                    ip = %ip,
                    path = %path,
                    matched_entry = ?result.matched_entry,
                    "Allow-list permitted request"
                );
                let response = inner.call(request).await?;
                Ok(response.map(AxumBody::new))
            } else {
                tracing::info!(
                    ip = %ip,
                    path = %path,
                    "Allow-list denied request"
                );

                let denied = AccessDenied::new(ip, path);
                Ok(config.denied_handler.handle(&denied))
            }
        })
    }
}

/// Extract the client IP address from the request.
fn extract_client_ip<B>(request: &Request<B>, forwarded_header: Option<&str>) -> Option<IpAddr> {
    // First, check the forwarded header if configured
    if let Some(header_name) = forwarded_header {
        if let Some(value) = request.headers().get(header_name) {
            if let Ok(s) = value.to_str() {
                // X-Forwarded-For format: client, proxy1, proxy2, ...
                // Take the first (leftmost) IP
                if let Some(first_ip) = s.split(',').next() {
                    if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                        return Some(ip);
                    }
                }
            }
        }
    }

    // Fall back to ConnectInfo
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_connect_info(addr: &str) -> Request<()> {
        let mut request = Request::builder().uri("/admin").body(()).unwrap();
        let socket: SocketAddr = addr.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(socket));
        request
    }

    #[test]
    fn test_extract_ip_from_connect_info() {
        let request = request_with_connect_info("192.168.1.10:54321");
        let ip = extract_client_ip(&request, None);
        assert_eq!(ip, Some("192.168.1.10".parse().unwrap()));
    }

    #[test]
    fn test_extract_ip_prefers_forwarded_header() {
        let mut request = request_with_connect_info("10.0.0.1:80");
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let ip = extract_client_ip(&request, Some("x-forwarded-for"));
        assert_eq!(ip, Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_extract_ip_falls_back_on_bad_header() {
        let mut request = request_with_connect_info("10.0.0.1:80");
        request
            .headers_mut()
            .insert("x-forwarded-for", "not an ip".parse().unwrap());
        let ip = extract_client_ip(&request, Some("x-forwarded-for"));
        assert_eq!(ip, Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_ip_missing() {
        let request = Request::builder().uri("/admin").body(()).unwrap();
        assert_eq!(extract_client_ip(&request, None), None);
    }

    #[test]
    fn test_default_denied_handler_status() {
        let denied = AccessDenied::new("203.0.113.7", "/admin");
        let response = DefaultDeniedHandler.handle(&denied);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    async fn call_as(addr: &str, layer: IpAllowLayer) -> Response {
        use axum::{routing::get, Router};
        use tower::ServiceExt;

        let app = Router::new()
            .route("/admin", get(|| async { "admin area" }))
            .layer(layer);

        let mut request = Request::builder()
            .uri("/admin")
            .body(AxumBody::empty())
            .unwrap();
        let socket: SocketAddr = addr.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(socket));

        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_denied_response_carries_the_default_body() {
        let config = AccessConfig::with_allowed_ips(["10.9.9.9"]);
        let response = call_as("203.0.113.7:443", IpAllowLayer::new(config)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], crate::error::DENIED_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_denied_response_carries_the_json_body() {
        use crate::error::JsonDeniedHandler;

        let config = AccessConfig::with_allowed_ips(["10.9.9.9"]);
        let layer = IpAllowLayer::new(config).with_denied_handler(JsonDeniedHandler::new());
        let response = call_as("203.0.113.7:443", layer).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "access_denied");
    }

    #[tokio::test]
    async fn test_allowed_response_passes_through() {
        let config = AccessConfig::with_allowed_ips(["10.0.0.1"]);
        let response = call_as("10.0.0.1:54321", IpAllowLayer::new(config)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"admin area");
    }
}
