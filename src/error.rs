//! Error and denial-response types.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use std::fmt;

/// The body used when no custom denial message is configured.
///
/// Deliberately indistinguishable from a missing page so the restricted
/// area is not advertised to denied clients.
pub(crate) const DENIED_BODY: &str = "The requested page could not be found.";

/// Error returned when a client IP is denied by the allow-list.
#[derive(Debug, Clone)]
pub struct AccessDenied {
    /// The client IP that was denied.
    pub ip: String,
    /// The path that was requested.
    pub path: String,
    /// Optional custom message.
    pub message: Option<String>,
}

impl AccessDenied {
    /// Create a new access denied error.
    pub fn new(ip: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            path: path.into(),
            message: None,
        }
    }

    /// Add a custom message to the error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}", msg),
            None => write!(f, "Access denied for {} to path '{}'", self.ip, self.path),
        }
    }
}

impl std::error::Error for AccessDenied {}

impl IntoResponse for AccessDenied {
    fn into_response(self) -> Response {
        let body = match &self.message {
            Some(msg) => msg.clone(),
            None => DENIED_BODY.to_string(),
        };
        (StatusCode::FORBIDDEN, body).into_response()
    }
}

/// Custom response handler for denied requests.
///
/// Implement this trait to customize the response when an IP is denied,
/// e.g. to render a branded error page.
///
/// # Example
/// ```
/// use axum_ip_allow::{AccessDenied, DeniedHandler};
/// use axum::response::{IntoResponse, Response};
/// use http::StatusCode;
///
/// struct PlainHandler;
///
/// impl DeniedHandler for PlainHandler {
///     fn handle(&self, denied: &AccessDenied) -> Response {
///         (StatusCode::FORBIDDEN, "nope").into_response()
///     }
/// }
/// ```
pub trait DeniedHandler: Send + Sync {
    /// Handle a denied request and produce the response to send.
    fn handle(&self, denied: &AccessDenied) -> Response;
}

/// Default handler: plain-text 403 with a "page could not be found" body.
#[derive(Debug, Clone, Default)]
pub struct DefaultDeniedHandler;

impl DeniedHandler for DefaultDeniedHandler {
    fn handle(&self, denied: &AccessDenied) -> Response {
        denied.clone().into_response()
    }
}

/// Handler that returns a JSON error response.
#[derive(Debug, Clone, Default)]
pub struct JsonDeniedHandler {
    include_details: bool,
}

impl JsonDeniedHandler {
    /// Create a new JSON denied handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the denied IP and path in the response.
    ///
    /// This reveals to the caller that IP filtering is in place, which
    /// may be undesirable in production.
    pub fn with_details(mut self) -> Self {
        self.include_details = true;
        self
    }
}

impl DeniedHandler for JsonDeniedHandler {
    fn handle(&self, denied: &AccessDenied) -> Response {
        use axum::Json;

        let body = if self.include_details {
            serde_json::json!({
                "error": "access_denied",
                "message": denied.message.as_deref().unwrap_or(DENIED_BODY),
                "ip": denied.ip,
                "path": denied.path,
            })
        } else {
            serde_json::json!({
                "error": "access_denied",
                "message": denied.message.as_deref().unwrap_or(DENIED_BODY),
            })
        };

        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}
