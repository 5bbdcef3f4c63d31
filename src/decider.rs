//! The access decision over an allow-list configuration.
//!
//! [`decide`] is a pure function from `(client IP, config)` to a
//! [`MatchResult`]. It takes a single config snapshot per call, holds no
//! state, performs no I/O and never fails; concurrent calls need no
//! coordination.
//!
//! Families are tried in a fixed order, short-circuiting on the first
//! match: exact, dash range, CIDR, wildcard.

use crate::entry::AllowEntry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Allow-list restriction settings.
///
/// Both fields default to the inert state: `enabled = false` means the
/// restriction is switched off and **all traffic is allowed**, and an
/// empty `allowed_ips` list likewise allows everything.
///
/// That second default is an easy operator trap: enabling the feature
/// while forgetting to populate the list leaves access unrestricted. It
/// is preserved here because changing it would change observable
/// security behavior; see the crate docs.
///
/// # Example
/// ```
/// use axum_ip_allow::AccessConfig;
///
/// let config = AccessConfig::with_allowed_ips(["192.168.1.0/24", "10.0.0.5"]);
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Whether the restriction is active at all. Defaults to `false`,
    /// which allows all traffic.
    #[serde(default)]
    pub enabled: bool,
    /// Allow-list patterns in any of the four notations. Not validated
    /// or normalized at load time; classification happens at match time.
    #[serde(default)]
    pub allowed_ips: Vec<String>,
}

impl AccessConfig {
    /// An inert config: disabled, empty list, everything allowed.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// An enabled config with the given allow-list entries.
    pub fn with_allowed_ips<I, S>(allowed_ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            allowed_ips: allowed_ips.into_iter().map(Into::into).collect(),
        }
    }
}

/// The outcome of one access decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the client is permitted.
    pub allowed: bool,
    /// The raw allow-list entry that caused the allow, when a concrete
    /// entry matched. `None` for the disabled and empty-list bypasses,
    /// and always `None` on deny.
    pub matched_entry: Option<String>,
}

impl MatchResult {
    fn allow() -> Self {
        Self {
            allowed: true,
            matched_entry: None,
        }
    }

    fn allow_by(entry: &AllowEntry) -> Self {
        Self {
            allowed: true,
            matched_entry: Some(entry.raw().to_string()),
        }
    }

    fn deny() -> Self {
        Self {
            allowed: false,
            matched_entry: None,
        }
    }
}

/// Decide whether `client_ip` is permitted under `config`.
///
/// 1. Restriction disabled: allow.
/// 2. Empty allow-list: allow (no restriction configured).
/// 3. Otherwise the first matching family wins, in the order
///    exact, dash range, CIDR, wildcard. Entry order within a family
///    does not affect whether a client is allowed, only which entry is
///    reported as matched.
/// 4. Nothing matched: deny.
///
/// Malformed entries never match and never raise; the function cannot
/// fail.
///
/// # Example
/// ```
/// use axum_ip_allow::{decide, AccessConfig};
///
/// let config = AccessConfig::with_allowed_ips(["192.168.1.50-100"]);
/// assert!(decide("192.168.1.75", &config).allowed);
/// assert!(!decide("192.168.1.101", &config).allowed);
/// ```
pub fn decide(client_ip: &str, config: &AccessConfig) -> MatchResult {
    if !config.enabled || config.allowed_ips.is_empty() {
        return MatchResult::allow();
    }

    let entries: Vec<AllowEntry> = config.allowed_ips.iter().map(AllowEntry::new).collect();

    if let Some(entry) = entries.iter().find(|e| e.matches_exact(client_ip)) {
        return MatchResult::allow_by(entry);
    }
    if let Some(entry) = entries.iter().find(|e| e.matches_range(client_ip)) {
        return MatchResult::allow_by(entry);
    }
    if let Some(entry) = entries.iter().find(|e| e.matches_cidr(client_ip)) {
        return MatchResult::allow_by(entry);
    }
    if let Some(entry) = entries.iter().find(|e| e.matches_wildcard(client_ip)) {
        return MatchResult::allow_by(entry);
    }

    MatchResult::deny()
}

/// Source of config snapshots for the middleware.
///
/// The engine reads one snapshot per decision, so a provider backed by a
/// swappable cell (e.g. `arc-swap`, a watch channel, or a plain
/// `RwLock`) gives hot reload between requests with no coordination
/// inside the engine.
///
/// # Example
/// ```
/// use axum_ip_allow::{AccessConfig, ConfigProvider};
/// use std::sync::{Arc, RwLock};
///
/// struct ReloadableProvider {
///     current: RwLock<Arc<AccessConfig>>,
/// }
///
/// impl ConfigProvider for ReloadableProvider {
///     fn snapshot(&self) -> Arc<AccessConfig> {
///         self.current.read().unwrap().clone()
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync {
    /// Return the config to use for one decision.
    fn snapshot(&self) -> Arc<AccessConfig>;
}

/// A provider that always returns the same fixed config.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    config: Arc<AccessConfig>,
}

impl StaticConfigProvider {
    /// Create a provider around a fixed config.
    pub fn new(config: AccessConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn snapshot(&self) -> Arc<AccessConfig> {
        self.config.clone()
    }
}

impl ConfigProvider for Arc<dyn ConfigProvider> {
    fn snapshot(&self) -> Arc<AccessConfig> {
        (**self).snapshot()
    }
}
