//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Hosting platforms hand the listen port
//! over in `PORT`, so that is the primary knob.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::RelayError;
use crate::service::ForwardingPolicy;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Upper bound for `IDLE_TIMEOUT_SECS` (one week).
pub const MAX_IDLE_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// How non-join messages are forwarded.
    pub policy: ForwardingPolicy,

    /// Frames buffered per connection before sends to it are dropped.
    pub outbound_queue_capacity: usize,

    /// Close connections that send nothing for this long. `None` disables.
    pub idle_timeout: Option<Duration>,

    /// Directory served as the fallback route (the game page).
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            policy: ForwardingPolicy::RoomScoped,
            outbound_queue_capacity: 64,
            idle_timeout: None,
            static_dir: None,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `PORT`, `BIND_HOST` or
    /// `RELAY_POLICY` is set to an unparsable value.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Missing keys fall back to defaults. Numeric tuning values that fail
    /// to parse also fall back; addresses and the policy do not.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] on an invalid port, host or policy.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| RelayError::Config(format!("invalid PORT {raw:?}: {e}")))?,
            None => DEFAULT_PORT,
        };
        let host = match lookup("BIND_HOST") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|e| RelayError::Config(format!("invalid BIND_HOST {raw:?}: {e}")))?,
            None => defaults.listen_addr.ip(),
        };
        let policy = match lookup("RELAY_POLICY") {
            Some(raw) => raw.trim().parse()?,
            None => defaults.policy,
        };

        let outbound_queue_capacity =
            parse_or(&lookup, "OUTBOUND_QUEUE_CAPACITY", defaults.outbound_queue_capacity).max(1);
        let idle_timeout = match parse_or(&lookup, "IDLE_TIMEOUT_SECS", 0u64) {
            0 => None,
            secs => Some(Duration::from_secs(secs.min(MAX_IDLE_TIMEOUT_SECS))),
        };
        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            policy,
            outbound_queue_capacity,
            idle_timeout,
            static_dir,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<RelayConfig, RelayError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RelayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let Ok(config) = load(&[]) else {
            panic!("defaults should load");
        };
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
        assert_eq!(config.policy, ForwardingPolicy::RoomScoped);
        assert!(config.idle_timeout.is_none());
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn port_and_host_are_combined() {
        let Ok(config) = load(&[("PORT", "9001"), ("BIND_HOST", "127.0.0.1")]) else {
            panic!("valid config");
        };
        assert_eq!(config.listen_addr, SocketAddr::from(([127, 0, 0, 1], 9001)));
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert!(matches!(load(&[("PORT", "http")]), Err(RelayError::Config(_))));
    }

    #[test]
    fn broadcast_policy_and_tuning() {
        let Ok(config) = load(&[
            ("RELAY_POLICY", "broadcast"),
            ("OUTBOUND_QUEUE_CAPACITY", "0"),
            ("IDLE_TIMEOUT_SECS", "30"),
            ("STATIC_DIR", "./public"),
        ]) else {
            panic!("valid config");
        };
        assert_eq!(config.policy, ForwardingPolicy::Broadcast);
        assert_eq!(config.outbound_queue_capacity, 1);
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.static_dir, Some(PathBuf::from("./public")));
    }

    #[test]
    fn huge_idle_timeout_is_clamped() {
        let max = u64::MAX.to_string();
        let Ok(config) = load(&[("IDLE_TIMEOUT_SECS", max.as_str())]) else {
            panic!("valid config");
        };
        assert_eq!(
            config.idle_timeout,
            Some(Duration::from_secs(MAX_IDLE_TIMEOUT_SECS))
        );
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(load(&[("RELAY_POLICY", "mesh")]).is_err());
    }
}
