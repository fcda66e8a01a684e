//! ============================================================================
//! Storefront Configuration - Environment-driven settings
//! ============================================================================
//! NEXUSGEAR_DB_PATH              local store file (default ~/.nexusgear/storefront.redb)
//! NEXUSGEAR_CATALOG              JSON catalog file (default: bundled dataset)
//! NEXUSGEAR_AUTH_LATENCY_MS      simulated auth delay (default 1500)
//! NEXUSGEAR_SELLER_LATENCY_MS    simulated seller sign-in delay (default 1000)
//! NEXUSGEAR_AUTH_TIMEOUT_MS      upper bound on an auth call (default 10000)
//! NEXUSGEAR_CHECKOUT_LATENCY_MS  simulated payment delay (default 2000)
//! ============================================================================

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::catalog::Catalog;
use crate::pending::{
    SimulatedLatency, DEFAULT_AUTH_LATENCY_MS, DEFAULT_AUTH_TIMEOUT_MS,
    DEFAULT_CHECKOUT_LATENCY_MS, DEFAULT_SELLER_LATENCY_MS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    pub db_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub auth_latency_ms: u64,
    pub seller_latency_ms: u64,
    pub auth_timeout_ms: u64,
    pub checkout_latency_ms: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            catalog_path: None,
            auth_latency_ms: DEFAULT_AUTH_LATENCY_MS,
            seller_latency_ms: DEFAULT_SELLER_LATENCY_MS,
            auth_timeout_ms: DEFAULT_AUTH_TIMEOUT_MS,
            checkout_latency_ms: DEFAULT_CHECKOUT_LATENCY_MS,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable numbers fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, default: u64| match lookup(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
                default
            }),
            None => default,
        };

        Self {
            db_path: lookup("NEXUSGEAR_DB_PATH").map(PathBuf::from),
            catalog_path: lookup("NEXUSGEAR_CATALOG").map(PathBuf::from),
            auth_latency_ms: millis("NEXUSGEAR_AUTH_LATENCY_MS", defaults.auth_latency_ms),
            seller_latency_ms: millis(
                "NEXUSGEAR_SELLER_LATENCY_MS",
                defaults.seller_latency_ms,
            ),
            auth_timeout_ms: millis("NEXUSGEAR_AUTH_TIMEOUT_MS", defaults.auth_timeout_ms),
            checkout_latency_ms: millis(
                "NEXUSGEAR_CHECKOUT_LATENCY_MS",
                defaults.checkout_latency_ms,
            ),
        }
    }

    pub fn auth_latency(&self) -> SimulatedLatency {
        SimulatedLatency::from_millis(self.auth_latency_ms)
    }

    pub fn seller_latency(&self) -> SimulatedLatency {
        SimulatedLatency::from_millis(self.seller_latency_ms)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    pub fn checkout_latency(&self) -> SimulatedLatency {
        SimulatedLatency::from_millis(self.checkout_latency_ms)
    }

    /// The configured catalog file, or the bundled dataset
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Catalog::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(|_| None);
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.auth_latency().duration(), Duration::from_millis(1500));
        assert_eq!(config.seller_latency().duration(), Duration::from_millis(1000));
    }

    #[test]
    fn test_reads_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("NEXUSGEAR_DB_PATH", "/tmp/store.redb"),
            ("NEXUSGEAR_AUTH_LATENCY_MS", "0"),
            ("NEXUSGEAR_AUTH_TIMEOUT_MS", " 250 "),
            ("NEXUSGEAR_SELLER_LATENCY_MS", "5"),
        ]));
        assert_eq!(config.seller_latency_ms, 5);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/store.redb")));
        assert_eq!(config.auth_latency_ms, 0);
        assert_eq!(config.auth_timeout(), Duration::from_millis(250));
        assert_eq!(config.checkout_latency_ms, DEFAULT_CHECKOUT_LATENCY_MS);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[(
            "NEXUSGEAR_CHECKOUT_LATENCY_MS",
            "soon",
        )]));
        assert_eq!(config.checkout_latency_ms, DEFAULT_CHECKOUT_LATENCY_MS);
    }

    #[test]
    fn test_bundled_catalog_by_default() {
        let catalog = StorefrontConfig::default().load_catalog().unwrap();
        assert!(!catalog.is_empty());
    }
}
