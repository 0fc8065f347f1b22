//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `CART_STORAGE_KEY` - Key of the persisted cart record (default: cart)
//! - `CART_STORAGE_DIR` - Directory for file-backed storage (default: none, in-memory)
//! - `CART_LOCALE` - Display locale, `ru` or `en` (default: ru)
//! - `CART_NOTIFY_SHOW_DELAY_MS` - Delay before a toast becomes visible (default: 10)
//! - `CART_NOTIFY_DURATION_MS` - How long a toast stays visible (default: 2000)
//! - `CART_NOTIFY_HIDE_MS` - Length of the hide transition (default: 300)
//! - `CART_NOTIFY_OVERLAP` - `replace` or `stack` (default: replace)
//! - `CART_RECONCILE` - Direct-edit strategy, `patch` or `rebuild` (default: patch)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::format::LocaleId;
use crate::notify::OverlapPolicy;
use crate::persistence::ConfiguredStorage;
use crate::reconcile::ReconcileStrategy;

const DEFAULT_STORAGE_KEY: &str = "cart";
const MAX_STORAGE_KEY_LENGTH: usize = 64;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key under which the cart record is stored
    pub storage_key: String,
    /// Directory for file-backed storage, if any
    pub storage_dir: Option<PathBuf>,
    /// Display locale
    pub locale: LocaleId,
    /// Notification timings and overlap policy
    pub notifications: NotificationConfig,
    /// How direct quantity edits are reconciled
    pub reconcile: ReconcileStrategy,
}

/// Notification timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Delay between inserting a toast and applying its visible state
    pub show_delay: Duration,
    /// How long a toast stays visible
    pub display_duration: Duration,
    /// Length of the hide transition before removal
    pub hide_duration: Duration,
    /// What happens when a toast is shown while another is pending
    pub overlap: OverlapPolicy,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(10),
            display_duration: Duration::from_millis(2000),
            hide_duration: Duration::from_millis(300),
            overlap: OverlapPolicy::Replace,
        }
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: None,
            locale: LocaleId::default(),
            notifications: NotificationConfig::default(),
            reconcile: ReconcileStrategy::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_key = lookup("CART_STORAGE_KEY")
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        validate_storage_key(&storage_key, "CART_STORAGE_KEY")?;

        let storage_dir = lookup("CART_STORAGE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let locale = parse_or_default(&lookup, "CART_LOCALE", LocaleId::default())?;
        let reconcile = parse_or_default(&lookup, "CART_RECONCILE", ReconcileStrategy::default())?;

        let defaults = NotificationConfig::default();
        let notifications = NotificationConfig {
            show_delay: get_millis(&lookup, "CART_NOTIFY_SHOW_DELAY_MS", defaults.show_delay)?,
            display_duration: get_millis(
                &lookup,
                "CART_NOTIFY_DURATION_MS",
                defaults.display_duration,
            )?,
            hide_duration: get_millis(&lookup, "CART_NOTIFY_HIDE_MS", defaults.hide_duration)?,
            overlap: parse_or_default(&lookup, "CART_NOTIFY_OVERLAP", defaults.overlap)?,
        };

        Ok(Self {
            storage_key,
            storage_dir,
            locale,
            notifications,
            reconcile,
        })
    }

    /// The storage backend this configuration selects.
    ///
    /// File storage under `storage_dir` when it is set, otherwise memory
    /// that lasts for the process only.
    #[must_use]
    pub fn storage(&self) -> ConfiguredStorage {
        let storage = ConfiguredStorage::new(self.storage_dir.as_deref());
        if !storage.is_durable() {
            tracing::info!("CART_STORAGE_DIR not set, cart is kept in memory only");
        }
        storage
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable with `FromStr`, falling back to a default when unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Read a millisecond duration.
fn get_millis<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Validate that a storage key is usable as a record name and file stem.
fn validate_storage_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key.is_empty() || key.len() > MAX_STORAGE_KEY_LENGTH {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be 1-{MAX_STORAGE_KEY_LENGTH} characters"),
        ));
    }

    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("contains invalid character '{c}'"),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "cart");
        assert_eq!(config.notifications.display_duration, Duration::from_millis(2000));
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CART_STORAGE_KEY", "shop_cart"),
            ("CART_STORAGE_DIR", "/tmp/carts"),
            ("CART_LOCALE", "en"),
            ("CART_NOTIFY_DURATION_MS", "500"),
            ("CART_NOTIFY_OVERLAP", "stack"),
            ("CART_RECONCILE", "rebuild"),
        ]))
        .unwrap();

        assert_eq!(config.storage_key, "shop_cart");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/carts")));
        assert_eq!(config.locale, LocaleId::En);
        assert_eq!(config.notifications.display_duration, Duration::from_millis(500));
        assert_eq!(config.notifications.overlap, OverlapPolicy::Stack);
        assert_eq!(config.reconcile, ReconcileStrategy::FullRebuild);
    }

    #[test]
    fn test_invalid_duration() {
        let result = CartConfig::from_lookup(lookup_from(&[("CART_NOTIFY_HIDE_MS", "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "CART_NOTIFY_HIDE_MS"));
    }

    #[test]
    fn test_invalid_locale() {
        let result = CartConfig::from_lookup(lookup_from(&[("CART_LOCALE", "de")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_storage_key_rejects_path_characters() {
        let result = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_KEY", "../cart")]));
        assert!(result.is_err());

        let result = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_KEY", "")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_storage_dir_is_ignored() {
        let config = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_DIR", "  ")])).unwrap();
        assert_eq!(config.storage_dir, None);
    }

    #[test]
    fn test_storage_follows_storage_dir() {
        assert!(!CartConfig::default().storage().is_durable());

        let dir = tempfile::tempdir().unwrap();
        let config = CartConfig::from_lookup(lookup_from(&[(
            "CART_STORAGE_DIR",
            dir.path().to_str().unwrap(),
        )]))
        .unwrap();

        match config.storage() {
            ConfiguredStorage::File(files) => assert_eq!(files.dir(), dir.path()),
            ConfiguredStorage::Memory(_) => panic!("expected file storage"),
        }
    }
}
