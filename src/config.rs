//! Configuration
//!
//! Application settings read from an optional YAML file. Every field has a default, so an
//! empty file (or no file at all) yields the stock restaurant setup.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::storage::CART_STORAGE_KEY,
    notifications::NotificationSettings,
    order::{
        channel::{DEFAULT_CHANNEL_BASE_URL, DEFAULT_DESTINATION},
        message::{DEFAULT_RESTAURANT_NAME, DEFAULT_UTC_OFFSET_HOURS, OrderTemplate},
    },
};

/// Default directory the cart is persisted in.
pub const DEFAULT_DATA_DIR: &str = ".encebollado";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        /// Settings file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The settings file is not valid YAML for [`Settings`].
    #[error("Failed to parse settings: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Restaurant and order hand-off
    pub restaurant: RestaurantSettings,

    /// Notification lifetimes
    pub notifications: NotificationSettings,

    /// Cart persistence
    pub storage: StorageSettings,
}

impl Settings {
    /// Parse settings from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::Yaml`] if the document does not describe valid settings.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_norway::from_str(contents)?)
    }

    /// Read settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&contents)
    }
}

/// Restaurant and order hand-off settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantSettings {
    /// Name shown in order messages
    pub name: String,

    /// Contact identifier orders are sent to
    pub destination: String,

    /// Base URL of the messaging service
    pub channel_base_url: String,

    /// UTC offset order timestamps are rendered in, in whole hours
    pub utc_offset_hours: i8,
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_RESTAURANT_NAME.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            channel_base_url: DEFAULT_CHANNEL_BASE_URL.to_string(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl RestaurantSettings {
    /// Order message template for this restaurant.
    #[must_use]
    pub fn template(&self) -> OrderTemplate {
        OrderTemplate {
            restaurant_name: self.name.clone(),
            utc_offset_hours: self.utc_offset_hours,
        }
    }
}

/// Cart persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the persisted cart
    pub dir: PathBuf,

    /// Key the cart is stored under
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DATA_DIR),
            key: CART_STORAGE_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() -> TestResult {
        let settings = Settings::from_yaml("")?;

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.restaurant.destination, "593987654321");
        assert_eq!(settings.restaurant.channel_base_url, "https://wa.me");
        assert_eq!(settings.restaurant.utc_offset_hours, -5);
        assert_eq!(settings.notifications.error_ms, 5_000);
        assert_eq!(settings.storage.key, "casa-encebollado-cart");

        Ok(())
    }

    #[test]
    fn partial_document_keeps_other_defaults() -> TestResult {
        let settings = Settings::from_yaml(concat!(
            "restaurant:\n",
            "  destination: \"593900000000\"\n",
            "notifications:\n",
            "  success_ms: 1500\n",
        ))?;

        assert_eq!(settings.restaurant.destination, "593900000000");
        assert_eq!(settings.restaurant.name, "La Casa del Encebollado");
        assert_eq!(settings.notifications.success_ms, 1_500);
        assert_eq!(settings.notifications.info_ms, 3_000);
        assert_eq!(settings.storage, StorageSettings::default());

        Ok(())
    }

    #[test]
    fn template_follows_restaurant_settings() {
        let restaurant = RestaurantSettings {
            name: "Encebollados Don Pepe".to_string(),
            utc_offset_hours: -6,
            ..RestaurantSettings::default()
        };

        let template = restaurant.template();

        assert_eq!(template.restaurant_name, "Encebollados Don Pepe");
        assert_eq!(template.utc_offset_hours, -6);
    }

    #[test]
    fn load_reads_files_and_reports_missing_ones() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("settings.yml");

        fs::write(&path, "storage:\n  dir: /tmp/carts\n")?;

        assert_eq!(Settings::load(&path)?.storage.dir, PathBuf::from("/tmp/carts"));
        assert!(matches!(
            Settings::load(&dir.path().join("missing.yml")),
            Err(ConfigError::Io { .. })
        ));

        Ok(())
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            Settings::from_yaml("restaurant: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
