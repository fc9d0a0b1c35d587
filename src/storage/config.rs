use super::Result;
use crate::error::StorageError;
use crate::layout::units::{
    DEFAULT_GRID_UNIT, DEFAULT_LARGE_SPACING, DEFAULT_SMALL_SPACING, Units,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub units: UnitSizes,
}

/// Host-shell unit sizes used to resolve script expressions like
/// `2 * gridUnit`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnitSizes {
    pub grid_unit: f64,
    pub small_spacing: f64,
    pub large_spacing: f64,
}

impl Default for UnitSizes {
    fn default() -> Self {
        Self {
            grid_unit: DEFAULT_GRID_UNIT,
            small_spacing: DEFAULT_SMALL_SPACING,
            large_spacing: DEFAULT_LARGE_SPACING,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: UnitSizes::default(),
        }
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|err| StorageError::ConfigParseError {
                message: err.to_string(),
            })?;

        Ok(config)
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|_| StorageError::ConfigSaveFailed)?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;

        let app_config_dir = config_dir.join("layoutctl");
        let config_file = app_config_dir.join("config.toml");

        Ok(config_file)
    }

    /// Resolver seeded with the persisted unit sizes.
    pub fn to_units(&self) -> Units {
        Units::empty()
            .with_unit("gridUnit", self.units.grid_unit)
            .with_unit("smallSpacing", self.units.small_spacing)
            .with_unit("largeSpacing", self.units.large_spacing)
    }

    /// Set a configuration value by CLI key (`config set <key> <value>`).
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed: f64 = value.parse().map_err(|_| StorageError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        if !parsed.is_finite() || parsed <= 0.0 {
            return Err(StorageError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        match key {
            "grid_unit" => self.units.grid_unit = parsed,
            "small_spacing" => self.units.small_spacing = parsed,
            "large_spacing" => self.units.large_spacing = parsed,
            _ => {
                return Err(StorageError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}
