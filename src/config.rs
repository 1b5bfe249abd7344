// Configuration module
use crate::error::{AppErr, Result};
use crate::existence::ExistenceMode;
use crate::ids::IdStrategy;
use crate::input::parse::DATE_FORMAT;
use crate::workflow::InsertMode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Settings read from an optional TOML file. Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub validation: ValidationSettings,
    pub ids: IdSettings,
    pub existence: ExistenceSettings,
    pub insert: InsertSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Create the file and the airline tables when they are missing.
    pub create_schema: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Invalid answers allowed per prompt before the workflow is abandoned.
    /// Unset means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    /// chrono format used to read dates from the user.
    pub date_format: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_retries: None,
            date_format: DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdSettings {
    pub strategy: IdStrategy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExistenceSettings {
    /// Answer existence checks by result column count. Reports missing rows as present.
    pub compat_column_count: bool,
}

impl ExistenceSettings {
    pub fn mode(&self) -> ExistenceMode {
        if self.compat_column_count {
            ExistenceMode::ColumnCountCompat
        } else {
            ExistenceMode::RowCount
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertSettings {
    pub mode: InsertMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppErr::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| AppErr::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.validation.max_retries == Some(0) {
            return Err(AppErr::Config(
                "validation.max_retries must be at least 1".to_string(),
            ));
        }
        // 형식 문자열이 날짜를 왕복할 수 있는지 확인
        let format = &self.validation.date_format;
        let sample = NaiveDate::default();
        let mut probe = String::new();
        let round_trips = write!(probe, "{}", sample.format(format)).is_ok()
            && NaiveDate::parse_from_str(&probe, format) == Ok(sample);
        if !round_trips {
            return Err(AppErr::Config(format!(
                "validation.date_format '{format}' cannot express a full date"
            )));
        }
        Ok(())
    }
}
