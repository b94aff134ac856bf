//! User settings for the Kardex viewer
//!
//! Settings are read from `config.json` when present. Every field has a
//! default, so a partial file only overrides what it names. The viewer never
//! writes the file.

use serde::{Deserialize, Serialize};

use super::paths::KardexPaths;
use crate::error::KardexError;

/// Source column names for the typed fields of a movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Store identifier
    pub company_code: String,
    /// Operator/process code
    pub operator_code: String,
    /// Product sequence identifier
    pub product_id: String,
    /// Movement date (dd/mm/yyyy)
    pub entry_date: String,
    /// Quantity (comma decimal)
    pub quantity: String,
    /// Invoice value (comma decimal)
    pub value: String,
    /// Storage location
    pub location: String,
    /// Movement type (E/S)
    pub movement_type: String,
    /// Managerial stock flag (S/N)
    pub managerial_stock: String,
    /// Fiscal stock flag (S/N)
    pub fiscal_stock: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            company_code: "NROEMPRESA".to_string(),
            operator_code: "CODGERALOPER".to_string(),
            product_id: "SEQPRODUTO".to_string(),
            entry_date: "DTAENTRADASAIDA".to_string(),
            quantity: "QTDLANCTO".to_string(),
            value: "VALORVLRNF".to_string(),
            location: "LOCAL".to_string(),
            movement_type: "TIPLANCTO".to_string(),
            managerial_stock: "GERALTERACAOESTQ".to_string(),
            fiscal_stock: "GERALTERACAOESTQFISC".to_string(),
        }
    }
}

impl ColumnNames {
    /// All required column names, in report order
    pub fn required(&self) -> [&str; 10] {
        [
            &self.company_code,
            &self.operator_code,
            &self.product_id,
            &self.entry_date,
            &self.quantity,
            &self.value,
            &self.location,
            &self.movement_type,
            &self.managerial_stock,
            &self.fiscal_stock,
        ]
    }
}

/// User settings for the Kardex viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Field delimiter of the input CSV
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Source column names
    #[serde(default)]
    pub columns: ColumnNames,

    /// Decimal places for the totals
    #[serde(default = "default_decimal_places")]
    pub decimal_places: usize,

    /// Default log level (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_delimiter() -> char {
    ';'
}

fn default_decimal_places() -> usize {
    3
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            columns: ColumnNames::default(),
            decimal_places: default_decimal_places(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_default(paths: &KardexPaths) -> Result<Self, KardexError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| KardexError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| KardexError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings can drive the loader
    pub fn validate(&self) -> Result<(), KardexError> {
        if !self.delimiter.is_ascii() {
            return Err(KardexError::Config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        if self.columns.required().iter().any(|c| c.trim().is_empty()) {
            return Err(KardexError::Config("Column names must not be empty".into()));
        }
        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }
}
