use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User-configurable preferences of the sales tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// Display amounts with a decimal comma (`12,50`) instead of a point.
    #[serde(default = "Config::default_decimal_comma")]
    pub decimal_comma: bool,
    #[serde(default = "Config::default_store_key")]
    pub store_key: String,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the sale store and its backups.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            decimal_comma: Self::default_decimal_comma(),
            store_key: Self::default_store_key(),
            backup_retention: Self::default_backup_retention(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "R$".into()
    }

    pub fn default_decimal_comma() -> bool {
        true
    }

    pub fn default_store_key() -> String {
        "vendas".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// Directory holding the store, falling back to `base` when unset.
    pub fn resolve_data_root(&self, base: &std::path::Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| base.join("data"))
    }

    /// Formats an amount for display, e.g. `R$ 12,50`.
    pub fn format_amount(&self, amount: f64) -> String {
        let fixed = format!("{amount:.2}");
        let fixed = if self.decimal_comma {
            fixed.replace('.', ",")
        } else {
            fixed
        };
        format!("{} {}", self.currency_symbol, fixed)
    }
}
