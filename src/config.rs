//! Runtime settings.
//!
//! Layered lowest to highest: built-in defaults, `tally.toml` in the working
//! directory, an explicit config file, then `TALLY_*` environment variables.
//! Command-line flags are applied on top by the caller.

use std::path::Path;

use serde::Deserialize;

/// Settings for a ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: String,
    /// Key the ledger is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Symbol printed in front of money figures.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_database() -> String {
    "tally.db".to_string()
}

fn default_storage_key() -> String {
    "localStorageTransactions".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database(),
            storage_key: default_storage_key(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Settings {
    /// Loads settings from the optional config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_file` is missing or any source
    /// cannot be parsed.
    pub fn load(config_file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_file, config::Environment::with_prefix("TALLY"))
    }

    fn load_with_env(
        config_file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("tally").required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Settings pointing at a specific database, everything else default.
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }
}
