use crate::error::ConfigError;
use crate::money::Amount;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ART_LEDGER_DB_PATH";
pub const MIN_INCREMENT_ENV: &str = "ART_LEDGER_MIN_INCREMENT";
pub const BID_DURATIONS_ENV: &str = "ART_LEDGER_BID_DURATIONS";
pub const DEFAULT_DURATION_ENV: &str = "ART_LEDGER_DEFAULT_DURATION_DAYS";

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub db_path: PathBuf,
    /// Amount a new bid must add on top of the current high value, in minor units.
    pub min_increment: Amount,
    /// Listing durations offered to artists, in days.
    pub bid_durations_days: Vec<u32>,
    pub default_bid_duration_days: u32,
    /// Open the database as temporary; it is removed when dropped.
    pub temporary: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("art-ledger.db"),
            min_increment: Amount::from_minor(1),
            bid_durations_days: vec![1, 3, 5, 7, 14, 30],
            default_bid_duration_days: 7,
            temporary: false,
        }
    }
}

impl LedgerConfig {
    /// Config from `ART_LEDGER_*` environment variables, defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LedgerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let db_path = lookup(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let min_increment = match lookup(MIN_INCREMENT_ENV) {
            Some(raw) => Amount::from_minor(parse(MIN_INCREMENT_ENV, &raw)?),
            None => defaults.min_increment,
        };

        let bid_durations_days = match lookup(BID_DURATIONS_ENV) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| parse(BID_DURATIONS_ENV, part))
                .collect::<Result<Vec<u32>, _>>()?,
            None => defaults.bid_durations_days,
        };

        let default_bid_duration_days = match lookup(DEFAULT_DURATION_ENV) {
            Some(raw) => parse(DEFAULT_DURATION_ENV, &raw)?,
            None => defaults.default_bid_duration_days,
        };

        let config = Self {
            db_path,
            min_increment,
            bid_durations_days,
            default_bid_duration_days,
            temporary: false,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_increment.is_positive() {
            return Err(ConfigError::ZeroIncrement);
        }
        if self.bid_durations_days.is_empty() || self.bid_durations_days.contains(&0) {
            return Err(ConfigError::NoDurations);
        }
        if !self.offers_duration(self.default_bid_duration_days) {
            return Err(ConfigError::DefaultNotOffered(
                self.default_bid_duration_days,
            ));
        }
        Ok(())
    }

    pub fn offers_duration(&self, days: u32) -> bool {
        self.bid_durations_days.contains(&days)
    }

    /// A throwaway config for tests and demos.
    pub fn temporary() -> Self {
        Self {
            temporary: true,
            ..Self::default()
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Unparsable {
        key,
        value: raw.to_string(),
    })
}
