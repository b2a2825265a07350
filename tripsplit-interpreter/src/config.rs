use std::env;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_CURRENCY: &str = "₹";
const DEFAULT_DISPLAY_SCALE: u32 = 2;
const MAX_DISPLAY_SCALE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("TRIPSPLIT_DISPLAY_SCALE must be an integer between 0 and {max} (got '{value}')")]
    InvalidDisplayScale { value: String, max: u32 },
}

/// Display settings read from the environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub currency: String,
    pub display_scale: u32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            display_scale: DEFAULT_DISPLAY_SCALE,
        }
    }
}

impl InterpreterConfig {
    /// Loads `.env` if present, then reads `TRIPSPLIT_CURRENCY` and
    /// `TRIPSPLIT_DISPLAY_SCALE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_values(
            env::var("TRIPSPLIT_CURRENCY").ok(),
            env::var("TRIPSPLIT_DISPLAY_SCALE").ok(),
        )
    }

    fn from_values(currency: Option<String>, scale: Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let currency = currency.unwrap_or(defaults.currency);
        let display_scale = match scale {
            None => defaults.display_scale,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(scale) if scale <= MAX_DISPLAY_SCALE => scale,
                _ => {
                    return Err(ConfigError::InvalidDisplayScale {
                        value: raw,
                        max: MAX_DISPLAY_SCALE,
                    });
                }
            },
        };

        Ok(Self {
            currency,
            display_scale,
        })
    }
}

/// Initialize logging and tracing
///
/// Filtered by `RUST_LOG`; logs go to stderr so the report on stdout stays clean.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
