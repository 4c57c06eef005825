use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pricing: PricingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            pricing: PricingConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Output style for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Whether the cleaning fee is charged once or once per rented unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningFeeMode {
    PerBooking,
    PerUnit,
}

impl CleaningFeeMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per_booking" | "booking" => Some(Self::PerBooking),
            "per_unit" | "unit" => Some(Self::PerUnit),
            _ => None,
        }
    }
}

/// Fixed per-stay fee parameters. All amounts are whole euros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingConfig {
    pub cleaning_fee: u32,
    pub cleaning_fee_mode: CleaningFeeMode,
    /// Tourist tax per taxable guest per night.
    pub tourist_tax_rate: u32,
    /// Municipalities usually stop charging the tax after a number of nights.
    pub tourist_tax_max_nights: Option<u32>,
    /// Share of the total due at booking time, in percent.
    pub deposit_percent: u8,
    /// Refundable security deposit, reported next to the total but never part of it.
    pub security_deposit: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cleaning_fee: 50,
            cleaning_fee_mode: CleaningFeeMode::PerBooking,
            tourist_tax_rate: 1,
            tourist_tax_max_nights: None,
            deposit_percent: 30,
            security_deposit: 200,
        }
    }
}

impl PricingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cleaning_fee_mode = match env::var("QUOTE_CLEANING_FEE_MODE") {
            Ok(raw) => CleaningFeeMode::parse(&raw).ok_or(ConfigError::InvalidValue {
                variable: "QUOTE_CLEANING_FEE_MODE",
                value: raw,
            })?,
            Err(_) => defaults.cleaning_fee_mode,
        };

        let deposit_percent = env_number("QUOTE_DEPOSIT_PERCENT", defaults.deposit_percent)?;
        if deposit_percent > 100 {
            return Err(ConfigError::InvalidValue {
                variable: "QUOTE_DEPOSIT_PERCENT",
                value: deposit_percent.to_string(),
            });
        }

        let tourist_tax_max_nights = match env::var("QUOTE_TOURIST_TAX_MAX_NIGHTS") {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(raw.trim().parse::<u32>().map_err(|_| {
                ConfigError::InvalidValue {
                    variable: "QUOTE_TOURIST_TAX_MAX_NIGHTS",
                    value: raw,
                }
            })?),
            Err(_) => defaults.tourist_tax_max_nights,
        };

        Ok(Self {
            cleaning_fee: env_number("QUOTE_CLEANING_FEE", defaults.cleaning_fee)?,
            cleaning_fee_mode,
            tourist_tax_rate: env_number("QUOTE_TOURIST_TAX_RATE", defaults.tourist_tax_rate)?,
            tourist_tax_max_nights,
            deposit_percent,
            security_deposit: env_number("QUOTE_SECURITY_DEPOSIT", defaults.security_deposit)?,
        })
    }
}

fn env_number<T>(variable: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue {
                variable,
                value: raw,
            }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { variable, value } => {
                write!(f, "{variable} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "QUOTE_CLEANING_FEE",
            "QUOTE_CLEANING_FEE_MODE",
            "QUOTE_TOURIST_TAX_RATE",
            "QUOTE_TOURIST_TAX_MAX_NIGHTS",
            "QUOTE_DEPOSIT_PERCENT",
            "QUOTE_SECURITY_DEPOSIT",
        ] {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn pricing_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUOTE_CLEANING_FEE", "80");
        env::set_var("QUOTE_CLEANING_FEE_MODE", "per_unit");
        env::set_var("QUOTE_TOURIST_TAX_RATE", "2");
        env::set_var("QUOTE_TOURIST_TAX_MAX_NIGHTS", "10");
        env::set_var("QUOTE_DEPOSIT_PERCENT", "25");

        let pricing = PricingConfig::from_env().expect("pricing loads");
        reset_env();

        assert_eq!(pricing.cleaning_fee, 80);
        assert_eq!(pricing.cleaning_fee_mode, CleaningFeeMode::PerUnit);
        assert_eq!(pricing.tourist_tax_rate, 2);
        assert_eq!(pricing.tourist_tax_max_nights, Some(10));
        assert_eq!(pricing.deposit_percent, 25);
        assert_eq!(pricing.security_deposit, 200);
    }

    #[test]
    fn rejects_deposit_share_above_one_hundred_percent() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUOTE_DEPOSIT_PERCENT", "130");

        let err = PricingConfig::from_env().expect_err("deposit share is capped");
        reset_env();

        assert!(err.to_string().contains("QUOTE_DEPOSIT_PERCENT"));
    }
}
