//! Library configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`QUAT_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize, Deserializer};
use serde::de::{self, Visitor};
use std::fmt;
use std::path::Path;

use quaternion_math::Quaternion;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuaternionConfig {
    /// Tolerances for approximate comparisons
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl QuaternionConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`QUAT_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // QUAT_TOLERANCE__UNIT=1e-6 -> tolerance.unit = 1e-6
        figment = figment.merge(Env::prefixed("QUAT_").split("__"));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.tolerance.validate()?;
        Ok(config)
    }
}

/// Tolerances applied by the approximate predicates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Largest per-component difference still considered equal
    #[serde(deserialize_with = "deserialize_tolerance")]
    pub equality: f64,
    /// Largest deviation of the norm from 1 for a unit quaternion
    #[serde(deserialize_with = "deserialize_tolerance")]
    pub unit: f64,
    /// Largest scalar part magnitude for a pure quaternion
    #[serde(deserialize_with = "deserialize_tolerance")]
    pub pure: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            equality: 1e-10,
            unit: 1e-10,
            pure: 1e-10,
        }
    }
}

impl ToleranceConfig {
    /// Tolerance equality using the configured `equality` epsilon
    pub fn approx_eq(&self, a: &Quaternion, b: &Quaternion) -> bool {
        a.approx_eq(b, self.equality)
    }

    pub fn is_unit(&self, q: &Quaternion) -> bool {
        q.is_unit(self.unit)
    }

    pub fn is_pure(&self, q: &Quaternion) -> bool {
        q.is_pure(self.pure)
    }

    /// Every tolerance must be a non-negative number
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("equality", self.equality), ("unit", self.unit), ("pure", self.pure)] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError {
                    message: format!("tolerance.{} must be non-negative, got {}", name, value),
                });
            }
        }
        Ok(())
    }
}

/// Accept a tolerance as a number or a numeric string
///
/// The env provider hands exponent forms like `1e-6` over as strings.
fn deserialize_tolerance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    struct ToleranceVisitor;

    impl<'de> Visitor<'de> for ToleranceVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(ToleranceVisitor)
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter in `env_logger` syntax (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Install an `env_logger` using the configured filter
    ///
    /// Returns `false` when a logger was already installed.
    pub fn init(&self) -> bool {
        let initialized = env_logger::Builder::new()
            .parse_filters(&self.level)
            .try_init()
            .is_ok();
        if initialized {
            log::debug!("Logging initialized at '{}'", self.level);
        }
        initialized
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
