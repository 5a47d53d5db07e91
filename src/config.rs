//! Configuration management for the `AirImpact` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AirImpactError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `AirImpact` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirImpactConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Air-quality provider (WAQI) configuration
    #[serde(default)]
    pub aqi: AqiProviderConfig,
    /// Geocoding/routing provider (Mapbox) configuration
    #[serde(default)]
    pub routing: RoutingProviderConfig,
    /// LLM suggestion provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Air-quality provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqiProviderConfig {
    /// WAQI API token (required for live air-quality data)
    pub api_key: Option<String>,
    /// Base URL for the WAQI API
    #[serde(default = "default_aqi_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_provider_max_retries")]
    pub max_retries: u32,
    /// How long AQI feed responses stay cached, in minutes
    #[serde(default = "default_aqi_cache_ttl")]
    pub cache_ttl_minutes: u32,
}

/// Geocoding/routing provider configuration
///
/// Mapbox access tokens are supplied per request by the caller, so only
/// connection settings live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingProviderConfig {
    /// Base URL for the Mapbox API
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_provider_max_retries")]
    pub max_retries: u32,
}

/// LLM suggestion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the Groq-compatible completion endpoint (optional;
    /// suggestions fall back to fixed recommendations without it)
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible chat API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Completion token budget
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_port() -> u16 {
    8080
}

fn default_aqi_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_routing_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_llm_temperature() -> f32 {
    0.6
}

fn default_llm_max_tokens() -> u32 {
    800
}

fn default_provider_timeout() -> u32 {
    30
}

fn default_provider_max_retries() -> u32 {
    3
}

fn default_aqi_cache_ttl() -> u32 {
    10
}

fn default_cache_location() -> String {
    "./cache/airimpact".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

impl Default for AqiProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_aqi_base_url(),
            timeout_seconds: default_provider_timeout(),
            max_retries: default_provider_max_retries(),
            cache_ttl_minutes: default_aqi_cache_ttl(),
        }
    }
}

impl Default for RoutingProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_base_url(),
            timeout_seconds: default_provider_timeout(),
            max_retries: default_provider_max_retries(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AirImpactConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with AIRIMPACT_ prefix,
        // e.g. AIRIMPACT_AQI__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("AIRIMPACT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: AirImpactConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to parse configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.aqi.api_key {
            if api_key.is_empty() {
                return Err(AirImpactError::config(
                    "AQI API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        if let Some(api_key) = &self.llm.api_key {
            if api_key.is_empty() {
                return Err(AirImpactError::config(
                    "LLM API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.aqi.timeout_seconds > 300 || self.routing.timeout_seconds > 300 {
            return Err(
                AirImpactError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.aqi.max_retries > 10 || self.routing.max_retries > 10 {
            return Err(AirImpactError::config("Provider max retries cannot exceed 10").into());
        }

        if self.aqi.cache_ttl_minutes > 1440 {
            return Err(
                AirImpactError::config("AQI cache TTL cannot exceed 1440 minutes (1 day)").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirImpactError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirImpactError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [&self.aqi.base_url, &self.routing.base_url, &self.llm.base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AirImpactError::config(
                    "Provider base URLs must be valid HTTP or HTTPS URLs",
                )
                .into());
            }
        }

        Ok(())
    }
}
