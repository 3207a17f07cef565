//! Server configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first when present. Every
//! setting has a default, so an empty environment gives a working local server
//! whose AI features answer with the fallback message.

use std::env;
use std::path::PathBuf;

use crate::io::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Directory holding the saved snapshot
    pub data_dir: PathBuf,
    /// Gemini API key; `None` disables the collaborator
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Origin allowed by CORS
    pub frontend_url: String,
    /// Validate raw actions posted to `/api/actions`
    pub strict_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            strict_validation: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid("PORT", value))?,
            None => defaults.port,
        };

        let strict_validation = match var("KIDSBANK_STRICT_VALIDATION") {
            Some(value) => parse_bool(&value)
                .ok_or(ConfigError::Invalid("KIDSBANK_STRICT_VALIDATION", value))?,
            None => defaults.strict_validation,
        };

        Ok(Self {
            port,
            data_dir: var("KIDSBANK_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            frontend_url: var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            strict_validation,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
