use serde::{Deserialize, Serialize};

use crate::error::AppError;

const DEFAULT_CONFIG: &str = include_str!("../config/config.toml");

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub pokeapi: PokeApiConfig,
    pub server: ServerConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PokeApiConfig {
    pub api_url: String,
    pub sprite_url: String,
    // seconds
    pub timeout: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Config {
    /// Loads the file named by `POKEDEX_CONFIG`, or the bundled defaults when unset.
    pub fn load() -> Result<Self, AppError> {
        match std::env::var("POKEDEX_CONFIG") {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    AppError::Config(format!("failed to read {}: {}", path, e))
                })?;
                Self::parse(&contents)
            }
            Err(_) => Self::parse(DEFAULT_CONFIG),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, AppError> {
        toml::from_str(contents).map_err(|e| {
            tracing::error!("Failed to parse configuration: {}", e);
            AppError::from(e)
        })
    }
}
