use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "industry-briefing";

#[derive(Debug, Clone)]
pub struct Config {
    pub perplexity_api_key: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let perplexity_api_key = env::var("PERPLEXITY_API_KEY").context(
            "PERPLEXITY_API_KEY not found.\n\n\
                To fix this, create ~/.config/industry-briefing/.env with:\n  \
                PERPLEXITY_API_KEY=your_key_here\n\n\
                Get your Perplexity API key from: https://www.perplexity.ai/settings/api",
        )?;

        if perplexity_api_key.trim().is_empty() {
            anyhow::bail!("PERPLEXITY_API_KEY is set but empty");
        }

        Ok(Self {
            perplexity_api_key,
            data_dir: Self::data_dir()?,
        })
    }

    /// Directory holding the `briefings/` and `submissions/` stores.
    ///
    /// `BRIEFING_DATA_DIR` wins over the platform's local data directory.
    pub fn data_dir() -> Result<PathBuf> {
        Self::try_load_dotenv();

        if let Ok(dir) = env::var("BRIEFING_DATA_DIR") {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        Ok(dirs::data_local_dir()
            .context("Could not determine local data directory")?
            .join(APP_DIR))
    }

    pub fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/industry-briefing/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join(APP_DIR).join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() && dotenvy::from_path(&home_path).is_ok() {
                return;
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}
