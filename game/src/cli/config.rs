use color_eyre::eyre::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::{GameMode, MAX_ROLLS};

const CONFIG_DIR: &str = "twist-ladders";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_ROLL_DELAY_MS: u64 = 1000;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub mode: Option<GameMode>,
    /// Fixed seed for reproducible games; fresh entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub roll_delay_ms: Option<u64>,
    /// Player 2 rolls by itself in `play`
    #[serde(default)]
    pub vs_computer: Option<bool>,
    #[serde(default)]
    pub max_rolls: Option<u32>,
}

impl CliConfig {
    /// Get the config directory path (~/.config/twist-ladders on Linux)
    pub fn config_dir() -> color_eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not find config directory"))?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    pub fn config_path() -> color_eyre::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from the default location, falling back to defaults if it doesn't exist
    pub fn load() -> color_eyre::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> color_eyre::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> color_eyre::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> color_eyre::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).wrap_err_with(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).wrap_err("Failed to serialize config")?;

        std::fs::write(path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Set one key from its string form, as `config set` receives it
    pub fn set(&mut self, key: &str, value: &str) -> color_eyre::Result<()> {
        match key {
            "mode" => {
                let mode = GameMode::from_str(value).ok_or_else(|| {
                    color_eyre::eyre::eyre!("Invalid mode '{}'. Use 'classic' or 'twist'.", value)
                })?;
                self.mode = Some(mode);
            }
            "seed" => {
                self.seed = Some(value.parse().wrap_err("seed must be an unsigned integer")?);
            }
            "roll_delay_ms" => {
                self.roll_delay_ms = Some(
                    value
                        .parse()
                        .wrap_err("roll_delay_ms must be an unsigned integer")?,
                );
            }
            "vs_computer" => {
                self.vs_computer = Some(value.parse().wrap_err("vs_computer must be true or false")?);
            }
            "max_rolls" => {
                self.max_rolls = Some(value.parse().wrap_err("max_rolls must be an unsigned integer")?);
            }
            other => {
                return Err(color_eyre::eyre::eyre!(
                    "Unknown config key '{}'. Known keys: mode, seed, roll_delay_ms, vs_computer, max_rolls",
                    other
                ));
            }
        }
        Ok(())
    }

    pub fn mode(&self) -> GameMode {
        self.mode.unwrap_or_default()
    }

    pub fn roll_delay(&self) -> Duration {
        Duration::from_millis(self.roll_delay_ms.unwrap_or(DEFAULT_ROLL_DELAY_MS))
    }

    pub fn vs_computer(&self) -> bool {
        self.vs_computer.unwrap_or(false)
    }

    pub fn max_rolls(&self) -> u32 {
        self.max_rolls.unwrap_or(MAX_ROLLS)
    }
}
