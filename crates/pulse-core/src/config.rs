use anyhow::{Context, Result};
use std::path::PathBuf;

use pulse_types::config::PulseConfig;

/// Returns the Pulse home directory (~/.pulse/)
pub fn pulse_home() -> PathBuf {
    dirs::home_dir()
        .expect("Could not determine home directory")
        .join(".pulse")
}

/// Returns the path to the config file (~/.pulse/config.toml)
pub fn config_path() -> PathBuf {
    pulse_home().join("config.toml")
}

/// Load config from disk, creating a default if it doesn't exist.
/// `PULSE_APP_ID` and `PULSE_APP_NAME` env vars override file values;
/// the API key env override is applied at the HTTP gateway.
pub fn load_config() -> Result<PulseConfig> {
    let path = config_path();

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?
    } else {
        let home = pulse_home();
        std::fs::create_dir_all(&home)
            .with_context(|| format!("Failed to create {}", home.display()))?;
        let default = PulseConfig::default();
        let toml_str =
            toml::to_string_pretty(&default).context("Failed to serialize default config")?;
        std::fs::write(&path, &toml_str)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        default
    };

    if let Ok(app_id) = std::env::var("PULSE_APP_ID") {
        config.platform.app_id = app_id;
    }
    if let Ok(app_name) = std::env::var("PULSE_APP_NAME") {
        config.platform.app_name = app_name;
    }

    Ok(config)
}

/// Save config to disk, overwriting the existing file.
pub fn save_config(config: &PulseConfig) -> Result<()> {
    let path = config_path();
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(&path, toml_str)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_home_is_under_home_dir() {
        let home = pulse_home();
        assert!(home.to_string_lossy().contains(".pulse"));
    }

    #[test]
    fn default_config_roundtrips() {
        let config = PulseConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: PulseConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.client.activity_limit, 20);
        assert_eq!(parsed.client.log_capacity, 100);
    }
}
