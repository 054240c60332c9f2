mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/bonus-bridge/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("bonus-bridge")
}

/// Get the default config file path (~/.config/bonus-bridge/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the config directory exists
pub fn ensure_config_dir() -> Result<()> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory at {}", config_dir.display())
        })?;
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path
///   (~/.config/bonus-bridge/config.yaml)
///
/// A missing file is not an error: the config is entirely optional and
/// defaults apply. An unreadable or unparseable file is.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringMode;
    use std::env;

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_missing_config.yaml");
        let _ = fs::remove_file(&temp_path);

        let config = load_config(Some(temp_path)).unwrap();
        assert_eq!(config.effective_mode(), ScoringMode::Bonus);
        assert!(!config.effective_show_breakdown());
    }

    #[test]
    fn test_parse_config_file() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_config.yaml");
        fs::write(&temp_path, "mode: party\nshow_breakdown: true\n").unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        assert_eq!(config.effective_mode(), ScoringMode::Party);
        assert!(config.effective_show_breakdown());

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_bad_config.yaml");
        fs::write(&temp_path, "mode: [unclosed\n").unwrap();

        assert!(load_config(Some(temp_path.clone())).is_err());

        let _ = fs::remove_file(&temp_path);
    }
}
