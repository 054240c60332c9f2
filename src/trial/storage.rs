use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::types::TrialState;

/// Default path of the metering state (~/.config/bonus-bridge/trial.json)
pub fn get_trial_path() -> PathBuf {
    crate::config::get_config_dir().join("trial.json")
}

/// Load the metering state. A missing file starts a fresh trial.
pub fn load_trial_state(path: &Path) -> Result<TrialState> {
    if !path.exists() {
        return Ok(TrialState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open trial state at {}", path.display()))?;

    let state: TrialState = serde_json::from_reader(file).context("Failed to load trial state")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported trial state version: {}", state.version);
    }

    Ok(state)
}

/// Save the metering state atomically.
pub fn save_trial_state(path: &Path, state: &TrialState) -> Result<()> {
    crate::config::ensure_config_dir()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize trial state")?;

    file.commit().context("Failed to save trial state")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_missing_file_starts_fresh() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_missing_trial.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = load_trial_state(&temp_path).unwrap();
        assert_eq!(state.deals_played, 0);
        assert!(!state.is_expired());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_trial_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut state = TrialState::new();
        state.record_deal_played();
        state.record_deal_played();
        state.apply_extension_code("OOOOOM3").unwrap();

        save_trial_state(&temp_path, &state).unwrap();
        let loaded = load_trial_state(&temp_path).unwrap();

        assert_eq!(loaded.deals_played, 2);
        assert_eq!(loaded.max_deals, state.max_deals);
        assert_eq!(loaded.extensions.len(), 1);
        assert_eq!(loaded.extensions[0].code, "OOOOOM3");

        let _ = std::fs::remove_file(&temp_path);
    }
}
