use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::types::{GameHistory, GameState};

/// Default path of the in-progress game (~/.config/bonus-bridge/game.json)
pub fn get_game_state_path() -> PathBuf {
    crate::config::get_config_dir().join("game.json")
}

/// Default path of the completed-game history (~/.config/bonus-bridge/history.json)
pub fn get_history_path() -> PathBuf {
    crate::config::get_config_dir().join("history.json")
}

/// Load a saved in-progress game, if one exists.
///
/// A missing file means no game is in progress. A file with an unsupported
/// version is an error.
pub fn load_game_state(path: &Path) -> Result<Option<GameState>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open saved game at {}", path.display()))?;

    let state: GameState = serde_json::from_reader(file).context("Failed to load saved game")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported saved game version: {}", state.version);
    }

    Ok(Some(state))
}

/// Save the in-progress game atomically, creating the config directory if
/// needed.
pub fn save_game_state(path: &Path, state: &GameState) -> Result<()> {
    crate::config::ensure_config_dir()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize saved game")?;

    file.commit().context("Failed to save game")?;

    Ok(())
}

/// Remove the saved in-progress game. Missing file is fine.
pub fn clear_game_state(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove saved game at {}", path.display()))?;
    }
    Ok(())
}

/// Load the game history. A missing file means an empty history.
pub fn load_history(path: &Path) -> Result<GameHistory> {
    if !path.exists() {
        return Ok(GameHistory::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open game history at {}", path.display()))?;

    let history: GameHistory =
        serde_json::from_reader(file).context("Failed to load game history")?;

    if history.version != 1 {
        anyhow::bail!("Unsupported game history version: {}", history.version);
    }

    Ok(history)
}

/// Save the game history atomically.
pub fn save_history(path: &Path, history: &GameHistory) -> Result<()> {
    crate::config::ensure_config_dir()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, history).context("Failed to serialize game history")?;

    file.commit().context("Failed to save game history")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringMode;
    use std::env;

    #[test]
    fn test_load_missing_game_returns_none() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_missing_game.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = load_game_state(&temp_path).unwrap();
        assert!(state.is_none());
    }

    #[test]
    fn test_game_state_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_game_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut state = GameState::new(ScoringMode::Party);
        state.score_deal("4♥ N", 1, None).unwrap();
        state.score_deal("3NT E", -2, None).unwrap();

        save_game_state(&temp_path, &state).unwrap();
        let loaded = load_game_state(&temp_path).unwrap().unwrap();

        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.mode, ScoringMode::Party);
        assert_eq!(loaded.deals.len(), 2);
        assert_eq!(loaded.deals[0].contract, "4♥ N");
        assert_eq!(loaded.ns_total(), state.ns_total());
        assert_eq!(loaded.next_deal_number(), 3);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_clear_game_state() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_game_clear.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = GameState::new(ScoringMode::Bonus);
        save_game_state(&temp_path, &state).unwrap();
        assert!(temp_path.exists());

        clear_game_state(&temp_path).unwrap();
        assert!(!temp_path.exists());

        // Clearing again is not an error
        clear_game_state(&temp_path).unwrap();
    }

    #[test]
    fn test_history_missing_file_is_empty() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_missing_history.json");
        let _ = std::fs::remove_file(&temp_path);

        let history = load_history(&temp_path).unwrap();
        assert_eq!(history.version, 1);
        assert!(history.games.is_empty());
    }

    #[test]
    fn test_history_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("bonus_bridge_test_history_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut history = GameHistory::new();
        let mut state = GameState::new(ScoringMode::Party);
        state.score_deal("6♠ S", 0, None).unwrap();
        history.record(state.complete());

        save_history(&temp_path, &history).unwrap();
        let loaded = load_history(&temp_path).unwrap();

        assert_eq!(loaded.games.len(), 1);
        assert_eq!(loaded.games[0].ns_total, 980);

        let _ = std::fs::remove_file(&temp_path);
    }
}
