pub mod storage;
pub mod types;

pub use storage::{
    clear_game_state, get_game_state_path, get_history_path, load_game_state, load_history,
    save_game_state, save_history,
};
pub use types::{CompletedGame, DealRecord, GameHistory, GameState};
