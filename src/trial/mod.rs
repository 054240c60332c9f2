pub mod code;
pub mod storage;
pub mod types;

pub use code::{generate_sample_code, validate_extension_code, CodeValidation};
pub use storage::{get_trial_path, load_trial_state, save_trial_state};
pub use types::{ExtensionRecord, TrialState, INITIAL_DEAL_ALLOWANCE};
