use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::code::validate_extension_code;

/// Deals available before the first extension code is applied.
pub const INITIAL_DEAL_ALLOWANCE: u32 = 50;

/// Fraction of the allowance at which the running-low warning starts.
const WARNING_FRACTION: f64 = 0.6;

/// One applied extension code. Kept permanently so codes are one-time use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub code: String,
    pub deals_granted: u32,
    pub applied_at: DateTime<Utc>,
}

/// Usage-metering state: how many deals have been scored against the
/// current allowance. An explicit value passed around by the CLI, never
/// ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialState {
    pub version: u32,
    pub started_at: DateTime<Utc>,
    pub deals_played: u32,
    pub max_deals: u32,
    pub games_completed: u32,
    expired: bool,
    #[serde(default)]
    pub extensions: Vec<ExtensionRecord>,
}

impl Default for TrialState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialState {
    pub fn new() -> Self {
        TrialState {
            version: 1,
            started_at: Utc::now(),
            deals_played: 0,
            max_deals: INITIAL_DEAL_ALLOWANCE,
            games_completed: 0,
            expired: false,
            extensions: Vec::new(),
        }
    }

    pub fn remaining_deals(&self) -> u32 {
        self.max_deals.saturating_sub(self.deals_played)
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn can_play_deal(&self) -> bool {
        !self.expired && self.deals_played < self.max_deals
    }

    /// Warn once usage passes the warning fraction of the allowance.
    pub fn should_warn(&self) -> bool {
        let threshold = (f64::from(self.max_deals) * WARNING_FRACTION).floor() as u32;
        !self.expired && self.deals_played >= threshold
    }

    /// Count one scored deal. Returns whether further deals are allowed.
    pub fn record_deal_played(&mut self) -> bool {
        self.deals_played += 1;
        if self.deals_played >= self.max_deals {
            self.expired = true;
        }
        !self.expired
    }

    pub fn record_game_completed(&mut self) {
        self.games_completed += 1;
    }

    /// Apply an extension code, raising the allowance and clearing expiry.
    /// Each code works once; reuse is rejected.
    pub fn apply_extension_code(&mut self, code: &str) -> Result<ExtensionRecord> {
        let validation = validate_extension_code(code)?;

        if self.extensions.iter().any(|e| e.code == validation.code) {
            bail!("this extension code has already been used");
        }

        self.max_deals += validation.deals_granted;
        self.expired = false;

        let record = ExtensionRecord {
            code: validation.code,
            deals_granted: validation.deals_granted,
            applied_at: Utc::now(),
        };
        self.extensions.push(record.clone());
        Ok(record)
    }
}
