use serde::{Deserialize, Serialize};

use crate::scoring::ScoringMode;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Scoring mode used when none is given on the command line.
    pub mode: Option<ScoringMode>,
    /// Print the bonus adjustment breakdown after each scored deal.
    pub show_breakdown: Option<bool>,
}

impl Config {
    pub fn effective_mode(&self) -> ScoringMode {
        self.mode.unwrap_or_default()
    }

    pub fn effective_show_breakdown(&self) -> bool {
        self.show_breakdown.unwrap_or(false)
    }
}
