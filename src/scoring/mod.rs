pub mod bonus;
pub mod contract;
pub mod standard;

pub use bonus::{calculate_bonus_score, BonusScore, HandAnalysis, StepContribution};
pub use contract::{parse_contract, ContractFact, Doubling, Outcome, Seat, Strain, Vulnerability};
pub use standard::{calculate_standard_score, ScoreResult};

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which scoring table a game uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Official duplicate-bridge tables.
    Party,
    /// Standard score adjusted by hand-strength and performance heuristics.
    #[default]
    Bonus,
}

impl FromStr for ScoringMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "party" => Ok(ScoringMode::Party),
            "bonus" => Ok(ScoringMode::Bonus),
            other => bail!("unknown scoring mode '{}': expected 'party' or 'bonus'", other),
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Party => write!(f, "party"),
            ScoringMode::Bonus => write!(f, "bonus"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_round_trip() {
        assert_eq!("party".parse::<ScoringMode>().unwrap(), ScoringMode::Party);
        assert_eq!("Bonus".parse::<ScoringMode>().unwrap(), ScoringMode::Bonus);
        assert!("rubber".parse::<ScoringMode>().is_err());
        assert_eq!(ScoringMode::Party.to_string(), "party");
    }
}
