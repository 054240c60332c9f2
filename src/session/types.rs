use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    calculate_bonus_score, calculate_standard_score, parse_contract, HandAnalysis, ScoringMode,
    Seat, Vulnerability,
};

/// One scored deal as it appears on the score sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub deal_number: u32,
    /// Normalized contract text, e.g. "4♥ N" or "3NT EX".
    pub contract: String,
    pub signed_result: i32,
    pub vulnerability: Vulnerability,
    pub mode: ScoringMode,
    pub ns_points: i32,
    pub ew_points: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hand_analysis: Option<HandAnalysis>,
}

/// An in-progress game: the scored deals plus the active scoring mode.
/// Vulnerability and dealer rotate automatically with the deal number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub version: u32,
    pub mode: ScoringMode,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub deals: Vec<DealRecord>,
}

impl GameState {
    pub fn new(mode: ScoringMode) -> Self {
        GameState {
            version: 1,
            mode,
            started_at: Utc::now(),
            deals: Vec::new(),
        }
    }

    pub fn next_deal_number(&self) -> u32 {
        self.deals.len() as u32 + 1
    }

    pub fn next_vulnerability(&self) -> Vulnerability {
        Vulnerability::for_deal(self.next_deal_number())
    }

    pub fn next_dealer(&self) -> Seat {
        Seat::dealer_for(self.next_deal_number())
    }

    pub fn ns_total(&self) -> i32 {
        self.deals.iter().map(|d| d.ns_points).sum()
    }

    pub fn ew_total(&self) -> i32 {
        self.deals.iter().map(|d| d.ew_points).sum()
    }

    /// Parse and score the next deal, append it to the sheet, and return the
    /// record. The deal's vulnerability comes from the rotation. In bonus
    /// mode a missing hand analysis falls back to the standard table.
    ///
    /// A malformed contract is the only error; nothing is recorded in that
    /// case and the caller may re-prompt.
    pub fn score_deal(
        &mut self,
        contract_text: &str,
        signed_result: i32,
        hand: Option<HandAnalysis>,
    ) -> Result<DealRecord> {
        let deal_number = self.next_deal_number();
        let vulnerability = self.next_vulnerability();
        let fact = parse_contract(contract_text, signed_result, vulnerability)?;

        let score = match (self.mode, hand) {
            (ScoringMode::Bonus, Some(h)) => calculate_bonus_score(&fact, &h).score,
            _ => calculate_standard_score(&fact),
        };

        let record = DealRecord {
            deal_number,
            contract: fact.to_string(),
            signed_result,
            vulnerability,
            mode: self.mode,
            ns_points: score.ns_points,
            ew_points: score.ew_points,
            raw_score: score.raw_score,
            hand_analysis: hand,
        };
        self.deals.push(record.clone());
        Ok(record)
    }

    /// Close the game out for the history file.
    pub fn complete(self) -> CompletedGame {
        let ns_total = self.ns_total();
        let ew_total = self.ew_total();
        CompletedGame {
            mode: self.mode,
            ns_total,
            ew_total,
            started_at: self.started_at,
            completed_at: Utc::now(),
            deals: self.deals,
        }
    }
}

/// A finished game as stored in the history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedGame {
    pub mode: ScoringMode,
    pub ns_total: i32,
    pub ew_total: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub deals: Vec<DealRecord>,
}

impl CompletedGame {
    pub fn deals_played(&self) -> usize {
        self.deals.len()
    }

    pub fn result_line(&self) -> String {
        if self.ns_total > self.ew_total {
            format!("NS win {} to {}", self.ns_total, self.ew_total)
        } else if self.ew_total > self.ns_total {
            format!("EW win {} to {}", self.ew_total, self.ns_total)
        } else {
            format!("Tied at {}", self.ns_total)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameHistory {
    pub version: u32,
    #[serde(default)]
    pub games: Vec<CompletedGame>,
}

impl Default for GameHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl GameHistory {
    pub fn new() -> Self {
        GameHistory {
            version: 1,
            games: Vec::new(),
        }
    }

    pub fn record(&mut self, game: CompletedGame) {
        self.games.push(game);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_is_empty() {
        let state = GameState::new(ScoringMode::Party);
        assert_eq!(state.version, 1);
        assert!(state.deals.is_empty());
        assert_eq!(state.next_deal_number(), 1);
        assert_eq!(state.next_dealer(), Seat::North);
        assert_eq!(state.next_vulnerability(), Vulnerability::NONE);
    }

    #[test]
    fn test_party_mode_scores_accumulate() {
        let mut state = GameState::new(ScoringMode::Party);

        // Deal 1: nobody vulnerable
        let first = state.score_deal("4♥ N", 0, None).unwrap();
        assert_eq!(first.ns_points, 420);

        // Deal 2: NS vulnerable by rotation, same contract now worth 620
        assert_eq!(state.next_vulnerability(), Vulnerability { ns: true, ew: false });
        let second = state.score_deal("4♥ S", 0, None).unwrap();
        assert_eq!(second.ns_points, 620);

        assert_eq!(state.ns_total(), 1040);
        assert_eq!(state.ew_total(), 0);
        assert_eq!(state.next_deal_number(), 3);
    }

    #[test]
    fn test_bonus_mode_uses_hand_analysis() {
        let mut state = GameState::new(ScoringMode::Bonus);
        let hand = HandAnalysis { total_hcp: 28, singletons: 0, voids: 0, long_suits: 0 };

        let record = state.score_deal("4♥ N", 0, Some(hand)).unwrap();
        assert_eq!(record.ns_points, 16);
        assert_eq!(record.ew_points, 13);
        assert_eq!(record.raw_score, Some(420));
        assert_eq!(record.hand_analysis, Some(hand));
    }

    #[test]
    fn test_bonus_mode_without_hand_falls_back_to_standard() {
        let mut state = GameState::new(ScoringMode::Bonus);
        let record = state.score_deal("4♥ N", 0, None).unwrap();
        assert_eq!(record.ns_points, 420);
        assert_eq!(record.raw_score, None);
    }

    #[test]
    fn test_malformed_contract_records_nothing() {
        let mut state = GameState::new(ScoringMode::Party);
        assert!(state.score_deal("4H N", 0, None).is_err());
        assert!(state.deals.is_empty());
        assert_eq!(state.next_deal_number(), 1);
    }

    #[test]
    fn test_contract_text_is_normalized() {
        let mut state = GameState::new(ScoringMode::Party);
        let record = state.score_deal("  3NT   EX  ", -1, None).unwrap();
        assert_eq!(record.contract, "3NT EX");
    }

    #[test]
    fn test_complete_carries_totals() {
        let mut state = GameState::new(ScoringMode::Party);
        state.score_deal("4♥ N", 0, None).unwrap();
        state.score_deal("3NT E", -1, None).unwrap();

        let game = state.complete();
        assert_eq!(game.deals_played(), 2);
        assert_eq!(game.ns_total, 470);
        assert_eq!(game.ew_total, 0);
        assert_eq!(game.result_line(), "NS win 470 to 0");
    }

    #[test]
    fn test_history_records_games() {
        let mut history = GameHistory::new();
        assert!(history.games.is_empty());

        let mut state = GameState::new(ScoringMode::Party);
        state.score_deal("2♠ W", 1, None).unwrap();
        history.record(state.complete());

        assert_eq!(history.games.len(), 1);
        assert_eq!(history.games[0].ew_total, 140);
    }
}
