use serde::{Deserialize, Serialize};

use super::contract::{ContractFact, Doubling, Outcome, Strain};

/// Points awarded to each partnership for one deal.
///
/// Standard scoring credits exactly one side; bonus scoring may credit both
/// (declarer score plus an independent defender reward) and carries the raw
/// standard score it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub ns_points: i32,
    pub ew_points: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw_score: Option<i32>,
}

impl ScoreResult {
    /// Map declarer/defender points onto NS/EW according to who declared.
    pub fn from_sides(fact: &ContractFact, declarer_points: i32, defender_points: i32) -> Self {
        if fact.declarer_is_north_south() {
            ScoreResult {
                ns_points: declarer_points,
                ew_points: defender_points,
                raw_score: None,
            }
        } else {
            ScoreResult {
                ns_points: defender_points,
                ew_points: declarer_points,
                raw_score: None,
            }
        }
    }

    /// Magnitude of the larger side, i.e. the deal's headline score.
    pub fn magnitude(&self) -> i32 {
        self.ns_points.abs().max(self.ew_points.abs())
    }
}

/// Official duplicate-bridge score for a parsed contract. Total function:
/// every valid [`ContractFact`] yields a result.
pub fn calculate_standard_score(fact: &ContractFact) -> ScoreResult {
    match fact.outcome() {
        Outcome::Made { overtricks } => {
            ScoreResult::from_sides(fact, made_score(fact, overtricks), 0)
        }
        Outcome::Defeated { undertricks } => {
            ScoreResult::from_sides(fact, 0, undertrick_penalty(fact, undertricks))
        }
    }
}

fn made_score(fact: &ContractFact, overtricks: i32) -> i32 {
    let level = i32::from(fact.level);
    let vul = fact.declarer_vulnerable;

    let base = match fact.strain {
        Strain::Clubs | Strain::Diamonds => level * 20,
        Strain::Hearts | Strain::Spades => level * 30,
        Strain::NoTrump => 40 + (level - 1) * 30,
    };
    let trick_score = base * fact.doubling.trick_multiplier();

    let mut score = trick_score;

    // Game bonus if the (doubled) trick score reaches game, else part-score
    score += if trick_score >= 100 {
        if vul {
            500
        } else {
            300
        }
    } else {
        50
    };

    score += match fact.level {
        6 => {
            if vul {
                750
            } else {
                500
            }
        }
        7 => {
            if vul {
                1500
            } else {
                1000
            }
        }
        _ => 0,
    };

    // "Insult" bonus for making a doubled or redoubled contract
    score += match fact.doubling {
        Doubling::None => 0,
        Doubling::Doubled => 50,
        Doubling::Redoubled => 100,
    };

    if overtricks > 0 {
        score += match fact.doubling {
            Doubling::None => {
                let per_trick = if fact.strain.is_minor() { 20 } else { 30 };
                overtricks * per_trick
            }
            Doubling::Doubled => overtricks * if vul { 200 } else { 100 },
            Doubling::Redoubled => overtricks * if vul { 400 } else { 200 },
        };
    }

    score
}

fn undertrick_penalty(fact: &ContractFact, undertricks: i32) -> i32 {
    let vul = fact.declarer_vulnerable;

    match fact.doubling {
        Doubling::None => undertricks * if vul { 100 } else { 50 },
        Doubling::Doubled => doubled_penalty(undertricks, vul, 1),
        Doubling::Redoubled => doubled_penalty(undertricks, vul, 2),
    }
}

/// Doubled undertrick table; `scale` of 2 doubles every term for redoubled.
fn doubled_penalty(undertricks: i32, vul: bool, scale: i32) -> i32 {
    let penalty = if vul {
        200 + (undertricks - 1) * 300
    } else {
        let mut p = 100;
        if undertricks > 1 {
            p += 200;
        }
        if undertricks > 2 {
            p += (undertricks - 2) * 300;
        }
        p
    };
    penalty * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::contract::{parse_contract, Vulnerability};

    fn score(text: &str, result: i32, ns_vul: bool, ew_vul: bool) -> ScoreResult {
        let vul = Vulnerability { ns: ns_vul, ew: ew_vul };
        let fact = parse_contract(text, result, vul).unwrap();
        calculate_standard_score(&fact)
    }

    #[test]
    fn test_major_game_not_vulnerable() {
        // 4♥ by N making exactly: 120 trick score + 300 game bonus
        let result = score("4♥ N", 0, false, false);
        assert_eq!(result.ns_points, 420);
        assert_eq!(result.ew_points, 0);
    }

    #[test]
    fn test_major_game_vulnerable() {
        // Same contract with NS vulnerable: 120 + 500
        let result = score("4♥ N", 0, true, false);
        assert_eq!(result.ns_points, 620);
        assert_eq!(result.ew_points, 0);
    }

    #[test]
    fn test_defeated_contract_credits_defenders() {
        // 3NT by E down one, nobody vulnerable: 50 to NS
        let result = score("3NT E", -1, false, false);
        assert_eq!(result.ns_points, 50);
        assert_eq!(result.ew_points, 0);
    }

    #[test]
    fn test_small_slam_vulnerable() {
        // 6♠ by S making, NS vulnerable: 180 + 500 + 750
        let result = score("6♠ S", 0, true, false);
        assert_eq!(result.ns_points, 1430);
        assert_eq!(result.ew_points, 0);
    }

    #[test]
    fn test_grand_slam() {
        // 7NT making, not vulnerable: 220 + 300 + 1000
        assert_eq!(score("7NT N", 0, false, false).ns_points, 1520);
        // Vulnerable: 220 + 500 + 1500
        assert_eq!(score("7NT N", 0, true, false).ns_points, 2220);
    }

    #[test]
    fn test_part_scores() {
        // 2♥ making: 60 + 50
        assert_eq!(score("2♥ N", 0, false, false).ns_points, 110);
        // 3♣ making: 60 + 50
        assert_eq!(score("3♣ N", 0, false, false).ns_points, 110);
        // 1NT making: 40 + 50
        assert_eq!(score("1NT N", 0, false, false).ns_points, 90);
    }

    #[test]
    fn test_doubling_turns_part_score_into_game() {
        // 2♠X making: 60x2 = 120 trick score, reaches game + 50 insult
        assert_eq!(score("2♠ NX", 0, false, false).ns_points, 470);
        // 1♣XX making: 20x4 = 80, still a part score, + 100 insult
        assert_eq!(score("1♣ NXX", 0, false, false).ns_points, 230);
    }

    #[test]
    fn test_overtricks() {
        // 4♥ +2 undoubled: 420 + 60
        assert_eq!(score("4♥ N", 2, false, false).ns_points, 480);
        // 3♦ +1 undoubled: 110 + 20
        assert_eq!(score("3♦ N", 1, false, false).ns_points, 130);
        // 2♥X +1 not vulnerable: 120 + 300 + 50 + 100
        assert_eq!(score("2♥ NX", 1, false, false).ns_points, 570);
        // 2♥X +1 vulnerable: 120 + 500 + 50 + 200
        assert_eq!(score("2♥ NX", 1, true, false).ns_points, 870);
        // 2♥XX +1 vulnerable: 240 + 500 + 100 + 400
        assert_eq!(score("2♥ NXX", 1, true, false).ns_points, 1240);
    }

    #[test]
    fn test_undoubled_undertricks() {
        assert_eq!(score("4♠ E", -2, false, false).ns_points, 100);
        assert_eq!(score("4♠ E", -2, false, true).ns_points, 200);
        assert_eq!(score("4♠ N", -3, true, false).ew_points, 300);
    }

    #[test]
    fn test_doubled_undertricks() {
        // Vulnerable: 200 for the first, 300 each thereafter
        assert_eq!(score("4♥ NX", -1, true, false).ew_points, 200);
        assert_eq!(score("4♥ NX", -2, true, false).ew_points, 500);
        assert_eq!(score("4♥ NX", -3, true, false).ew_points, 800);
        // Not vulnerable: 100, then 200 more, then 300 each from the third
        assert_eq!(score("4♥ NX", -1, false, false).ew_points, 100);
        assert_eq!(score("4♥ NX", -2, false, false).ew_points, 300);
        assert_eq!(score("4♥ NX", -3, false, false).ew_points, 600);
    }

    #[test]
    fn test_redoubled_undertricks_double_every_term() {
        assert_eq!(score("4♥ NXX", -1, true, false).ew_points, 400);
        assert_eq!(score("4♥ NXX", -2, true, false).ew_points, 1000);
        assert_eq!(score("4♥ NXX", -1, false, false).ew_points, 200);
        assert_eq!(score("4♥ NXX", -3, false, false).ew_points, 1200);
    }

    #[test]
    fn test_exactly_one_side_scores() {
        for (text, result) in [("4♥ N", 0), ("4♥ E", 0), ("3NT S", -2), ("5♣ W", 1)] {
            for vul in [
                Vulnerability::NONE,
                Vulnerability { ns: true, ew: false },
                Vulnerability { ns: true, ew: true },
            ] {
                let fact = parse_contract(text, result, vul).unwrap();
                let s = calculate_standard_score(&fact);
                assert!(
                    (s.ns_points == 0) != (s.ew_points == 0),
                    "expected exactly one side to score for {} {}: {:?}",
                    text,
                    result,
                    s
                );
            }
        }
    }

    #[test]
    fn test_overtrick_monotonicity() {
        // More overtricks never scores less, all else fixed
        for text in ["1♣ N", "2♥ NX", "3NT N", "4♠ NXX"] {
            let mut prev = None;
            for result in 0..=3 {
                let s = score(text, result, false, false).ns_points;
                if let Some(p) = prev {
                    assert!(s > p, "{} +{} should outscore +{}", text, result, result - 1);
                }
                prev = Some(s);
            }
        }
    }

    #[test]
    fn test_vulnerable_score_dominates() {
        // For identical contract and result, the vulnerable score is never lower
        for (text, result) in [("4♥ N", 0), ("6♣ N", 1), ("2♥ NX", 0), ("3NT N", -2), ("5♦ NX", -3)]
        {
            let non_vul = score(text, result, false, false).magnitude();
            let vul = score(text, result, true, true).magnitude();
            assert!(
                vul >= non_vul,
                "vulnerable score for {} {} should be >= non-vulnerable",
                text,
                result
            );
        }
    }
}
