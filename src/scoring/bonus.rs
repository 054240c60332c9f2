use serde::{Deserialize, Serialize};

use super::contract::{ContractFact, Outcome, Strain};
use super::standard::{calculate_standard_score, ScoreResult};

/// Combined hand-strength data for the declaring side (declarer + dummy),
/// entered by the players after the deal. Only bonus scoring needs this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandAnalysis {
    /// Combined high-card points, out of the 40 in the deck.
    pub total_hcp: u8,
    pub singletons: u8,
    pub voids: u8,
    /// Suits of six or more cards.
    pub long_suits: u8,
}

impl HandAnalysis {
    /// Distribution points: void 3, singleton 2, long suit 1.
    pub fn distribution_points(&self) -> i32 {
        i32::from(self.voids) * 3 + i32::from(self.singletons) * 2 + i32::from(self.long_suits)
    }

    /// Share of the deck's HCP held by the declaring side, as a percentage.
    pub fn declarer_hcp_percentage(&self) -> f64 {
        f64::from(self.total_hcp) / 40.0 * 100.0
    }

    /// Tricks this hand "should" take: 6 plus a third of the HCP plus a
    /// quarter of the distribution points, capped at 13.
    pub fn expected_tricks(&self) -> i32 {
        (6 + i32::from(self.total_hcp) / 3 + self.distribution_points() / 4).min(13)
    }
}

/// One adjustment applied by the bonus pipeline, for display.
#[derive(Debug, Clone)]
pub struct StepContribution {
    pub label: String,
    pub description: String,
    pub before: f64,
    pub after: f64,
}

/// Bonus-mode score: the final point pair plus the trace of how the pipeline
/// got there. `score.raw_score` always carries the standard score the
/// adjustments started from.
#[derive(Debug, Clone)]
pub struct BonusScore {
    pub score: ScoreResult,
    pub steps: Vec<StepContribution>,
}

/// HCP a declaring side is expected to hold for a given contract shape.
fn expected_hcp(fact: &ContractFact) -> f64 {
    if fact.level <= 2 {
        21.0
    } else if fact.level == 3 && fact.strain == Strain::NoTrump {
        25.0
    } else if fact.level == 4 && fact.strain.is_major() {
        24.0
    } else if fact.level == 5 && fact.strain.is_minor() {
        27.0
    } else if fact.level == 6 {
        30.0
    } else if fact.level == 7 {
        32.0
    } else {
        21.0 + f64::from(fact.level) * 1.5
    }
}

/// Bonus-bridge score for a parsed contract and its hand analysis.
///
/// Reuses the standard calculator for the raw score, then applies the
/// adjustment pipeline: scale reduction, HCP-expectation deviation,
/// performance versus both the contract and the hand's potential,
/// contract-type bonuses, distribution penalty, and an independent defender
/// reward. Defeated contracts run a shorter penalty pipeline. All arithmetic
/// is total; no step can fail.
pub fn calculate_bonus_score(fact: &ContractFact, hand: &HandAnalysis) -> BonusScore {
    let raw = calculate_standard_score(fact).magnitude();

    match fact.outcome() {
        Outcome::Made { overtricks } => made_pipeline(fact, hand, raw, overtricks),
        Outcome::Defeated { undertricks } => defeated_pipeline(fact, hand, raw, undertricks),
    }
}

fn made_pipeline(
    fact: &ContractFact,
    hand: &HandAnalysis,
    raw: i32,
    overtricks: i32,
) -> BonusScore {
    let mut steps = Vec::new();

    let base = f64::from(raw) / 20.0;
    steps.push(StepContribution {
        label: "Base".to_string(),
        description: format!("raw score {} / 20", raw),
        before: 0.0,
        after: base,
    });
    let mut points = base;

    // HCP-expectation deviation: holding more than the contract warrants
    // costs points, holding less earns them back
    let expected = expected_hcp(fact);
    let total_hcp = f64::from(hand.total_hcp);
    let adjustment = (total_hcp - expected) * 0.75;
    let before = points;
    if total_hcp > expected {
        points -= adjustment;
    } else if total_hcp < expected {
        points += adjustment.abs();
    }
    steps.push(StepContribution {
        label: "HCP expectation".to_string(),
        description: format!("{} HCP held vs {} expected", hand.total_hcp, expected),
        before,
        after: points,
    });

    let contract_expected = fact.required_tricks();
    let hand_expected = hand.expected_tricks();
    let actual = fact.actual_tricks();

    // Performance: overtricks earn 1.5 each; falling short of what the hand
    // was worth costs 0.75 per missing trick. Both can apply.
    let before = points;
    let variance = actual - contract_expected;
    if variance > 0 {
        points += f64::from(variance) * 1.5;
    }
    if hand_expected > contract_expected {
        let potential_variance = actual - hand_expected;
        if potential_variance < 0 {
            points -= f64::from(-potential_variance) * 0.75;
        }
    }
    steps.push(StepContribution {
        label: "Performance".to_string(),
        description: format!(
            "{} tricks taken, {} bid, {} hand potential",
            actual, contract_expected, hand_expected
        ),
        before,
        after: points,
    });

    // Contract-type bonuses stack: a slam collects both the game and the
    // slam adjustment
    let before = points;
    if fact.is_game() {
        points += 2.0;
    }
    if fact.level == 6 {
        points += 4.0;
    } else if fact.level == 7 {
        points += 6.0;
    }
    if fact.strain == Strain::NoTrump {
        points += 1.0;
    }
    if overtricks >= 4 {
        points += 1.0;
        if overtricks >= 7 {
            points += 2.0;
        }
    }
    if points != before {
        steps.push(StepContribution {
            label: "Contract type".to_string(),
            description: format!("bonuses for {}", fact),
            before,
            after: points,
        });
    }

    // Distribution penalty, suit contracts only
    if fact.strain != Strain::NoTrump {
        let dist = hand.distribution_points();
        let deduction = if dist >= 7 {
            3.0
        } else if dist >= 5 {
            2.0
        } else if dist >= 3 {
            1.0
        } else {
            0.0
        };
        if deduction > 0.0 {
            steps.push(StepContribution {
                label: "Distribution".to_string(),
                description: format!("{} distribution points", dist),
                before: points,
                after: points - deduction,
            });
            points -= deduction;
        }
    }

    // Defenders are rewarded for holding a strong hand below its potential
    let mut defender = 0.0;
    if hand_expected > contract_expected && actual < hand_expected {
        let reward = f64::from(hand_expected - actual) * 2.0;
        let declarer_pct = hand.declarer_hcp_percentage();
        let advantage = (declarer_pct - (100.0 - declarer_pct)).abs();
        let extra = if declarer_pct > 50.0 {
            (advantage / 10.0).min(3.0)
        } else {
            0.0
        };
        defender = reward + extra;
        steps.push(StepContribution {
            label: "Defender reward".to_string(),
            description: format!(
                "{} tricks short of hand potential",
                hand_expected - actual
            ),
            before: 0.0,
            after: defender,
        });
    }

    let declarer_points = (points.round() as i32).max(1);
    let defender_points = defender.round() as i32;

    let mut score = ScoreResult::from_sides(fact, declarer_points, defender_points);
    score.raw_score = Some(raw);
    BonusScore { score, steps }
}

fn defeated_pipeline(
    fact: &ContractFact,
    hand: &HandAnalysis,
    raw: i32,
    undertricks: i32,
) -> BonusScore {
    let mut steps = Vec::new();

    let base = f64::from(raw) / 10.0;
    steps.push(StepContribution {
        label: "Base penalty".to_string(),
        description: format!("raw penalty {} / 10", raw),
        before: 0.0,
        after: base,
    });
    let mut penalty = base;

    // Defeated game and slam contracts carry a surcharge, stacking like the
    // made-contract bonuses
    let before = penalty;
    if fact.is_game() {
        penalty += 3.0;
    }
    if fact.level == 6 {
        penalty += 5.0;
    } else if fact.level == 7 {
        penalty += 7.0;
    }
    if penalty != before {
        steps.push(StepContribution {
            label: "Contract level".to_string(),
            description: format!("defeated {}", fact),
            before,
            after: penalty,
        });
    }

    // Beating a strong declarer, or beating the contract badly, pays more
    let declarer_pct = hand.declarer_hcp_percentage();
    let mut bonus = 0.0;
    if declarer_pct > 60.0 {
        bonus += (declarer_pct - 50.0) / 5.0;
    }
    if undertricks >= 2 {
        bonus += 2.0;
        if undertricks >= 3 {
            bonus += 3.0;
        }
    }
    if bonus > 0.0 {
        steps.push(StepContribution {
            label: "Defender performance".to_string(),
            description: format!(
                "down {} against {:.0}% of the HCP",
                undertricks, declarer_pct
            ),
            before: penalty,
            after: penalty + bonus,
        });
        penalty += bonus;
    }

    // Consolation for declarers pushed into a hopeless contract
    let consolation = if declarer_pct < 40.0 {
        (50.0 - declarer_pct) / 10.0
    } else {
        0.0
    };
    if consolation > 0.0 {
        steps.push(StepContribution {
            label: "Declarer consolation".to_string(),
            description: format!("only {:.0}% of the HCP", declarer_pct),
            before: 0.0,
            after: consolation,
        });
    }

    let defender_points = (penalty.round() as i32).max(3);
    let declarer_points = consolation.round() as i32;

    let mut score = ScoreResult::from_sides(fact, declarer_points, defender_points);
    score.raw_score = Some(raw);
    BonusScore { score, steps }
}
