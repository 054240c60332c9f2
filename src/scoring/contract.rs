use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Denomination a contract is played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strain {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    NoTrump,
}

impl Strain {
    pub fn is_minor(self) -> bool {
        matches!(self, Strain::Clubs | Strain::Diamonds)
    }

    pub fn is_major(self) -> bool {
        matches!(self, Strain::Hearts | Strain::Spades)
    }

    /// Symbol used in contract notation ("♣", "♦", "♥", "♠", "NT")
    pub fn symbol(self) -> &'static str {
        match self {
            Strain::Clubs => "♣",
            Strain::Diamonds => "♦",
            Strain::Hearts => "♥",
            Strain::Spades => "♠",
            Strain::NoTrump => "NT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    North,
    East,
    South,
    West,
}

impl Seat {
    pub fn letter(self) -> char {
        match self {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        }
    }

    pub fn is_north_south(self) -> bool {
        matches!(self, Seat::North | Seat::South)
    }

    /// Dealer rotates N, E, S, W with the deal number (1-based).
    pub fn dealer_for(deal_number: u32) -> Seat {
        match (deal_number.max(1) - 1) % 4 {
            0 => Seat::North,
            1 => Seat::East,
            2 => Seat::South,
            _ => Seat::West,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Doubling {
    None,
    Doubled,
    Redoubled,
}

impl Doubling {
    /// Suffix used in contract notation ("", "X", "XX")
    pub fn suffix(self) -> &'static str {
        match self {
            Doubling::None => "",
            Doubling::Doubled => "X",
            Doubling::Redoubled => "XX",
        }
    }

    pub fn trick_multiplier(self) -> i32 {
        match self {
            Doubling::None => 1,
            Doubling::Doubled => 2,
            Doubling::Redoubled => 4,
        }
    }
}

/// Which partnerships are vulnerable on a deal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub ns: bool,
    pub ew: bool,
}

impl Vulnerability {
    pub const NONE: Vulnerability = Vulnerability { ns: false, ew: false };

    /// Standard 16-board vulnerability rotation by deal number (1-based).
    pub fn for_deal(deal_number: u32) -> Vulnerability {
        if deal_number == 0 {
            return Vulnerability::NONE;
        }

        match (deal_number - 1) % 16 {
            0 | 7 | 10 | 13 => Vulnerability { ns: false, ew: false },
            1 | 4 | 11 | 14 => Vulnerability { ns: true, ew: false },
            2 | 5 | 8 | 15 => Vulnerability { ns: false, ew: true },
            _ => Vulnerability { ns: true, ew: true },
        }
    }

    /// Vulnerability of one side: `north_south` selects which.
    pub fn side(self, north_south: bool) -> bool {
        if north_south {
            self.ns
        } else {
            self.ew
        }
    }

    pub fn describe(self) -> &'static str {
        match (self.ns, self.ew) {
            (true, true) => "All Vulnerable",
            (true, false) => "NS Vulnerable",
            (false, true) => "EW Vulnerable",
            (false, false) => "None Vulnerable",
        }
    }
}

/// Outcome of a deal relative to the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Made { overtricks: i32 },
    Defeated { undertricks: i32 },
}

/// Normalized facts about one played contract, produced by [`parse_contract`].
///
/// Everything either calculator needs is derivable from these fields; the
/// struct holds no state and is recomputed per deal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractFact {
    pub level: u8,
    pub strain: Strain,
    pub declarer: Seat,
    pub doubling: Doubling,
    pub declarer_vulnerable: bool,
    /// >= 0: made with that many overtricks (0 = exact). < 0: down by that many.
    pub signed_result: i32,
}

impl ContractFact {
    pub fn declarer_is_north_south(&self) -> bool {
        self.declarer.is_north_south()
    }

    pub fn required_tricks(&self) -> i32 {
        i32::from(self.level) + 6
    }

    pub fn actual_tricks(&self) -> i32 {
        self.required_tricks() + self.signed_result
    }

    pub fn contract_made(&self) -> bool {
        self.signed_result >= 0
    }

    pub fn outcome(&self) -> Outcome {
        if self.signed_result >= 0 {
            Outcome::Made {
                overtricks: self.signed_result,
            }
        } else {
            Outcome::Defeated {
                undertricks: -self.signed_result,
            }
        }
    }

    /// Game contracts: 3NT, 4 of a major, 5 of a minor, or any slam level.
    pub fn is_game(&self) -> bool {
        (self.level == 3 && self.strain == Strain::NoTrump)
            || (self.level == 4 && self.strain.is_major())
            || (self.level == 5 && self.strain.is_minor())
            || self.level >= 6
    }
}

impl fmt::Display for ContractFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}{}",
            self.level,
            self.strain.symbol(),
            self.declarer.letter(),
            self.doubling.suffix()
        )
    }
}

/// Parse a contract string like "4♥ N", "3NT E", "6♠ SXX" into a
/// [`ContractFact`].
///
/// Accepted shape: level 1-7, strain symbol or "NT", whitespace, declarer
/// letter N/E/S/W, optional "X" or "XX". Anything else is an error; the
/// caller decides whether to re-prompt.
pub fn parse_contract(
    text: &str,
    signed_result: i32,
    vulnerable: Vulnerability,
) -> Result<ContractFact> {
    let s = text.trim();
    if s.is_empty() {
        bail!("empty contract");
    }

    let mut chars = s.chars();
    let level = match chars.next() {
        Some(c @ '1'..='7') => c as u8 - b'0',
        Some(c) => bail!("invalid contract level '{}': must be 1-7", c),
        None => bail!("empty contract"),
    };

    let rest = chars.as_str();
    let (strain, rest) = if let Some(r) = rest.strip_prefix("NT") {
        (Strain::NoTrump, r)
    } else if let Some(r) = rest.strip_prefix('♣') {
        (Strain::Clubs, r)
    } else if let Some(r) = rest.strip_prefix('♦') {
        (Strain::Diamonds, r)
    } else if let Some(r) = rest.strip_prefix('♥') {
        (Strain::Hearts, r)
    } else if let Some(r) = rest.strip_prefix('♠') {
        (Strain::Spades, r)
    } else {
        bail!("invalid strain in contract '{}': expected ♣, ♦, ♥, ♠ or NT", s);
    };

    let after_space = rest.trim_start();
    if after_space.len() == rest.len() {
        bail!("expected a space before the declarer in '{}'", s);
    }

    let mut chars = after_space.chars();
    let declarer = match chars.next() {
        Some('N') => Seat::North,
        Some('E') => Seat::East,
        Some('S') => Seat::South,
        Some('W') => Seat::West,
        _ => bail!("invalid declarer in contract '{}': expected N, E, S or W", s),
    };

    let doubling = match chars.as_str() {
        "" => Doubling::None,
        "X" => Doubling::Doubled,
        "XX" => Doubling::Redoubled,
        other => bail!("invalid doubling suffix '{}': expected X or XX", other),
    };

    Ok(ContractFact {
        level,
        strain,
        declarer,
        doubling,
        declarer_vulnerable: vulnerable.side(declarer.is_north_south()),
        signed_result,
    })
}
