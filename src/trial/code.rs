use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Mapped values of the first six characters must sum to exactly this.
const CODE_CHECKSUM: u32 = 100;

/// A validated extension code: 7 characters, six letters/digits carrying the
/// checksum plus a final multiplier digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeValidation {
    /// The cleaned (uppercased, whitespace-stripped) code.
    pub code: String,
    pub deals_granted: u32,
    pub multiplier: u32,
}

/// Character values for the checksum: A=3 .. Z=28, digits at face value.
fn char_value(c: char) -> Option<u32> {
    match c {
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 3),
        '0'..='9' => Some(c as u32 - '0' as u32),
        _ => None,
    }
}

/// Validate a 7-character extension code. Whitespace is ignored and case
/// does not matter. The final digit (1-9) times 100 is the number of deals
/// the code grants.
pub fn validate_extension_code(code: &str) -> Result<CodeValidation> {
    let clean: String = code
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    let chars: Vec<char> = clean.chars().collect();
    if chars.len() != 7 {
        bail!("extension code must be 7 characters");
    }

    let multiplier = match chars[6] {
        c @ '1'..='9' => c as u32 - '0' as u32,
        _ => bail!("extension code must end with a digit 1-9"),
    };

    let mut sum = 0;
    for &c in &chars[..6] {
        match char_value(c) {
            Some(v) => sum += v,
            None => bail!("invalid character '{}' in extension code", c),
        }
    }

    if sum != CODE_CHECKSUM {
        bail!("invalid extension code");
    }

    Ok(CodeValidation {
        code: clean,
        deals_granted: multiplier * 100,
        multiplier,
    })
}

/// Generate a valid sample code for a deal package of 100..900 deals in
/// steps of 100. Six random letters whose values sum to the checksum, then
/// the multiplier digit.
pub fn generate_sample_code(deal_package: u32) -> Result<String> {
    if deal_package == 0 || deal_package > 900 || deal_package % 100 != 0 {
        bail!("deal package must be 100, 200, ... up to 900");
    }
    let multiplier = deal_package / 100;

    let mut rng = rand::rng();
    let mut values: Vec<u32> = Vec::with_capacity(6);
    let mut remaining = CODE_CHECKSUM;

    // First five values, each constrained so the rest can still sum out
    for i in 0..5u32 {
        let left = 5 - i;
        let max = remaining.saturating_sub(left * 3).min(28);
        let min = remaining.saturating_sub(left * 28).max(3);
        let value = rng.random_range(min..=max);
        values.push(value);
        remaining -= value;
    }
    values.push(remaining);
    values.shuffle(&mut rng);

    let letters: String = values.iter().map(|&v| (b'A' + (v - 3) as u8) as char).collect();
    Ok(format!("{}{}", letters, multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_checksum_codes() {
        // O=17 five times plus M=15 sums to 100
        let validation = validate_extension_code("OOOOOM3").unwrap();
        assert_eq!(validation.code, "OOOOOM3");
        assert_eq!(validation.multiplier, 3);
        assert_eq!(validation.deals_granted, 300);

        // Digits count at face value: Z+Z+Z+9+1+6 = 84+16 = 100
        let validation = validate_extension_code("ZZZ9165").unwrap();
        assert_eq!(validation.deals_granted, 500);
    }

    #[test]
    fn test_validate_cleans_case_and_whitespace() {
        let validation = validate_extension_code(" oooo om 3 ").unwrap();
        assert_eq!(validation.code, "OOOOOM3");
    }

    #[test]
    fn test_validate_rejects_bad_codes() {
        assert!(validate_extension_code("").is_err());
        assert!(validate_extension_code("OOOOOM").is_err()); // too short
        assert!(validate_extension_code("OOOOOM33").is_err()); // too long
        assert!(validate_extension_code("AAAAAA1").is_err()); // sum 18, not 100
        assert!(validate_extension_code("OOOOO-3").is_err()); // invalid character
        assert!(validate_extension_code("OOOOOM0").is_err()); // multiplier 0
        assert!(validate_extension_code("OOOOOMX").is_err()); // multiplier not a digit
    }

    #[test]
    fn test_generated_codes_validate() {
        for package in [100, 200, 500, 900] {
            let code = generate_sample_code(package).unwrap();
            let validation = validate_extension_code(&code).unwrap();
            assert_eq!(
                validation.deals_granted, package,
                "generated code {} should grant {} deals",
                code, package
            );
        }
    }

    #[test]
    fn test_generate_rejects_bad_packages() {
        assert!(generate_sample_code(0).is_err());
        assert!(generate_sample_code(50).is_err());
        assert!(generate_sample_code(150).is_err());
        assert!(generate_sample_code(1000).is_err());
    }
}
