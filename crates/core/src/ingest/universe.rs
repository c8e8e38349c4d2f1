//! Candidate symbols per risk profile.

use crate::domain::profile::RiskProfile;

const CONSERVATIVE: &[&str] = &["AAPL", "MSFT", "JNJ", "PG", "KO", "PEP", "VZ", "T", "PFE", "MRK"];
const MODERATE: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "FB", "V", "MA", "PYPL", "DIS", "NFLX"];
const AGGRESSIVE: &[&str] = &["TSLA", "NVDA", "AMD", "PLTR", "SQ", "SHOP", "ROKU", "CRWD", "NET", "DKNG"];

// No sector data is carried, so any preference just narrows to the head of the list.
const SECTOR_PREFERENCE_LIMIT: usize = 5;

const COMPANY_NAMES: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("JNJ", "Johnson & Johnson"),
    ("PG", "Procter & Gamble Co."),
    ("KO", "The Coca-Cola Company"),
    ("PEP", "PepsiCo, Inc."),
    ("VZ", "Verizon Communications Inc."),
    ("T", "AT&T Inc."),
    ("PFE", "Pfizer Inc."),
    ("MRK", "Merck & Co., Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com, Inc."),
    ("FB", "Meta Platforms, Inc."),
    ("V", "Visa Inc."),
    ("MA", "Mastercard Incorporated"),
    ("PYPL", "PayPal Holdings, Inc."),
    ("DIS", "The Walt Disney Company"),
    ("NFLX", "Netflix, Inc."),
    ("TSLA", "Tesla, Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("AMD", "Advanced Micro Devices, Inc."),
    ("PLTR", "Palantir Technologies Inc."),
    ("SQ", "Block, Inc."),
    ("SHOP", "Shopify Inc."),
    ("ROKU", "Roku, Inc."),
    ("CRWD", "CrowdStrike Holdings, Inc."),
    ("NET", "Cloudflare, Inc."),
    ("DKNG", "DraftKings Inc."),
];

#[derive(Debug, Clone, Default)]
pub struct UniverseOptions {
    pub sector_preferences: Vec<String>,
    pub exclusions: Vec<String>,
}

pub fn build_universe(risk: RiskProfile, opts: &UniverseOptions) -> Vec<String> {
    let base = match risk {
        RiskProfile::Conservative => CONSERVATIVE,
        RiskProfile::Moderate => MODERATE,
        RiskProfile::Aggressive => AGGRESSIVE,
    };

    let limit = if opts.sector_preferences.is_empty() {
        base.len()
    } else {
        SECTOR_PREFERENCE_LIMIT
    };

    base.iter()
        .take(limit)
        .filter(|s| !opts.exclusions.iter().any(|x| x.eq_ignore_ascii_case(s)))
        .map(|s| s.to_string())
        .collect()
}

/// Display name, falling back to the symbol itself.
pub fn company_name(symbol: &str) -> &str {
    COMPANY_NAMES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, name)| *name)
        .unwrap_or(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_list_by_profile() {
        let u = build_universe(RiskProfile::Aggressive, &UniverseOptions::default());
        assert_eq!(u.len(), 10);
        assert_eq!(u[0], "TSLA");
    }

    #[test]
    fn sector_preferences_narrow_then_exclusions_apply() {
        let opts = UniverseOptions {
            sector_preferences: vec!["Technology".to_string()],
            exclusions: vec!["msft".to_string(), "NFLX".to_string()],
        };
        let u = build_universe(RiskProfile::Moderate, &opts);
        assert_eq!(u, ["AAPL", "GOOGL", "AMZN", "FB"]);
    }

    #[test]
    fn names_fall_back_to_symbol() {
        assert_eq!(company_name("ko"), "The Coca-Cola Company");
        assert_eq!(company_name("ZZZZ"), "ZZZZ");
    }
}
