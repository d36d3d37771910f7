//! contract configuration
//!
//! the tier count is fixed at three; configuration only sets what each
//! tier costs and how long it lasts

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{ContractAddress, PricingTier};

/// what one tier buys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTerms {
    /// access duration in milliseconds
    pub duration_ms: u64,
    /// price in lovelace
    pub price_lovelace: u64,
}

/// terms for tiers 0, 1, 2 in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSchedule(pub [TierTerms; 3]);

impl TierSchedule {
    pub fn terms(&self, tier: PricingTier) -> TierTerms {
        self.0[tier.index() as usize]
    }

    /// durations must be non-zero and prices strictly increasing
    pub fn validate(&self) -> Result<()> {
        for (i, terms) in self.0.iter().enumerate() {
            if terms.duration_ms == 0 {
                return Err(Error::Config(format!("tier {} has zero duration", i)));
            }
        }
        for pair in self.0.windows(2) {
            if pair[1].price_lovelace <= pair[0].price_lovelace {
                return Err(Error::Config("tier prices must increase".into()));
            }
        }
        Ok(())
    }
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self([
            // 1 hour, 5 ada
            TierTerms {
                duration_ms: 3_600_000,
                price_lovelace: 5_000_000,
            },
            // 3 days, 25 ada
            TierTerms {
                duration_ms: 259_200_000,
                price_lovelace: 25_000_000,
            },
            // 1 year, 100 ada
            TierTerms {
                duration_ms: 31_536_000_000,
                price_lovelace: 100_000_000,
            },
        ])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub contract_address: ContractAddress,
    pub tiers: TierSchedule,
}

impl ContractConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.tiers.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let tiers = TierSchedule::default();
        assert!(tiers.validate().is_ok());
        assert_eq!(tiers.terms(PricingTier::Hour).duration_ms, 3_600_000);
        assert_eq!(tiers.terms(PricingTier::ThreeDays).duration_ms, 259_200_000);
        assert_eq!(tiers.terms(PricingTier::Year).duration_ms, 31_536_000_000);
    }

    #[test]
    fn test_json_defaults_and_overrides() {
        let config = ContractConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ContractConfig::default());

        let json = ContractConfig::default().to_json().unwrap();
        assert_eq!(ContractConfig::from_json_str(&json).unwrap(), ContractConfig::default());
    }

    #[test]
    fn test_rejects_bad_schedule() {
        let mut config = ContractConfig::default();
        config.tiers.0[1].price_lovelace = 1;
        let json = config.to_json().unwrap();
        assert!(matches!(ContractConfig::from_json_str(&json), Err(Error::Config(_))));

        let mut config = ContractConfig::default();
        config.tiers.0[0].duration_ms = 0;
        let json = config.to_json().unwrap();
        assert!(matches!(ContractConfig::from_json_str(&json), Err(Error::Config(_))));

        assert!(matches!(ContractConfig::from_json_str("not json"), Err(Error::Json(_))));
    }
}
