//! Shipping settings snapshot and fee breakdown

use serde::{Deserialize, Serialize};
use sf_shared::config::{RegionKind, ShippingConfig, SurchargePolicy, ZipcodeRule};

/// Fee settings in effect for a calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSettings {
    /// Base fee in won
    pub base_fee: i64,
    /// Order amount (won) at or above which the base fee is waived
    pub free_shipping_threshold: i64,
    pub surcharge_policy: SurchargePolicy,
}

impl From<&ShippingConfig> for ShippingSettings {
    fn from(config: &ShippingConfig) -> Self {
        Self {
            base_fee: config.base_fee,
            free_shipping_threshold: config.free_shipping_threshold,
            surcharge_policy: config.surcharge_policy,
        }
    }
}

/// One row of the remote-area zipcode table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipcodeEntry {
    /// Full 5-digit zipcode or a zipcode prefix
    pub pattern: String,
    pub region: RegionKind,
    pub additional_fee: i64,
}

impl From<&ZipcodeRule> for ZipcodeEntry {
    fn from(rule: &ZipcodeRule) -> Self {
        Self {
            pattern: rule.pattern.clone(),
            region: rule.region,
            additional_fee: rule.additional_fee,
        }
    }
}

/// Remote-area zipcode table.
///
/// An exact zipcode entry wins over prefix entries; among prefixes the
/// longest match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipcodeTable {
    entries: Vec<ZipcodeEntry>,
}

impl ZipcodeTable {
    pub fn new(entries: Vec<ZipcodeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ZipcodeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry that applies to `zipcode`
    pub fn lookup(&self, zipcode: &str) -> Option<&ZipcodeEntry> {
        // An exact entry is the longest possible prefix, so one pass covers both rules
        self.entries
            .iter()
            .filter(|entry| {
                !entry.pattern.is_empty() && zipcode.starts_with(entry.pattern.as_str())
            })
            .max_by_key(|entry| entry.pattern.len())
    }
}

impl From<&ShippingConfig> for ZipcodeTable {
    fn from(config: &ShippingConfig) -> Self {
        Self::new(config.zipcodes.iter().map(ZipcodeEntry::from).collect())
    }
}

/// Result of a shipping fee calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingFeeBreakdown {
    pub base_shipping_fee: i64,
    pub additional_fee: i64,
    pub total_shipping_fee: i64,
    pub is_free_shipping: bool,
    pub is_jeju: bool,
    pub is_mountain: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pattern: &str, region: RegionKind, fee: i64) -> ZipcodeEntry {
        ZipcodeEntry {
            pattern: pattern.to_string(),
            region,
            additional_fee: fee,
        }
    }

    #[test]
    fn test_lookup_exact_beats_prefix() {
        let table = ZipcodeTable::new(vec![
            entry("63", RegionKind::Jeju, 3000),
            entry("63100", RegionKind::Jeju, 4000),
        ]);
        assert_eq!(table.lookup("63100").map(|e| e.additional_fee), Some(4000));
        assert_eq!(table.lookup("63101").map(|e| e.additional_fee), Some(3000));
    }

    #[test]
    fn test_lookup_longest_prefix_wins() {
        let table = ZipcodeTable::new(vec![
            entry("40", RegionKind::Mountain, 2000),
            entry("402", RegionKind::Mountain, 5000),
        ]);
        assert_eq!(table.lookup("40212").map(|e| e.additional_fee), Some(5000));
        assert_eq!(table.lookup("40112").map(|e| e.additional_fee), Some(2000));
        assert!(table.lookup("12345").is_none());
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let table = ZipcodeTable::new(vec![entry("", RegionKind::Jeju, 3000)]);
        assert!(table.lookup("63100").is_none());
    }

    #[test]
    fn test_from_config() {
        let config = ShippingConfig::default();
        let settings = ShippingSettings::from(&config);
        let table = ZipcodeTable::from(&config);

        assert_eq!(settings.base_fee, 3000);
        assert_eq!(settings.surcharge_policy, SurchargePolicy::AlwaysCharge);
        assert_eq!(table.lookup("63200").map(|e| e.region), Some(RegionKind::Jeju));
    }
}
