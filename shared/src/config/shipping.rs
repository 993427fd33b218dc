//! Shipping fee configuration module
//!
//! The live settings snapshot is owned by the hosted database. These values
//! seed the in-memory settings source used when no database is configured.

use serde::{Deserialize, Serialize};

/// Remote delivery region classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Jeju and adjacent islands
    Jeju,
    /// Remote mountain or access-limited areas
    Mountain,
}

impl RegionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionKind::Jeju => "jeju",
            RegionKind::Mountain => "mountain",
        }
    }
}

impl std::str::FromStr for RegionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jeju" | "island" => Ok(RegionKind::Jeju),
            "mountain" | "remote" => Ok(RegionKind::Mountain),
            _ => Err(format!("Invalid region: {}", s)),
        }
    }
}

/// Whether the regional surcharge survives the free-shipping threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargePolicy {
    /// Surcharge is charged regardless of order amount
    #[default]
    AlwaysCharge,
    /// Surcharge is waived together with the base fee
    WaiveWithFreeShipping,
}

/// One zipcode table row; `pattern` is a full zipcode or a zipcode prefix
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ZipcodeRule {
    pub pattern: String,
    pub region: RegionKind,
    pub additional_fee: i64,
}

/// Shipping fee configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShippingConfig {
    /// Base fee in won
    #[serde(default = "default_base_fee")]
    pub base_fee: i64,

    /// Order amount (won) at or above which the base fee is waived
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: i64,

    #[serde(default)]
    pub surcharge_policy: SurchargePolicy,

    /// Zipcode table used when no database is configured
    #[serde(default = "default_zipcodes")]
    pub zipcodes: Vec<ZipcodeRule>,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            base_fee: default_base_fee(),
            free_shipping_threshold: default_free_shipping_threshold(),
            surcharge_policy: SurchargePolicy::default(),
            zipcodes: default_zipcodes(),
        }
    }
}

fn default_base_fee() -> i64 {
    3000
}

fn default_free_shipping_threshold() -> i64 {
    50000
}

fn default_zipcodes() -> Vec<ZipcodeRule> {
    vec![
        ZipcodeRule {
            pattern: "63".to_string(),
            region: RegionKind::Jeju,
            additional_fee: 3000,
        },
        ZipcodeRule {
            pattern: "402".to_string(),
            region: RegionKind::Mountain,
            additional_fee: 5000,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_str() {
        assert_eq!("jeju".parse::<RegionKind>().unwrap(), RegionKind::Jeju);
        assert_eq!("Mountain".parse::<RegionKind>().unwrap(), RegionKind::Mountain);
        assert!("seoul".parse::<RegionKind>().is_err());
    }

    #[test]
    fn test_surcharge_policy_default_charges() {
        assert_eq!(SurchargePolicy::default(), SurchargePolicy::AlwaysCharge);
        let policy: SurchargePolicy = serde_json::from_str("\"waive_with_free_shipping\"").unwrap();
        assert_eq!(policy, SurchargePolicy::WaiveWithFreeShipping);
    }

    #[test]
    fn test_default_table_covers_jeju() {
        let config = ShippingConfig::default();
        assert!(config
            .zipcodes
            .iter()
            .any(|rule| rule.region == RegionKind::Jeju && "63100".starts_with(&rule.pattern)));
    }
}
