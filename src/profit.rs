//! Marketplace profit estimator.
//!
//! Flat fee schedule: 15% referral on the sale price, a per-size fulfillment
//! fee and a monthly storage charge. Good enough for a first-pass sourcing
//! decision, not an accounting tool.

use serde::{Deserialize, Serialize};

use crate::error::{ProspectError, Result};

/// Referral cut taken on the sale price
pub const REFERRAL_RATE: f64 = 0.15;

/// Fulfillment fee for a small/light item
pub const FULFILLMENT_SMALL: f64 = 3.22;

/// Fulfillment fee for a standard-size item
pub const FULFILLMENT_STANDARD: f64 = 6.50;

/// Default monthly storage charge per unit
pub const DEFAULT_STORAGE: f64 = 0.78;

/// Fulfillment size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    #[default]
    Standard,
}

impl SizeClass {
    pub fn fulfillment_fee(self) -> f64 {
        match self {
            SizeClass::Small => FULFILLMENT_SMALL,
            SizeClass::Standard => FULFILLMENT_STANDARD,
        }
    }
}

/// One profit estimate, all figures in the listing currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitEstimate {
    pub price: f64,
    pub cost: f64,
    pub referral_fee: f64,
    pub fulfillment_fee: f64,
    pub storage_fee: f64,
    pub net: f64,
    /// Net over cost, as a percentage
    pub roi_pct: f64,
}

/// Estimate net profit and ROI for sourcing one unit at `cost` and selling
/// at `price`. Rejects non-positive or non-finite inputs.
pub fn estimate(
    price: f64,
    cost: f64,
    size: SizeClass,
    storage_fee: Option<f64>,
) -> Result<ProfitEstimate> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ProspectError::ConfigError(
            "sale price must be a positive number".to_string(),
        ));
    }
    if !cost.is_finite() || cost <= 0.0 {
        return Err(ProspectError::ConfigError(
            "unit cost must be a positive number".to_string(),
        ));
    }

    let storage_fee = storage_fee.unwrap_or(DEFAULT_STORAGE);
    let referral_fee = price * REFERRAL_RATE;
    let fulfillment_fee = size.fulfillment_fee();
    let net = price - cost - referral_fee - fulfillment_fee - storage_fee;
    let roi_pct = net / cost * 100.0;

    Ok(ProfitEstimate {
        price,
        cost,
        referral_fee,
        fulfillment_fee,
        storage_fee,
        net,
        roi_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_size_estimate() {
        let est = estimate(29.99, 8.00, SizeClass::Standard, None).unwrap();
        assert!((est.referral_fee - 4.4985).abs() < 1e-9);
        assert_eq!(est.fulfillment_fee, FULFILLMENT_STANDARD);
        assert_eq!(est.storage_fee, DEFAULT_STORAGE);
        // 29.99 - 8.00 - 4.4985 - 6.50 - 0.78
        assert!((est.net - 10.2115).abs() < 1e-9);
        assert!((est.roi_pct - 127.64375).abs() < 1e-6);
    }

    #[test]
    fn test_small_size_uses_lower_fee() {
        let est = estimate(20.0, 5.0, SizeClass::Small, Some(0.5)).unwrap();
        assert_eq!(est.fulfillment_fee, FULFILLMENT_SMALL);
        assert_eq!(est.storage_fee, 0.5);
    }

    #[test]
    fn test_negative_net_is_allowed() {
        let est = estimate(5.0, 4.0, SizeClass::Standard, None).unwrap();
        assert!(est.net < 0.0);
        assert!(est.roi_pct < 0.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(estimate(0.0, 5.0, SizeClass::Standard, None).is_err());
        assert!(estimate(10.0, 0.0, SizeClass::Standard, None).is_err());
        assert!(estimate(10.0, -3.0, SizeClass::Standard, None).is_err());
        assert!(estimate(f64::NAN, 5.0, SizeClass::Standard, None).is_err());
    }
}
