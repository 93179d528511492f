use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::alerts::AlertSeverity;
use crate::allocations::{Allocation, AllocationType};
use crate::constants::{
    DISPLAY_DECIMAL_PRECISION, DRIFT_ALERT_HIGH_PCT, DRIFT_HIGH_PCT, DRIFT_MEDIUM_PCT,
};
use crate::drift::drift_model::DriftSeverity;

/// Raw drift numbers for one allocation, before severity classification
#[derive(Debug, Clone, PartialEq)]
pub struct DriftComputation {
    pub target_value: Decimal,
    pub current_value: Decimal,
    pub target_percentage: Decimal,
    pub current_percentage: Decimal,
    pub drift_percentage: Decimal,
    /// Signed correction: positive means the allocation is over target
    pub correction_value: Decimal,
}

/// Measures how far an allocation's realized share sits from its target.
/// Returns `None` for zero-value holdings (and, for percentage allocations,
/// zero-value portfolios): nothing to measure, not an error.
pub fn compute_drift(
    allocation: &Allocation,
    holding_value: Decimal,
    client_total_value: Decimal,
) -> Option<DriftComputation> {
    if holding_value <= Decimal::ZERO {
        return None;
    }

    match allocation.allocation_type {
        AllocationType::Percentage => {
            if client_total_value <= Decimal::ZERO {
                return None;
            }
            let target_percentage = allocation.allocation_value;
            let target_value = holding_value * target_percentage / dec!(100);
            // current equals target by construction: the measured drift is
            // the allocation's share shift inside the client's total
            // portfolio, not the holding's own price movement
            let current_value = target_value;
            let current_percentage = current_value / client_total_value * dec!(100);
            let desired_value = client_total_value * target_percentage / dec!(100);
            Some(DriftComputation {
                target_value,
                current_value,
                target_percentage,
                current_percentage,
                drift_percentage: (current_percentage - target_percentage).abs(),
                correction_value: current_value - desired_value,
            })
        }
        AllocationType::FixedAmount => {
            let target_value = allocation.allocation_value;
            // unlike the valuation path, the drift view caps at what the
            // holding is actually worth
            let current_value = target_value.min(holding_value);
            let target_percentage = target_value / holding_value * dec!(100);
            let current_percentage = current_value / holding_value * dec!(100);
            Some(DriftComputation {
                target_value,
                current_value,
                target_percentage,
                current_percentage,
                drift_percentage: (current_percentage - target_percentage).abs(),
                correction_value: current_value - target_value,
            })
        }
    }
}

pub fn classify_severity(drift_percentage: Decimal) -> DriftSeverity {
    if drift_percentage < DRIFT_MEDIUM_PCT {
        DriftSeverity::Low
    } else if drift_percentage < DRIFT_HIGH_PCT {
        DriftSeverity::Medium
    } else {
        DriftSeverity::High
    }
}

pub fn alerting_severity(drift_percentage: Decimal) -> AlertSeverity {
    if drift_percentage > DRIFT_ALERT_HIGH_PCT {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    }
}

pub fn recommended_action(correction_value: Decimal) -> String {
    let amount = correction_value.abs().round_dp(DISPLAY_DECIMAL_PRECISION);
    if correction_value > Decimal::ZERO {
        format!("Reduce allocation by ${}", amount)
    } else if correction_value < Decimal::ZERO {
        format!("Increase allocation by ${}", amount)
    } else {
        "Review allocation target".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::holdings::AssetType;

    fn allocation(allocation_type: AllocationType, value: Decimal) -> Allocation {
        Allocation {
            id: "alloc-1".to_string(),
            client_id: "client-1".to_string(),
            asset_type: AssetType::Wallet,
            asset_id: "wallet-1".to_string(),
            allocation_type,
            allocation_value: value,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn percentage_at_target_has_zero_drift() {
        // the full holding is allocated out, so the realized share matches
        let alloc = allocation(AllocationType::Percentage, dec!(100));
        let c = compute_drift(&alloc, dec!(10000), dec!(10000)).unwrap();
        assert_eq!(c.drift_percentage, Decimal::ZERO);
        assert_eq!(c.current_value, dec!(10000));
    }

    #[test]
    fn percentage_drift_tracks_portfolio_composition() {
        // 25% of a 10k holding while the client's portfolio grew to 20k:
        // realized share halves from 25% to 12.5%
        let alloc = allocation(AllocationType::Percentage, dec!(25));
        let c = compute_drift(&alloc, dec!(10000), dec!(20000)).unwrap();
        assert_eq!(c.target_value, dec!(2500));
        assert_eq!(c.current_percentage, dec!(12.5));
        assert_eq!(c.drift_percentage, dec!(12.5));
    }

    #[test]
    fn fixed_amount_current_value_is_capped() {
        let alloc = allocation(AllocationType::FixedAmount, dec!(1000));
        let c = compute_drift(&alloc, dec!(500), dec!(500)).unwrap();
        assert_eq!(c.current_value, dec!(500));
        assert_eq!(c.target_percentage, dec!(200));
        assert_eq!(c.current_percentage, dec!(100));
        assert_eq!(c.drift_percentage, dec!(100));
    }

    #[test]
    fn zero_value_holdings_are_skipped() {
        let alloc = allocation(AllocationType::FixedAmount, dec!(1000));
        assert!(compute_drift(&alloc, Decimal::ZERO, dec!(5000)).is_none());
    }

    #[test]
    fn severity_bands() {
        assert_eq!(classify_severity(dec!(4.9)), DriftSeverity::Low);
        assert_eq!(classify_severity(dec!(5)), DriftSeverity::Medium);
        assert_eq!(classify_severity(dec!(9.9)), DriftSeverity::Medium);
        assert_eq!(classify_severity(dec!(10)), DriftSeverity::High);

        assert_eq!(alerting_severity(dec!(20)), AlertSeverity::Medium);
        assert_eq!(alerting_severity(dec!(20.1)), AlertSeverity::High);
    }

    #[test]
    fn recommended_action_names_the_direction() {
        assert_eq!(
            recommended_action(dec!(1250.333)),
            "Reduce allocation by $1250.33"
        );
        assert_eq!(
            recommended_action(dec!(-500)),
            "Increase allocation by $500"
        );
    }
}
