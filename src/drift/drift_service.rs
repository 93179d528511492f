use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::allocations::AllocationRepositoryTrait;
use crate::drift::drift_calculator::{
    alerting_severity, classify_severity, compute_drift, recommended_action,
};
use crate::drift::drift_model::DriftFinding;
use crate::drift::drift_traits::DriftServiceTrait;
use crate::errors::Result;
use crate::valuation::ValuationServiceTrait;

/// Compares target against realized allocation across every active record.
pub struct DriftService<A: AllocationRepositoryTrait, V: ValuationServiceTrait> {
    allocation_repo: Arc<A>,
    valuation: Arc<V>,
}

impl<A: AllocationRepositoryTrait, V: ValuationServiceTrait> DriftService<A, V> {
    pub fn new(allocation_repo: Arc<A>, valuation: Arc<V>) -> Self {
        DriftService {
            allocation_repo,
            valuation,
        }
    }
}

impl<A: AllocationRepositoryTrait, V: ValuationServiceTrait> DriftServiceTrait
    for DriftService<A, V>
{
    fn detect_drift(&self, threshold: Decimal) -> Result<Vec<DriftFinding>> {
        let allocations = self.allocation_repo.get_active_allocations(None)?;
        let mut client_totals: HashMap<String, Decimal> = HashMap::new();
        let mut findings = Vec::new();

        for allocation in allocations {
            let holding_value = match self
                .valuation
                .resolve_holding_value(allocation.asset_type, &allocation.asset_id)
            {
                Ok(value) => value,
                Err(e) => {
                    warn!("Skipping allocation {} in drift pass: {}", allocation.id, e);
                    continue;
                }
            };

            let client_total = match client_totals.get(&allocation.client_id) {
                Some(total) => *total,
                None => match self.valuation.client_total_value(&allocation.client_id) {
                    Ok(total) => {
                        client_totals.insert(allocation.client_id.clone(), total);
                        total
                    }
                    Err(e) => {
                        warn!(
                            "Skipping allocation {}: no portfolio total for client {}: {}",
                            allocation.id, allocation.client_id, e
                        );
                        continue;
                    }
                },
            };

            let computation = match compute_drift(&allocation, holding_value, client_total) {
                Some(c) => c,
                None => continue,
            };
            if computation.drift_percentage <= threshold {
                continue;
            }

            findings.push(DriftFinding {
                allocation_id: allocation.id,
                client_id: allocation.client_id,
                asset_type: allocation.asset_type,
                asset_id: allocation.asset_id,
                allocation_type: allocation.allocation_type,
                target_value: computation.target_value,
                current_value: computation.current_value,
                target_percentage: computation.target_percentage,
                current_percentage: computation.current_percentage,
                drift_percentage: computation.drift_percentage,
                severity: classify_severity(computation.drift_percentage),
                alert_severity: alerting_severity(computation.drift_percentage),
                recommended_action: Some(recommended_action(computation.correction_value)),
            });
        }

        debug!(
            "Drift pass produced {} findings over threshold {}",
            findings.len(),
            threshold
        );
        Ok(findings)
    }
}
