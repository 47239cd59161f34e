use crate::customer::CustomerSegments;
use crate::enrich::EnrichedTransaction;
use crate::report::primitives::safe_mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Headline scalar metrics of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_transactions: usize,
    /// Mean `total_amount` per transaction (0 for an empty batch)
    pub avg_order_value: f64,
    pub unique_customers: usize,
    /// Share of customers with more than one order (0 when there are none)
    pub retention_rate: f64,
}

pub fn compute_kpis(transactions: &[EnrichedTransaction], customers: &CustomerSegments) -> Kpis {
    let total_revenue: f64 = transactions.iter().map(EnrichedTransaction::total_amount).sum();
    let unique_customers = transactions
        .iter()
        .map(EnrichedTransaction::customer_id)
        .collect::<BTreeSet<_>>()
        .len();
    let returning = customers.values().filter(|c| c.order_count > 1).count();

    Kpis {
        total_revenue,
        total_transactions: transactions.len(),
        avg_order_value: safe_mean(total_revenue, transactions.len()),
        unique_customers,
        retention_rate: safe_mean(returning as f64, customers.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RevenueBuckets, SegmentRules};
    use crate::customer::aggregate_customers;
    use crate::enrich::enrich_batch;
    use crate::transaction::Transaction;

    #[test]
    fn kpis_over_small_batch() {
        let batch = vec![
            Transaction::new("T1", "A", "2024-01-02 10:00:00", 1, 40.0),
            Transaction::new("T2", "B", "2024-01-03 10:00:00", 1, 20.0),
            Transaction::new("T3", "A", "2024-01-04 10:00:00", 1, 30.0),
        ];
        let enriched = enrich_batch(&batch, &RevenueBuckets::default()).unwrap();
        let customers = aggregate_customers(&enriched, &SegmentRules::default());
        let kpis = compute_kpis(&enriched, &customers);

        assert_eq!(kpis.total_revenue, 90.0);
        assert_eq!(kpis.total_transactions, 3);
        assert_eq!(kpis.avg_order_value, 30.0);
        assert_eq!(kpis.unique_customers, 2);
        assert_eq!(kpis.retention_rate, 0.5);
    }

    #[test]
    fn empty_batch_yields_zero_kpis() {
        let kpis = compute_kpis(&[], &CustomerSegments::new());
        assert_eq!(kpis, Kpis::default());
    }
}
