use crate::config::SegmentRules;
use crate::enrich::EnrichedTransaction;
use crate::transaction::round_cents;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Customer classification derived from spend and order frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "VIP")]
    Vip,
    Regular,
    New,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Vip, Segment::Regular, Segment::New];

    /// Classifies a customer. Rules are evaluated in priority order and the
    /// first match wins: VIP, then Regular, otherwise New.
    pub fn classify(total_spent: f64, order_count: u64, rules: &SegmentRules) -> Self {
        if total_spent > rules.vip_spend && order_count > rules.vip_orders {
            Segment::Vip
        } else if total_spent > rules.regular_spend || order_count > rules.regular_orders {
            Segment::Regular
        } else {
            Segment::New
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Vip => "VIP",
            Segment::Regular => "Regular",
            Segment::New => "New",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-customer rollup of the enriched batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAggregate {
    pub customer_id: String,
    pub total_spent: f64,
    pub order_count: u64,
    pub last_purchase: NaiveDateTime,
    pub avg_order_value: f64,
    pub segment: Segment,
}

/// Customer aggregates keyed by customer id.
pub type CustomerSegments = BTreeMap<String, CustomerAggregate>;

struct CustomerFold {
    total_spent: f64,
    order_count: u64,
    last_purchase: NaiveDateTime,
}

impl CustomerFold {
    fn start(txn: &EnrichedTransaction) -> Self {
        CustomerFold {
            total_spent: txn.total_amount(),
            order_count: 1,
            last_purchase: txn.timestamp,
        }
    }

    fn add(&mut self, txn: &EnrichedTransaction) {
        self.total_spent += txn.total_amount();
        self.order_count += 1;
        self.last_purchase = self.last_purchase.max(txn.timestamp);
    }

    fn finish(self, customer_id: String, rules: &SegmentRules) -> CustomerAggregate {
        // Classify on the cent value so float drift cannot cross a threshold.
        let total_spent = round_cents(self.total_spent);
        // A fold only exists once a transaction was seen, so order_count >= 1.
        let avg_order_value = round_cents(total_spent / self.order_count as f64);
        CustomerAggregate {
            segment: Segment::classify(total_spent, self.order_count, rules),
            customer_id,
            total_spent,
            order_count: self.order_count,
            last_purchase: self.last_purchase,
            avg_order_value,
        }
    }
}

/// Groups the enriched batch by customer and classifies each customer.
pub fn aggregate_customers(
    transactions: &[EnrichedTransaction],
    rules: &SegmentRules,
) -> CustomerSegments {
    let mut folds: BTreeMap<String, CustomerFold> = BTreeMap::new();
    for txn in transactions {
        match folds.get_mut(txn.customer_id()) {
            Some(fold) => fold.add(txn),
            None => {
                folds.insert(txn.customer_id().to_string(), CustomerFold::start(txn));
            }
        }
    }

    folds
        .into_iter()
        .map(|(customer_id, fold)| {
            let aggregate = fold.finish(customer_id.clone(), rules);
            (customer_id, aggregate)
        })
        .collect()
}

/// Number of customers in each segment, in `Segment::ALL` order.
pub fn segment_counts(customers: &CustomerSegments) -> Vec<(Segment, usize)> {
    Segment::ALL
        .iter()
        .map(|&segment| {
            let count = customers.values().filter(|c| c.segment == segment).count();
            (segment, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevenueBuckets;
    use crate::enrich::enrich_batch;
    use crate::transaction::Transaction;

    fn classify(spent: f64, orders: u64) -> Segment {
        Segment::classify(spent, orders, &SegmentRules::default())
    }

    #[test]
    fn segment_boundaries() {
        assert_eq!(classify(2001.0, 11), Segment::Vip);
        assert_eq!(classify(2000.0, 11), Segment::Regular);
        assert_eq!(classify(2001.0, 10), Segment::Regular);
        assert_eq!(classify(1000.01, 1), Segment::Regular);
        assert_eq!(classify(1000.0, 5), Segment::New);
        assert_eq!(classify(10.0, 6), Segment::Regular);
        assert_eq!(classify(500.0, 1), Segment::New);
    }

    #[test]
    fn aggregates_sum_count_and_latest_purchase() {
        let batch = vec![
            Transaction::new("T1", "A", "2024-01-02 10:00:00", 1, 50.0),
            Transaction::new("T2", "B", "2024-01-03 10:00:00", 2, 25.0),
            Transaction::new("T3", "A", "2024-01-05 08:30:00", 1, 60.0),
            Transaction::new("T4", "A", "2024-01-04 22:00:00", 1, 10.0),
        ];
        let enriched = enrich_batch(&batch, &RevenueBuckets::default()).unwrap();
        let customers = aggregate_customers(&enriched, &SegmentRules::default());

        assert_eq!(customers.len(), 2);
        let a = &customers["A"];
        assert_eq!(a.total_spent, 120.0);
        assert_eq!(a.order_count, 3);
        assert_eq!(a.avg_order_value, 40.0);
        assert_eq!(a.last_purchase.to_string(), "2024-01-05 08:30:00");
        assert_eq!(a.segment, Segment::New);

        let b = &customers["B"];
        assert_eq!(b.total_spent, 50.0);
        assert_eq!(b.order_count, 1);
    }

    #[test]
    fn threshold_spend_is_compared_in_cents() {
        // These eleven amounts sum to 2000.0000000000002 in f64
        let amounts = [
            61.52, 319.73, 18.58, 255.47, 283.62, 398.1, 1.39, 291.89, 174.55, 149.93, 45.22,
        ];
        let batch: Vec<Transaction> = amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| {
                Transaction::new(format!("T{i}"), "A", "2024-01-02 10:00:00", 1, amount)
            })
            .collect();
        let enriched = enrich_batch(&batch, &RevenueBuckets::default()).unwrap();
        let customers = aggregate_customers(&enriched, &SegmentRules::default());

        let a = &customers["A"];
        assert_eq!(a.total_spent, 2000.0);
        assert_eq!(a.order_count, 11);
        assert_eq!(a.segment, Segment::Regular);
        assert_eq!(a.avg_order_value, 181.82);
    }

    #[test]
    fn empty_batch_has_no_customers() {
        let customers = aggregate_customers(&[], &SegmentRules::default());
        assert!(customers.is_empty());
        assert_eq!(
            segment_counts(&customers),
            vec![(Segment::Vip, 0), (Segment::Regular, 0), (Segment::New, 0)]
        );
    }

    #[test]
    fn segment_label_serializes_in_upper_case_for_vip() {
        assert_eq!(serde_json::to_string(&Segment::Vip).unwrap(), "\"VIP\"");
        assert_eq!(Segment::Regular.to_string(), "Regular");
        assert_eq!(format!("{:<8}|", Segment::Vip), "VIP     |");
    }
}
