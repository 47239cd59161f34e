//! Segment-level views: revenue per customer segment and the distribution
//! profile of customer value.

use crate::customer::{segment_counts, CustomerAggregate, CustomerSegments, Segment};
use crate::enrich::EnrichedTransaction;
use crate::report::primitives::{safe_mean, RevenueAccumulator, RevenueStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPerformance {
    pub segment: Segment,
    #[serde(flatten)]
    pub stats: RevenueStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub segment: Segment,
    pub customers: usize,
}

/// Joins each transaction to its customer's segment and aggregates revenue
/// per segment (VIP, Regular, New order; empty segments omitted).
pub fn segment_analysis(
    transactions: &[EnrichedTransaction],
    customers: &CustomerSegments,
) -> Vec<SegmentPerformance> {
    let mut segments: BTreeMap<Segment, RevenueAccumulator> = BTreeMap::new();
    for txn in transactions {
        let Some(customer) = customers.get(txn.customer_id()) else {
            continue;
        };
        segments
            .entry(customer.segment)
            .or_default()
            .add(txn.total_amount(), txn.customer_id());
    }
    segments
        .into_iter()
        .map(|(segment, acc)| SegmentPerformance {
            segment,
            stats: acc.finish(),
        })
        .collect()
}

pub fn segment_customer_counts(customers: &CustomerSegments) -> Vec<SegmentCount> {
    segment_counts(customers)
        .into_iter()
        .map(|(segment, customers)| SegmentCount { segment, customers })
        .collect()
}

/// Summary statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 when fewer than two values
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Describe {
    /// Returns `None` for an empty column.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = safe_mean(sorted.iter().sum(), count);
        let std = if count < 2 {
            0.0
        } else {
            let squared: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (squared / (count - 1) as f64).sqrt()
        };

        Some(Describe {
            count,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.50),
            p75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Distribution of customer lifetime value across the customer base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerValueProfile {
    pub total_spent: Describe,
    pub order_count: Describe,
    pub avg_order_value: Describe,
}

impl CustomerValueProfile {
    /// Returns `None` when there are no customers.
    pub fn from_customers(customers: &CustomerSegments) -> Option<Self> {
        let column = |f: fn(&CustomerAggregate) -> f64| -> Vec<f64> {
            customers.values().map(f).collect()
        };
        Some(CustomerValueProfile {
            total_spent: Describe::of(&column(|c: &CustomerAggregate| c.total_spent))?,
            order_count: Describe::of(&column(|c: &CustomerAggregate| c.order_count as f64))?,
            avg_order_value: Describe::of(&column(|c: &CustomerAggregate| c.avg_order_value))?,
        })
    }
}
