//! Stateless reduction primitives used by the report builders.
//!
//! These are pure functions over slices. Grouping preserves first-encounter
//! order so that stable sorts downstream break ties by input order.

use crate::transaction::round_cents;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Arithmetic mean that yields `0.0` for an empty group instead of NaN.
pub fn safe_mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Groups `items` by `key`, folding each member into a per-group accumulator.
///
/// Groups appear in the order their key was first seen. Items whose key is
/// `None` are skipped.
pub fn group_in_encounter_order<T, K, A, FK, FA>(items: &[T], key: FK, mut fold: FA) -> Vec<(K, A)>
where
    K: Eq + Hash + Clone,
    A: Default,
    FK: Fn(&T) -> Option<K>,
    FA: FnMut(&mut A, &T),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, A)> = Vec::new();

    for item in items {
        let Some(k) = key(item) else {
            continue;
        };
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, A::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, item);
    }

    groups
}

/// Sums `value` per key, in encounter order.
pub fn sum_by<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
    FK: Fn(&T) -> Option<K>,
    FV: Fn(&T) -> f64,
{
    group_in_encounter_order(items, key, |acc: &mut f64, item| *acc += value(item))
}

/// Stable descending sort on a float measure. Equal values keep their order.
pub fn sort_desc_stable<T, F>(rows: &mut [T], measure: F)
where
    F: Fn(&T) -> f64,
{
    rows.sort_by_key(|row| Reverse(OrderedFloat(measure(row))));
}

/// Running revenue statistics for one group.
#[derive(Debug, Clone, Default)]
pub struct RevenueAccumulator {
    sum: f64,
    count: usize,
    customers: BTreeSet<String>,
}

impl RevenueAccumulator {
    pub fn add(&mut self, amount: f64, customer_id: &str) {
        self.sum += amount;
        self.count += 1;
        if !self.customers.contains(customer_id) {
            self.customers.insert(customer_id.to_string());
        }
    }

    /// Revenue and mean are rounded to cents.
    pub fn finish(&self) -> RevenueStats {
        RevenueStats {
            revenue: round_cents(self.sum),
            transactions: self.count,
            avg_order_value: round_cents(safe_mean(self.sum, self.count)),
            unique_customers: self.customers.len(),
        }
    }
}

/// Revenue sum/count/mean and distinct customers of a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueStats {
    pub revenue: f64,
    pub transactions: usize,
    pub avg_order_value: f64,
    pub unique_customers: usize,
}
