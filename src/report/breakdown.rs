//! Grouped revenue breakdowns: by category, channel, day, product, hour,
//! weekday/weekend, region and month.

use crate::enrich::EnrichedTransaction;
use crate::report::primitives::{
    group_in_encounter_order, safe_mean, sort_desc_stable, sum_by, RevenueAccumulator,
    RevenueStats,
};
use crate::transaction::{Region, SalesChannel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRevenue {
    pub channel: SalesChannel,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub product_name: String,
    pub revenue: f64,
    pub quantity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyRevenue {
    pub hour: u32,
    pub revenue: f64,
}

/// Revenue of one side of the weekday/weekend split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRevenue {
    pub revenue: f64,
    pub avg_order_value: f64,
    pub transactions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekendSplit {
    pub weekday: PeriodRevenue,
    pub weekend: PeriodRevenue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPerformance {
    pub region: Region,
    #[serde(flatten)]
    pub stats: RevenueStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub stats: RevenueStats,
}

/// Revenue per category, highest first.
pub fn revenue_by_category(transactions: &[EnrichedTransaction]) -> Vec<CategoryRevenue> {
    let mut rows: Vec<CategoryRevenue> = sum_by(
        transactions,
        |txn| txn.transaction.category.clone(),
        EnrichedTransaction::total_amount,
    )
    .into_iter()
    .map(|(category, revenue)| CategoryRevenue { category, revenue })
    .collect();
    sort_desc_stable(&mut rows, |row| row.revenue);
    rows
}

/// Revenue per sales channel, highest first.
pub fn revenue_by_channel(transactions: &[EnrichedTransaction]) -> Vec<ChannelRevenue> {
    let mut rows: Vec<ChannelRevenue> = sum_by(
        transactions,
        |txn| txn.transaction.sales_channel,
        EnrichedTransaction::total_amount,
    )
    .into_iter()
    .map(|(channel, revenue)| ChannelRevenue { channel, revenue })
    .collect();
    sort_desc_stable(&mut rows, |row| row.revenue);
    rows
}

/// Revenue per calendar date, oldest first.
pub fn daily_revenue(transactions: &[EnrichedTransaction]) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for txn in transactions {
        *days.entry(txn.date()).or_default() += txn.total_amount();
    }
    days.into_iter()
        .map(|(date, revenue)| DailyRevenue { date, revenue })
        .collect()
}

/// The `limit` best-selling products by revenue, with units sold.
///
/// Products with equal revenue keep the order in which they first appear.
pub fn top_products(transactions: &[EnrichedTransaction], limit: usize) -> Vec<ProductPerformance> {
    let mut rows: Vec<ProductPerformance> = group_in_encounter_order(
        transactions,
        |txn| txn.transaction.product_name.clone(),
        |acc: &mut (f64, u64), txn| {
            acc.0 += txn.total_amount();
            acc.1 += u64::from(txn.transaction.quantity);
        },
    )
    .into_iter()
    .map(|(product_name, (revenue, quantity))| ProductPerformance {
        product_name,
        revenue,
        quantity,
    })
    .collect();
    sort_desc_stable(&mut rows, |row| row.revenue);
    rows.truncate(limit);
    rows
}

/// Revenue per hour of day for the hours that saw sales, ascending.
pub fn hourly_sales(transactions: &[EnrichedTransaction]) -> Vec<HourlyRevenue> {
    let mut hours: BTreeMap<u32, f64> = BTreeMap::new();
    for txn in transactions {
        *hours.entry(txn.hour).or_default() += txn.total_amount();
    }
    hours
        .into_iter()
        .map(|(hour, revenue)| HourlyRevenue { hour, revenue })
        .collect()
}

/// Hour with the highest revenue. The earliest hour wins ties.
pub fn peak_hour(hourly: &[HourlyRevenue]) -> Option<HourlyRevenue> {
    hourly.iter().fold(None, |best: Option<HourlyRevenue>, row| match best {
        Some(current) if current.revenue >= row.revenue => Some(current),
        _ => Some(*row),
    })
}

pub fn weekend_split(transactions: &[EnrichedTransaction]) -> WeekendSplit {
    let mut weekday = (0.0, 0usize);
    let mut weekend = (0.0, 0usize);
    for txn in transactions {
        let side = if txn.is_weekend { &mut weekend } else { &mut weekday };
        side.0 += txn.total_amount();
        side.1 += 1;
    }

    let period = |(revenue, transactions): (f64, usize)| PeriodRevenue {
        revenue,
        avg_order_value: safe_mean(revenue, transactions),
        transactions,
    };
    WeekendSplit {
        weekday: period(weekday),
        weekend: period(weekend),
    }
}

pub fn regional_performance(transactions: &[EnrichedTransaction]) -> Vec<RegionalPerformance> {
    let mut regions: BTreeMap<Region, RevenueAccumulator> = BTreeMap::new();
    for txn in transactions {
        if let Some(region) = txn.transaction.region {
            regions
                .entry(region)
                .or_default()
                .add(txn.total_amount(), txn.customer_id());
        }
    }
    regions
        .into_iter()
        .map(|(region, acc)| RegionalPerformance {
            region,
            stats: acc.finish(),
        })
        .collect()
}

pub fn monthly_summary(transactions: &[EnrichedTransaction]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<(i32, u32), RevenueAccumulator> = BTreeMap::new();
    for txn in transactions {
        months
            .entry((txn.year, txn.month))
            .or_default()
            .add(txn.total_amount(), txn.customer_id());
    }
    months
        .into_iter()
        .map(|((year, month), acc)| MonthlySummary {
            year,
            month,
            stats: acc.finish(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevenueBuckets;
    use crate::enrich::enrich_batch;
    use crate::transaction::Transaction;

    fn sale(id: &str, customer: &str, date: &str, amount: f64) -> Transaction {
        Transaction::new(id, customer, date, 1, amount)
    }

    fn enriched(batch: Vec<Transaction>) -> Vec<EnrichedTransaction> {
        enrich_batch(&batch, &RevenueBuckets::default()).unwrap()
    }

    #[test]
    fn category_and_channel_sorted_by_revenue() {
        let batch = enriched(vec![
            sale("T1", "A", "2024-01-02 10:00:00", 10.0)
                .with_product("P1", "Mouse", "Accessories")
                .with_channel(SalesChannel::Online),
            sale("T2", "A", "2024-01-02 11:00:00", 50.0)
                .with_product("P2", "Laptop", "Electronics")
                .with_channel(SalesChannel::InStore),
            sale("T3", "B", "2024-01-02 12:00:00", 15.0)
                .with_product("P1", "Mouse", "Accessories")
                .with_channel(SalesChannel::Online),
        ]);

        let categories = revenue_by_category(&batch);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Electronics");
        assert_eq!(categories[0].revenue, 50.0);
        assert_eq!(categories[1].revenue, 25.0);

        let channels = revenue_by_channel(&batch);
        assert_eq!(channels[0].channel, SalesChannel::InStore);
        assert_eq!(channels[1].channel, SalesChannel::Online);
        assert_eq!(channels[1].revenue, 25.0);
    }

    #[test]
    fn missing_category_excluded_from_grouping_only() {
        let batch = enriched(vec![
            sale("T1", "A", "2024-01-02 10:00:00", 10.0).with_product("P1", "Mouse", "Accessories"),
            sale("T2", "A", "2024-01-02 10:00:00", 99.0),
        ]);
        let categories = revenue_by_category(&batch);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].revenue, 10.0);
    }

    #[test]
    fn daily_revenue_is_date_ordered() {
        let batch = enriched(vec![
            sale("T1", "A", "2024-01-03 10:00:00", 10.0),
            sale("T2", "A", "2024-01-01 09:00:00", 5.0),
            sale("T3", "B", "2024-01-03 23:59:59", 1.0),
        ]);
        let days = daily_revenue(&batch);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(days[0].revenue, 5.0);
        assert_eq!(days[1].revenue, 11.0);
    }

    #[test]
    fn top_products_ties_keep_encounter_order() {
        let batch = enriched(vec![
            Transaction::new("T1", "A", "2024-01-02 10:00:00", 2, 50.0)
                .with_product("P1", "Widget", "Gadgets"),
            Transaction::new("T2", "A", "2024-01-02 10:00:00", 1, 100.0)
                .with_product("P2", "Gizmo", "Gadgets"),
            Transaction::new("T3", "A", "2024-01-02 10:00:00", 1, 300.0)
                .with_product("P3", "Doohickey", "Gadgets"),
            Transaction::new("T4", "A", "2024-01-02 10:00:00", 1, 1.0)
                .with_product("P4", "Trinket", "Gadgets"),
        ]);
        let top = top_products(&batch, 3);
        let names: Vec<_> = top.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["Doohickey", "Widget", "Gizmo"]);
        assert_eq!(top[1].quantity, 2);
        assert_eq!(top[1].revenue, 100.0);
    }

    #[test]
    fn peak_hour_prefers_earliest_on_ties() {
        let batch = enriched(vec![
            sale("T1", "A", "2024-01-02 14:00:00", 40.0),
            sale("T2", "A", "2024-01-02 09:10:00", 25.0),
            sale("T3", "A", "2024-01-02 09:50:00", 15.0),
            sale("T4", "A", "2024-01-02 03:00:00", 5.0),
        ]);
        let hourly = hourly_sales(&batch);
        let hours: Vec<_> = hourly.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![3, 9, 14]);

        let peak = peak_hour(&hourly).unwrap();
        assert_eq!(peak.hour, 9);
        assert_eq!(peak.revenue, 40.0);
        assert_eq!(peak_hour(&[]), None);
    }

    #[test]
    fn weekend_split_guards_empty_side() {
        // 2024-01-13 Saturday, 2024-01-14 Sunday
        let batch = enriched(vec![
            sale("T1", "A", "2024-01-13 10:00:00", 30.0),
            sale("T2", "B", "2024-01-14 10:00:00", 10.0),
        ]);
        let split = weekend_split(&batch);
        assert_eq!(split.weekend.revenue, 40.0);
        assert_eq!(split.weekend.avg_order_value, 20.0);
        assert_eq!(split.weekend.transactions, 2);
        assert_eq!(split.weekday, PeriodRevenue::default());
    }

    #[test]
    fn regional_and_monthly_tables() {
        let batch = enriched(vec![
            sale("T1", "A", "2024-01-31 10:00:00", 30.0).with_region(Region::West),
            sale("T2", "B", "2024-02-01 10:00:00", 10.0).with_region(Region::East),
            sale("T3", "A", "2024-02-02 10:00:00", 20.0).with_region(Region::West),
            sale("T4", "A", "2024-02-03 10:00:00", 20.0),
        ]);

        let regions = regional_performance(&batch);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region, Region::East);
        let west = &regions[1].stats;
        assert_eq!(west.revenue, 50.0);
        assert_eq!(west.transactions, 2);
        assert_eq!(west.avg_order_value, 25.0);
        assert_eq!(west.unique_customers, 1);

        let months = monthly_summary(&batch);
        assert_eq!(months.len(), 2);
        assert_eq!((months[0].year, months[0].month), (2024, 1));
        assert_eq!(months[1].stats.revenue, 50.0);
        assert_eq!(months[1].stats.transactions, 3);
        assert_eq!(months[1].stats.unique_customers, 2);
    }

    #[test]
    fn empty_batch_produces_empty_tables() {
        assert!(revenue_by_category(&[]).is_empty());
        assert!(revenue_by_channel(&[]).is_empty());
        assert!(daily_revenue(&[]).is_empty());
        assert!(top_products(&[], 5).is_empty());
        assert!(hourly_sales(&[]).is_empty());
        assert!(regional_performance(&[]).is_empty());
        assert!(monthly_summary(&[]).is_empty());
        assert_eq!(weekend_split(&[]), WeekendSplit::default());
    }
}
