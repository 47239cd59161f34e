//! Shape metadata for handing result tables to a sink.
//!
//! Nothing here reads table values; only record counts and column names.

use crate::customer::{CustomerAggregate, CustomerSegments};
use crate::enrich::EnrichedTransaction;
use crate::report::{
    CategoryChannelMatrix, MonthlySummary, ProductPerformance, RegionalPerformance, SalesReport,
    SegmentPerformance,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const STATS_COLUMNS: [&str; 4] = ["revenue", "transactions", "avg_order_value", "unique_customers"];

/// Row type of a tabular dataset with a fixed column list.
pub trait TableRow {
    fn columns() -> Vec<&'static str>;
}

impl TableRow for EnrichedTransaction {
    fn columns() -> Vec<&'static str> {
        vec![
            "transaction_id",
            "product_id",
            "product_name",
            "category",
            "quantity",
            "unit_price",
            "total_amount",
            "transaction_date",
            "customer_id",
            "sales_channel",
            "payment_method",
            "region",
            "year",
            "month",
            "day",
            "hour",
            "day_of_week",
            "is_weekend",
            "revenue_category",
        ]
    }
}

impl TableRow for CustomerAggregate {
    fn columns() -> Vec<&'static str> {
        vec![
            "customer_id",
            "total_spent",
            "order_count",
            "last_purchase",
            "avg_order_value",
            "segment",
        ]
    }
}

impl TableRow for ProductPerformance {
    fn columns() -> Vec<&'static str> {
        vec!["product_name", "revenue", "quantity"]
    }
}

impl TableRow for MonthlySummary {
    fn columns() -> Vec<&'static str> {
        let mut columns = vec!["year", "month"];
        columns.extend(STATS_COLUMNS);
        columns
    }
}

impl TableRow for RegionalPerformance {
    fn columns() -> Vec<&'static str> {
        let mut columns = vec!["region"];
        columns.extend(STATS_COLUMNS);
        columns
    }
}

impl TableRow for SegmentPerformance {
    fn columns() -> Vec<&'static str> {
        let mut columns = vec!["segment"];
        columns.extend(STATS_COLUMNS);
        columns
    }
}

/// Shape of one exported dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableShape {
    Table { records: usize, columns: Vec<String> },
    Series { records: usize, categories: usize },
}

impl TableShape {
    pub fn table<R: TableRow>(rows: &[R]) -> Self {
        TableShape::Table {
            records: rows.len(),
            columns: R::columns().into_iter().map(String::from).collect(),
        }
    }

    /// A single keyed measure; every record is one category.
    pub fn series<T>(rows: &[T]) -> Self {
        TableShape::Series {
            records: rows.len(),
            categories: rows.len(),
        }
    }

    pub fn pivot(matrix: &CategoryChannelMatrix) -> Self {
        let mut columns = vec!["category".to_string()];
        columns.extend(matrix.channels.iter().map(|channel| channel.to_string()));
        TableShape::Table {
            records: matrix.rows.len(),
            columns,
        }
    }

    pub fn records(&self) -> usize {
        match self {
            TableShape::Table { records, .. } | TableShape::Series { records, .. } => *records,
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, TableShape::Series { .. })
    }
}

/// Dataset name to shape.
pub type ExportSummary = BTreeMap<String, TableShape>;

/// Describes every dataset a sink receives from one pipeline run.
pub fn summarize(
    transactions: &[EnrichedTransaction],
    customers: &CustomerSegments,
    report: &SalesReport,
) -> ExportSummary {
    let customer_shape = TableShape::Table {
        records: customers.len(),
        columns: CustomerAggregate::columns()
            .into_iter()
            .map(String::from)
            .collect(),
    };

    let entries = [
        ("sales_transactions", TableShape::table(transactions)),
        ("customer_segments", customer_shape),
        ("monthly_summary", TableShape::table(&report.monthly_summary)),
        ("top_products", TableShape::table(&report.top_products)),
        ("regional_performance", TableShape::table(&report.regional_performance)),
        ("segment_analysis", TableShape::table(&report.segment_analysis)),
        ("category_channel_matrix", TableShape::pivot(&report.category_channel_matrix)),
        ("revenue_by_category", TableShape::series(&report.revenue_by_category)),
        ("revenue_by_channel", TableShape::series(&report.revenue_by_channel)),
        ("daily_revenue", TableShape::series(&report.daily_revenue)),
        ("hourly_sales", TableShape::series(&report.hourly_sales)),
    ];

    entries
        .into_iter()
        .map(|(name, shape)| (name.to_string(), shape))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReportConfig, RevenueBuckets, SegmentRules};
    use crate::customer::aggregate_customers;
    use crate::enrich::enrich_batch;
    use crate::report::build_report;
    use crate::transaction::{PaymentMethod, Region, SalesChannel, Transaction};

    fn sample() -> Vec<EnrichedTransaction> {
        let batch = vec![
            Transaction::new("T1", "A", "2024-01-02 10:00:00", 1, 10.0)
                .with_product("P1", "Mouse", "Accessories")
                .with_channel(SalesChannel::Online)
                .with_payment_method(PaymentMethod::Cash)
                .with_region(Region::North),
            Transaction::new("T2", "B", "2024-02-03 11:00:00", 2, 20.0)
                .with_product("P2", "Laptop", "Electronics")
                .with_channel(SalesChannel::InStore)
                .with_payment_method(PaymentMethod::PayPal)
                .with_region(Region::South),
        ];
        enrich_batch(&batch, &RevenueBuckets::default()).unwrap()
    }

    fn json_keys<T: Serialize>(row: &T) -> Vec<String> {
        let mut keys: Vec<String> = serde_json::to_value(row)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn sorted(columns: Vec<&'static str>) -> Vec<String> {
        let mut columns: Vec<String> = columns.into_iter().map(String::from).collect();
        columns.sort();
        columns
    }

    #[test]
    fn declared_columns_match_serialized_rows() {
        let enriched = sample();
        let customers = aggregate_customers(&enriched, &SegmentRules::default());
        let report = build_report(&enriched, &customers, &ReportConfig::default());

        assert_eq!(json_keys(&enriched[0]), sorted(EnrichedTransaction::columns()));
        assert_eq!(json_keys(&customers["A"]), sorted(CustomerAggregate::columns()));
        assert_eq!(json_keys(&report.top_products[0]), sorted(ProductPerformance::columns()));
        assert_eq!(json_keys(&report.monthly_summary[0]), sorted(MonthlySummary::columns()));
        assert_eq!(
            json_keys(&report.regional_performance[0]),
            sorted(RegionalPerformance::columns())
        );
        assert_eq!(
            json_keys(&report.segment_analysis[0]),
            sorted(SegmentPerformance::columns())
        );
    }

    #[test]
    fn summary_distinguishes_tables_from_series() {
        let enriched = sample();
        let customers = aggregate_customers(&enriched, &SegmentRules::default());
        let report = build_report(&enriched, &customers, &ReportConfig::default());
        let summary = summarize(&enriched, &customers, &report);

        assert_eq!(summary.len(), 11);
        assert_eq!(summary["sales_transactions"].records(), 2);
        assert!(!summary["sales_transactions"].is_series());
        assert_eq!(summary["customer_segments"].records(), 2);
        assert_eq!(
            summary["category_channel_matrix"],
            TableShape::Table {
                records: 2,
                columns: vec!["category".into(), "In-Store".into(), "Online".into()],
            }
        );
        assert_eq!(
            summary["daily_revenue"],
            TableShape::Series { records: 2, categories: 2 }
        );
        assert!(summary["revenue_by_channel"].is_series());
    }

    #[test]
    fn empty_run_summarizes_to_zero_records() {
        let customers = CustomerSegments::new();
        let report = build_report(&[], &customers, &ReportConfig::default());
        let summary = summarize(&[], &customers, &report);
        assert!(summary.values().all(|shape| shape.records() == 0));
        assert_eq!(
            summary["category_channel_matrix"],
            TableShape::Table { records: 0, columns: vec!["category".into()] }
        );
    }
}
