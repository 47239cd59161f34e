//! KPI and report engine.
//!
//! Every table here is an independent, read-only reduction over the enriched
//! batch and/or the customer aggregates. Empty inputs produce zero scalars and
//! empty tables rather than errors.

pub mod breakdown;
pub mod kpi;
pub mod matrix;
pub mod primitives;
pub mod segments;

use crate::config::ReportConfig;
use crate::customer::CustomerSegments;
use crate::enrich::EnrichedTransaction;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use breakdown::{
    CategoryRevenue, ChannelRevenue, DailyRevenue, HourlyRevenue, MonthlySummary, PeriodRevenue,
    ProductPerformance, RegionalPerformance, WeekendSplit,
};
pub use kpi::Kpis;
pub use matrix::{CategoryChannelMatrix, MatrixRow};
pub use primitives::RevenueStats;
pub use segments::{CustomerValueProfile, Describe, SegmentCount, SegmentPerformance};

/// All report tables produced for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub kpis: Kpis,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub revenue_by_channel: Vec<ChannelRevenue>,
    pub daily_revenue: Vec<DailyRevenue>,
    pub top_products: Vec<ProductPerformance>,
    pub hourly_sales: Vec<HourlyRevenue>,
    pub peak_hour: Option<HourlyRevenue>,
    pub weekend_split: WeekendSplit,
    pub regional_performance: Vec<RegionalPerformance>,
    pub monthly_summary: Vec<MonthlySummary>,
    pub category_channel_matrix: CategoryChannelMatrix,
    pub segment_analysis: Vec<SegmentPerformance>,
    pub segment_counts: Vec<SegmentCount>,
    pub customer_value_profile: Option<CustomerValueProfile>,
}

impl SalesReport {
    /// Highest-revenue category, if any sales carried a category.
    pub fn top_category(&self) -> Option<&CategoryRevenue> {
        self.revenue_by_category.first()
    }

    /// Highest-revenue sales channel, if any sales carried a channel.
    pub fn best_channel(&self) -> Option<&ChannelRevenue> {
        self.revenue_by_channel.first()
    }
}

/// Builds every report table from the enriched batch and customer aggregates.
pub fn build_report(
    transactions: &[EnrichedTransaction],
    customers: &CustomerSegments,
    config: &ReportConfig,
) -> SalesReport {
    let kpis = kpi::compute_kpis(transactions, customers);
    debug!(
        total_revenue = kpis.total_revenue,
        transactions = kpis.total_transactions,
        customers = kpis.unique_customers,
        "computed KPIs"
    );

    let hourly_sales = breakdown::hourly_sales(transactions);
    let peak_hour = breakdown::peak_hour(&hourly_sales);
    let category_channel_matrix = CategoryChannelMatrix::build(transactions);
    debug!(
        categories = category_channel_matrix.rows.len(),
        channels = category_channel_matrix.channels.len(),
        "built category/channel pivot"
    );

    SalesReport {
        kpis,
        revenue_by_category: breakdown::revenue_by_category(transactions),
        revenue_by_channel: breakdown::revenue_by_channel(transactions),
        daily_revenue: breakdown::daily_revenue(transactions),
        top_products: breakdown::top_products(transactions, config.top_products_limit),
        hourly_sales,
        peak_hour,
        weekend_split: breakdown::weekend_split(transactions),
        regional_performance: breakdown::regional_performance(transactions),
        monthly_summary: breakdown::monthly_summary(transactions),
        category_channel_matrix,
        segment_analysis: segments::segment_analysis(transactions, customers),
        segment_counts: segments::segment_customer_counts(customers),
        customer_value_profile: CustomerValueProfile::from_customers(customers),
    }
}
