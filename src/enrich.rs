//! Feature enrichment: calendar components and revenue buckets.
//!
//! Every derived field is a pure function of the base record. Timestamps are
//! interpreted as written: no time zone conversion is applied.

use crate::config::RevenueBuckets;
use crate::error::{PipelineError, Result};
use crate::transaction::Transaction;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Ordinal bucket of a transaction's total amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RevenueCategory {
    Low,
    Medium,
    High,
    Premium,
}

impl RevenueCategory {
    /// Buckets an amount using upper-inclusive edges:
    /// `(0, low_max]`, `(low_max, medium_max]`, `(medium_max, high_max]`, `(high_max, inf)`.
    ///
    /// Returns `None` for non-positive or NaN amounts.
    pub fn from_amount(amount: f64, buckets: &RevenueBuckets) -> Option<Self> {
        if amount.is_nan() || amount <= 0.0 {
            None
        } else if amount <= buckets.low_max {
            Some(RevenueCategory::Low)
        } else if amount <= buckets.medium_max {
            Some(RevenueCategory::Medium)
        } else if amount <= buckets.high_max {
            Some(RevenueCategory::High)
        } else {
            Some(RevenueCategory::Premium)
        }
    }
}

impl fmt::Display for RevenueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            RevenueCategory::Low => "Low",
            RevenueCategory::Medium => "Medium",
            RevenueCategory::High => "High",
            RevenueCategory::Premium => "Premium",
        })
    }
}

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a transaction timestamp, keeping its wall-clock time.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated form, either with
/// fractional seconds, RFC 3339 (offset dropped, local time kept) and a bare
/// date (midnight).
pub fn parse_transaction_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// A transaction plus its derived features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Parsed `transaction_date`
    #[serde(skip_serializing)]
    pub timestamp: NaiveDateTime,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub day_of_week: &'static str,
    pub is_weekend: bool,
    pub revenue_category: Option<RevenueCategory>,
}

impl EnrichedTransaction {
    pub fn total_amount(&self) -> f64 {
        self.transaction.total_amount
    }

    pub fn customer_id(&self) -> &str {
        &self.transaction.customer_id
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Derives calendar and bucket features for a single transaction.
///
/// # Errors
/// Returns [`PipelineError::InvalidTimestamp`] if `transaction_date` cannot
/// be parsed.
pub fn enrich(transaction: &Transaction, buckets: &RevenueBuckets) -> Result<EnrichedTransaction> {
    let timestamp = parse_transaction_date(&transaction.transaction_date).ok_or_else(|| {
        PipelineError::InvalidTimestamp {
            transaction_id: transaction.transaction_id.clone(),
            value: transaction.transaction_date.clone(),
        }
    })?;

    let weekday = timestamp.weekday();
    Ok(EnrichedTransaction {
        transaction: transaction.clone(),
        timestamp,
        year: timestamp.year(),
        month: timestamp.month(),
        day: timestamp.day(),
        hour: timestamp.hour(),
        day_of_week: weekday_name(weekday),
        is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        revenue_category: RevenueCategory::from_amount(transaction.total_amount, buckets),
    })
}

/// Enriches a batch, preserving order. Fails on the first unparseable timestamp.
pub fn enrich_batch(
    transactions: &[Transaction],
    buckets: &RevenueBuckets,
) -> Result<Vec<EnrichedTransaction>> {
    transactions
        .iter()
        .map(|transaction| enrich(transaction, buckets))
        .collect()
}
