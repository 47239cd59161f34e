//! Observational data-quality checks.
//!
//! Validation never mutates or filters the batch; it only scores it. Every
//! check is independent and deducts its penalty at most once.

use crate::config::{QualityPenalties, MAX_HEALTH_SCORE};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Category of a detected data-quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityIssueKind {
    MissingValues,
    DuplicateIds,
    InvalidPrices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub kind: QualityIssueKind,
    /// Number of offending cells or records
    pub count: usize,
    pub description: String,
}

impl QualityIssue {
    fn new(kind: QualityIssueKind, count: usize) -> Self {
        let label = match kind {
            QualityIssueKind::MissingValues => "Missing values",
            QualityIssueKind::DuplicateIds => "Duplicate IDs",
            QualityIssueKind::InvalidPrices => "Invalid prices",
        };
        QualityIssue {
            kind,
            count,
            description: format!("{label}: {count}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_records: usize,
    pub issues: Vec<QualityIssue>,
    /// 0..=100; starts at 100 and never drops below zero
    pub health_score: u32,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue(&self, kind: QualityIssueKind) -> Option<&QualityIssue> {
        self.issues.iter().find(|issue| issue.kind == kind)
    }
}

/// Number of transaction ids that repeat an earlier id in the batch.
fn count_duplicate_ids(transactions: &[Transaction]) -> usize {
    let mut seen = HashSet::with_capacity(transactions.len());
    transactions
        .iter()
        .filter(|txn| !seen.insert(txn.transaction_id.as_str()))
        .count()
}

/// Scores the batch for completeness, id uniqueness and price validity.
pub fn validate(transactions: &[Transaction], penalties: &QualityPenalties) -> QualityReport {
    let mut issues = Vec::new();
    let mut score = MAX_HEALTH_SCORE;

    let missing: usize = transactions.iter().map(Transaction::missing_fields).sum();
    if missing > 0 {
        issues.push(QualityIssue::new(QualityIssueKind::MissingValues, missing));
        score = score.saturating_sub(penalties.missing_values);
    }

    let duplicates = count_duplicate_ids(transactions);
    if duplicates > 0 {
        issues.push(QualityIssue::new(QualityIssueKind::DuplicateIds, duplicates));
        score = score.saturating_sub(penalties.duplicate_ids);
    }

    let invalid_prices = transactions
        .iter()
        .filter(|txn| txn.unit_price <= 0.0)
        .count();
    if invalid_prices > 0 {
        issues.push(QualityIssue::new(QualityIssueKind::InvalidPrices, invalid_prices));
        score = score.saturating_sub(penalties.invalid_prices);
    }

    QualityReport {
        total_records: transactions.len(),
        issues,
        health_score: score,
    }
}
