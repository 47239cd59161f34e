//! Composition of the five stages into a single batch run.
//!
//! validate -> enrich -> aggregate customers -> build report -> summarize export

use crate::config::PipelineConfig;
use crate::customer::{aggregate_customers, CustomerSegments};
use crate::enrich::{enrich_batch, EnrichedTransaction};
use crate::error::Result;
use crate::export::{summarize, ExportSummary};
use crate::quality::{validate, QualityReport};
use crate::report::{build_report, SalesReport};
use crate::source::TransactionSource;
use crate::transaction::Transaction;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Everything a sink receives from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub quality: QualityReport,
    pub transactions: Vec<EnrichedTransaction>,
    pub customers: CustomerSegments,
    pub report: SalesReport,
    pub export: ExportSummary,
}

/// Batch pipeline bound to a configuration.
///
/// Holds no state between runs; running twice over the same batch yields
/// identical output.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads a batch from `source` and processes it.
    ///
    /// # Errors
    /// Returns an error if the source fails or a timestamp is unparseable.
    pub fn run<S: TransactionSource + ?Sized>(&self, source: &S) -> Result<PipelineOutput> {
        let batch = source.load()?;
        self.process(&batch)
    }

    /// Processes an already materialised batch.
    pub fn process(&self, batch: &[Transaction]) -> Result<PipelineOutput> {
        info!(records = batch.len(), "starting pipeline run");

        let quality = validate(batch, &self.config.quality_penalties);
        if quality.is_clean() {
            info!(score = quality.health_score, "data quality check passed");
        } else {
            for issue in &quality.issues {
                warn!(kind = ?issue.kind, count = issue.count, "{}", issue.description);
            }
            warn!(score = quality.health_score, "data quality issues found");
        }

        let transactions = enrich_batch(batch, &self.config.revenue_buckets)?;
        debug!(records = transactions.len(), "enriched transactions");

        let customers = aggregate_customers(&transactions, &self.config.segment_rules);
        info!(customers = customers.len(), "aggregated customers");

        let report = build_report(&transactions, &customers, &self.config.report);
        info!(
            total_revenue = report.kpis.total_revenue,
            peak_hour = ?report.peak_hour.map(|peak| peak.hour),
            "report built"
        );

        let export = summarize(&transactions, &customers, &report);
        debug!(datasets = export.len(), "export summary prepared");

        Ok(PipelineOutput {
            quality,
            transactions,
            customers,
            report,
            export,
        })
    }
}
