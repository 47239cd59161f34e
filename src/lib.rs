pub mod config;
pub mod customer;
pub mod enrich;
pub mod error;
pub mod export;
pub mod generator;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod source;
pub mod transaction;


pub use config::{
    PipelineConfig, QualityPenalties, ReportConfig, RevenueBuckets, SegmentRules, MAX_HEALTH_SCORE,
};
pub use customer::{
    aggregate_customers, segment_counts, CustomerAggregate, CustomerSegments, Segment,
};
pub use enrich::{
    enrich, enrich_batch, parse_transaction_date, EnrichedTransaction, RevenueCategory,
};
pub use error::{PipelineError, Result};
pub use export::{summarize, ExportSummary, TableRow, TableShape};
pub use generator::{generate, GeneratorConfig, SyntheticSource};
pub use pipeline::{Pipeline, PipelineOutput};
pub use quality::{validate, QualityIssue, QualityIssueKind, QualityReport};
pub use report::{build_report, Kpis, SalesReport};
pub use source::{read_csv, CsvSource, InMemorySource, TransactionSource};
pub use transaction::{PaymentMethod, Region, SalesChannel, Transaction};
