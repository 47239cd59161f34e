//! Sales Analytics Pipeline Binary
//!
//! Run with: `cargo run --bin sales-pipeline -- --count 1000`
//!
//! Reads a CSV batch with `--input`, otherwise generates a seeded synthetic
//! batch. Set RUST_LOG to control log level (default `info`).

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sales_analytics::{
    CsvSource, GeneratorConfig, Pipeline, PipelineConfig, PipelineOutput, SyntheticSource,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Full pipeline output as JSON
    Json,
}

/// Batch sales analytics: validate, enrich, segment and report
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file of transactions; a synthetic batch is generated when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON pipeline configuration (thresholds, penalties, report limits)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the synthetic batch
    #[arg(long, env = "SALES_ANALYTICS_SEED", default_value = "42")]
    seed: u64,

    /// Number of synthetic transactions
    #[arg(long, default_value = "1000")]
    count: usize,

    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config);

    let output = match &args.input {
        Some(path) => pipeline
            .run(&CsvSource::new(path))
            .with_context(|| format!("pipeline failed on {}", path.display()))?,
        None => {
            let generator = GeneratorConfig {
                seed: args.seed,
                transactions: args.count,
                ..GeneratorConfig::default()
            };
            pipeline
                .run(&SyntheticSource::new(generator))
                .context("pipeline failed on synthetic batch")?
        }
    };

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output).context("failed to encode output")?;
            println!("{json}");
        }
        OutputFormat::Text => print_summary(&output),
    }

    Ok(())
}

fn print_summary(output: &PipelineOutput) {
    let kpis = &output.report.kpis;

    println!("Data quality score: {}/100", output.quality.health_score);
    for issue in &output.quality.issues {
        println!("  - {}", issue.description);
    }
    println!();

    println!("Key metrics:");
    println!("  Total revenue:      ${:.2}", kpis.total_revenue);
    println!("  Transactions:       {}", kpis.total_transactions);
    println!("  Avg order value:    ${:.2}", kpis.avg_order_value);
    println!("  Unique customers:   {}", kpis.unique_customers);
    println!("  Retention rate:     {:.1}%", kpis.retention_rate * 100.0);
    println!();

    println!("Customer segments:");
    for count in &output.report.segment_counts {
        println!("  {:<8} {}", count.segment, count.customers);
    }
    println!();

    println!("Insights:");
    if let Some(top) = output.report.top_category() {
        println!("  Top category: {} (${:.2})", top.category, top.revenue);
    }
    if let Some(best) = output.report.best_channel() {
        println!("  Best channel: {} (${:.2})", best.channel, best.revenue);
    }
    if let Some(peak) = output.report.peak_hour {
        println!("  Peak hour:    {:02}:00 (${:.2})", peak.hour, peak.revenue);
    }
    let split = &output.report.weekend_split;
    println!(
        "  Weekday vs weekend revenue: ${:.2} / ${:.2}",
        split.weekday.revenue, split.weekend.revenue
    );
    println!();

    println!("Export datasets:");
    for (name, shape) in &output.export {
        let kind = if shape.is_series() { "series" } else { "table" };
        println!("  {:<24} {:>6} records ({kind})", name, shape.records());
    }
}
