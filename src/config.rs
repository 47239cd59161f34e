//! Tunable parameters for every pipeline stage.
//!
//! All thresholds carry the literal defaults of the reference reports. A
//! partial JSON document can override any subset of them; missing keys keep
//! their defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Score every quality report starts from before penalties are applied.
pub const MAX_HEALTH_SCORE: u32 = 100;

/// Upper edges (inclusive) of the Low/Medium/High revenue buckets.
///
/// Anything above `high_max` is Premium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueBuckets {
    pub low_max: f64,
    pub medium_max: f64,
    pub high_max: f64,
}

impl Default for RevenueBuckets {
    fn default() -> Self {
        RevenueBuckets {
            low_max: 100.0,
            medium_max: 500.0,
            high_max: 1000.0,
        }
    }
}

/// Thresholds for customer segmentation. All comparisons are strict (`>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentRules {
    /// VIP requires spend above this...
    pub vip_spend: f64,
    /// ...and more orders than this.
    pub vip_orders: u64,
    /// Regular requires spend above this, or...
    pub regular_spend: f64,
    /// ...more orders than this.
    pub regular_orders: u64,
}

impl Default for SegmentRules {
    fn default() -> Self {
        SegmentRules {
            vip_spend: 2000.0,
            vip_orders: 10,
            regular_spend: 1000.0,
            regular_orders: 5,
        }
    }
}

/// Health-score deductions, one per triggered issue category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPenalties {
    pub missing_values: u32,
    pub duplicate_ids: u32,
    pub invalid_prices: u32,
}

impl Default for QualityPenalties {
    fn default() -> Self {
        QualityPenalties {
            missing_values: 10,
            duplicate_ids: 15,
            invalid_prices: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of products kept in the top-products table
    pub top_products_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            top_products_limit: 5,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub revenue_buckets: RevenueBuckets,
    pub segment_rules: SegmentRules,
    pub quality_penalties: QualityPenalties,
    pub report: ReportConfig,
}

impl PipelineConfig {
    /// Parses a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
