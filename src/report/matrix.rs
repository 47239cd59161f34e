use crate::enrich::EnrichedTransaction;
use crate::transaction::{round_cents, SalesChannel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub category: String,
    /// Revenue per channel, aligned with [`CategoryChannelMatrix::channels`]
    pub revenue: Vec<f64>,
}

/// Category x sales-channel revenue pivot.
///
/// Rows are categories (sorted), columns are the channels that occur in the
/// batch (sorted). Cells are rounded to cents; combinations without sales
/// hold `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryChannelMatrix {
    pub channels: Vec<SalesChannel>,
    pub rows: Vec<MatrixRow>,
}

impl CategoryChannelMatrix {
    pub fn build(transactions: &[EnrichedTransaction]) -> Self {
        let mut cells: BTreeMap<String, BTreeMap<SalesChannel, f64>> = BTreeMap::new();
        let mut channels: BTreeSet<SalesChannel> = BTreeSet::new();

        for txn in transactions {
            let (Some(category), Some(channel)) =
                (&txn.transaction.category, txn.transaction.sales_channel)
            else {
                continue;
            };
            channels.insert(channel);
            *cells
                .entry(category.clone())
                .or_default()
                .entry(channel)
                .or_default() += txn.total_amount();
        }

        let channels: Vec<SalesChannel> = channels.into_iter().collect();
        let rows = cells
            .into_iter()
            .map(|(category, by_channel)| MatrixRow {
                revenue: channels
                    .iter()
                    .map(|channel| by_channel.get(channel).map_or(0.0, |&v| round_cents(v)))
                    .collect(),
                category,
            })
            .collect();

        CategoryChannelMatrix { channels, rows }
    }

    /// Cell lookup. `None` if the category or channel is not part of the pivot.
    pub fn get(&self, category: &str, channel: SalesChannel) -> Option<f64> {
        let column = self.channels.iter().position(|&c| c == channel)?;
        self.rows
            .iter()
            .find(|row| row.category == category)
            .map(|row| row.revenue[column])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
