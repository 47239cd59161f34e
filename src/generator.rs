//! Seeded synthetic transaction feed.
//!
//! Produces a realistic batch from a fixed product catalog. The same
//! [`GeneratorConfig`] always yields the same batch, which makes the synthetic
//! feed usable as a deterministic fixture.

use crate::error::Result;
use crate::source::TransactionSource;
use crate::transaction::{round_cents, PaymentMethod, Region, SalesChannel, Transaction};
use chrono::{Duration, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A catalog entry with its list price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogProduct {
    pub product_id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub list_price: f64,
}

pub const CATALOG: [CatalogProduct; 8] = [
    CatalogProduct {
        product_id: "LAPTOP001",
        name: "Gaming Laptop Pro",
        category: "Electronics",
        list_price: 1299.99,
    },
    CatalogProduct {
        product_id: "PHONE002",
        name: "Smartphone X1",
        category: "Electronics",
        list_price: 899.99,
    },
    CatalogProduct {
        product_id: "HEADSET003",
        name: "Wireless Headphones",
        category: "Audio",
        list_price: 199.99,
    },
    CatalogProduct {
        product_id: "TABLET004",
        name: "Tablet Air",
        category: "Electronics",
        list_price: 549.99,
    },
    CatalogProduct {
        product_id: "WATCH005",
        name: "Smart Watch",
        category: "Wearables",
        list_price: 299.99,
    },
    CatalogProduct {
        product_id: "KEYBOARD006",
        name: "Mechanical Keyboard",
        category: "Accessories",
        list_price: 149.99,
    },
    CatalogProduct {
        product_id: "MOUSE007",
        name: "Gaming Mouse",
        category: "Accessories",
        list_price: 79.99,
    },
    CatalogProduct {
        product_id: "MONITOR008",
        name: "4K Monitor",
        category: "Electronics",
        list_price: 399.99,
    },
];

const FIRST_TRANSACTION_NUMBER: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub transactions: usize,
    /// Customer ids are drawn from `CUST1..=CUST{customers}`
    pub customers: u32,
    pub start_date: NaiveDate,
    /// Transactions fall within `start_date + 0..=window_days` days
    pub window_days: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: 42,
            transactions: 1000,
            customers: 200,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            window_days: 30,
        }
    }
}

fn pick<T: Copy>(rng: &mut StdRng, values: &[T]) -> T {
    values[rng.gen_range(0..values.len())]
}

/// Generates a batch of transactions from the given configuration.
///
/// Prices are jittered between 80% and 110% of list price and rounded to
/// cents; totals are `round(unit_price * quantity, 2)`.
pub fn generate(config: &GeneratorConfig) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let start = config.start_date.and_time(NaiveTime::MIN);
    let customers = config.customers.max(1);
    let window_days = config.window_days.max(0);

    (0..config.transactions)
        .map(|i| {
            let timestamp = start
                + Duration::days(rng.gen_range(0..=window_days))
                + Duration::hours(rng.gen_range(0..=23))
                + Duration::minutes(rng.gen_range(0..=59));

            let product = pick(&mut rng, &CATALOG);
            let quantity: u32 = rng.gen_range(1..=5);
            let unit_price = round_cents(product.list_price * rng.gen_range(0.8..1.1));
            let customer = rng.gen_range(1..=customers);

            Transaction::new(
                format!("TXN{}", FIRST_TRANSACTION_NUMBER + i),
                format!("CUST{customer}"),
                timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                quantity,
                unit_price,
            )
            .with_product(product.product_id, product.name, product.category)
            .with_channel(pick(&mut rng, &SalesChannel::ALL))
            .with_payment_method(pick(&mut rng, &PaymentMethod::ALL))
            .with_region(pick(&mut rng, &Region::ALL))
        })
        .collect()
}

/// [`TransactionSource`] backed by [`generate`].
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    config: GeneratorConfig,
}

impl SyntheticSource {
    pub fn new(config: GeneratorConfig) -> Self {
        SyntheticSource { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl TransactionSource for SyntheticSource {
    fn load(&self) -> Result<Vec<Transaction>> {
        log::info!(
            "Generating {} synthetic transactions (seed {})",
            self.config.transactions,
            self.config.seed
        );
        Ok(generate(&self.config))
    }
}
