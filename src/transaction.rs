use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when checking `total_amount == unit_price * quantity`.
pub const AMOUNT_EPSILON: f64 = 0.01;

/// Rounds a monetary value to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Channel through which a sale was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SalesChannel {
    #[serde(rename = "In-Store")]
    InStore,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "Online")]
    Online,
}

impl SalesChannel {
    pub const ALL: [SalesChannel; 3] = [
        SalesChannel::Online,
        SalesChannel::MobileApp,
        SalesChannel::InStore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SalesChannel::Online => "Online",
            SalesChannel::MobileApp => "Mobile App",
            SalesChannel::InStore => "In-Store",
        }
    }
}

impl fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::PayPal,
        PaymentMethod::BankTransfer,
        PaymentMethod::Cash,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Central,
    East,
    North,
    South,
    West,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::Central,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Central => "Central",
            Region::East => "East",
            Region::North => "North",
            Region::South => "South",
            Region::West => "West",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single sales transaction as delivered by a [`TransactionSource`](crate::source::TransactionSource).
///
/// Descriptive columns are optional so that incomplete feeds can still be
/// ingested and reported on by the validator. Keys, numbers and the
/// timestamp are structurally required. The timestamp stays textual until
/// enrichment parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_amount: f64,
    pub transaction_date: String,
    pub customer_id: String,
    pub sales_channel: Option<SalesChannel>,
    pub payment_method: Option<PaymentMethod>,
    pub region: Option<Region>,
}

impl Transaction {
    /// Creates a transaction with `total_amount = round(unit_price * quantity, 2)`
    /// and no descriptive columns set.
    pub fn new(
        transaction_id: impl Into<String>,
        customer_id: impl Into<String>,
        transaction_date: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> Self {
        Transaction {
            transaction_id: transaction_id.into(),
            product_id: None,
            product_name: None,
            category: None,
            quantity,
            unit_price,
            total_amount: round_cents(unit_price * f64::from(quantity)),
            transaction_date: transaction_date.into(),
            customer_id: customer_id.into(),
            sales_channel: None,
            payment_method: None,
            region: None,
        }
    }

    pub fn with_product(
        mut self,
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.product_id = Some(product_id.into());
        self.product_name = Some(product_name.into());
        self.category = Some(category.into());
        self
    }

    pub fn with_channel(mut self, channel: SalesChannel) -> Self {
        self.sales_channel = Some(channel);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Overrides the total, e.g. to model feeds that report it independently.
    pub fn with_total_amount(mut self, total_amount: f64) -> Self {
        self.total_amount = total_amount;
        self
    }

    /// Number of missing cells in this record.
    ///
    /// Blank keys and NaN numbers count as missing, mirroring how tabular
    /// tooling treats them.
    pub fn missing_fields(&self) -> usize {
        let optional = [
            self.product_id.is_none(),
            self.product_name.is_none(),
            self.category.is_none(),
            self.sales_channel.is_none(),
            self.payment_method.is_none(),
            self.region.is_none(),
        ];
        let required = [
            self.transaction_id.trim().is_empty(),
            self.customer_id.trim().is_empty(),
            self.transaction_date.trim().is_empty(),
            self.unit_price.is_nan(),
            self.total_amount.is_nan(),
        ];
        optional.iter().chain(required.iter()).filter(|&&m| m).count()
    }

    /// Whether `total_amount` matches `round(unit_price * quantity, 2)`.
    pub fn amount_is_consistent(&self) -> bool {
        let expected = round_cents(self.unit_price * f64::from(self.quantity));
        (self.total_amount - expected).abs() <= AMOUNT_EPSILON
    }
}
