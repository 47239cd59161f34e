use crate::error::Result;
use crate::transaction::Transaction;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Trait for ingestion abstraction.
///
/// The pipeline consumes a finite, ordered batch of transactions and does not
/// care where it came from. Implementations can be:
/// - In-memory vectors (for testing)
/// - CSV exports
/// - The seeded synthetic generator
/// - Any other feed that can produce the transaction schema
pub trait TransactionSource {
    /// Loads the full batch, preserving source order.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or a record does not
    /// match the transaction schema.
    fn load(&self) -> Result<Vec<Transaction>>;
}

/// In-memory source for tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    transactions: Vec<Transaction>,
}

impl InMemorySource {
    pub fn new() -> Self {
        InMemorySource {
            transactions: Vec::new(),
        }
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl From<Vec<Transaction>> for InMemorySource {
    fn from(transactions: Vec<Transaction>) -> Self {
        InMemorySource { transactions }
    }
}

impl TransactionSource for InMemorySource {
    fn load(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }
}

/// Reads transactions from a CSV file with a header row.
///
/// Column names follow the transaction schema (`transaction_id`,
/// `product_id`, ..., `region`). Empty cells in optional columns become
/// `None`; empty cells in required columns are a schema error.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionSource for CsvSource {
    fn load(&self) -> Result<Vec<Transaction>> {
        log::info!("Loading transactions from {}", self.path.display());
        let file = std::fs::File::open(&self.path)?;
        let transactions = read_csv(file)?;
        log::info!("Loaded {} transactions", transactions.len());
        Ok(transactions)
    }
}

/// Deserializes every CSV row of `reader` into a [`Transaction`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for record in csv_reader.deserialize::<Transaction>() {
        transactions.push(record?);
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{PaymentMethod, Region, SalesChannel};

    const HEADER: &str = "transaction_id,product_id,product_name,category,quantity,unit_price,total_amount,transaction_date,customer_id,sales_channel,payment_method,region";

    #[test]
    fn in_memory_source_returns_batch_in_order() {
        let mut source = InMemorySource::new();
        source.push(Transaction::new("TXN2", "C1", "2024-01-01 00:00:00", 1, 5.0));
        source.push(Transaction::new("TXN1", "C1", "2024-01-01 00:00:00", 1, 5.0));

        let batch = source.load().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].transaction_id, "TXN2");
        assert_eq!(batch[1].transaction_id, "TXN1");

        source.clear();
        assert!(source.is_empty());
    }

    #[test]
    fn read_csv_parses_enums_and_blank_cells() {
        let data = format!(
            "{HEADER}\n\
             TXN1000,LAPTOP001,Gaming Laptop Pro,Electronics,2,1200.50,2401.00,2024-01-15 14:30:00,CUST7,Mobile App,Credit Card,North\n\
             TXN1001,,,,1,79.99,79.99,2024-01-16 09:05:00,CUST8,,,\n"
        );

        let batch = read_csv(data.as_bytes()).unwrap();
        assert_eq!(batch.len(), 2);

        let first = &batch[0];
        assert_eq!(first.product_name.as_deref(), Some("Gaming Laptop Pro"));
        assert_eq!(first.quantity, 2);
        assert_eq!(first.sales_channel, Some(SalesChannel::MobileApp));
        assert_eq!(first.payment_method, Some(PaymentMethod::CreditCard));
        assert_eq!(first.region, Some(Region::North));

        let second = &batch[1];
        assert_eq!(second.product_id, None);
        assert_eq!(second.category, None);
        assert_eq!(second.sales_channel, None);
        assert_eq!(second.missing_fields(), 6);
    }

    #[test]
    fn read_csv_rejects_non_numeric_quantity() {
        let data = format!(
            "{HEADER}\nTXN1,P1,Widget,Gadgets,two,10.0,20.0,2024-01-15 14:30:00,C1,Online,Cash,East\n"
        );
        let result = read_csv(data.as_bytes());
        assert!(matches!(result, Err(crate::error::PipelineError::Csv(_))));
    }

    #[test]
    fn csv_source_missing_file_is_io_error() {
        let source = CsvSource::new("/nonexistent/transactions.csv");
        assert!(matches!(source.load(), Err(crate::error::PipelineError::Io(_))));
    }
}
