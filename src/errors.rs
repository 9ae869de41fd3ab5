use crate::types::{CustomerId, TransactionId};

/// Error type that can be returned by fallible operations in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reading or writing CSV files; could wrap IO or parsing errors
    #[error("Error processing CSV: {0}")]
    Load(#[from] csv::Error),
    /// Error opening an input file or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error serializing chart data
    #[error("Error serializing JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A [`Transaction`](crate::types::Transaction) refers to a customer that does not exist.
    /// The join reports this and leaves the transaction out, it never aborts.
    #[error("Transaction {transaction} refers to unknown customer {customer}")]
    UnresolvedReference {
        /// The transaction that could not be joined
        transaction: TransactionId,
        /// The customer id it refers to
        customer: CustomerId,
    },
    /// Two customers share an id, so lookups would be ambiguous
    #[error("Customer {0} appears more than once")]
    DuplicateCustomer(CustomerId),
    /// Two transactions share an id
    #[error("Transaction {0} appears more than once")]
    DuplicateTransaction(TransactionId),
}
