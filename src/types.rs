//! Common datatypes supporting the transaction view pipeline

use std::{collections::HashSet, fmt::Display};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::Error, ops};

/// Unique identifier for a customer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomerId(u32);

impl From<u32> for CustomerId {
    fn from(customer_id: u32) -> Self {
        Self(customer_id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "id[{}]", self.0)
    }
}

/// Unique identifier for a transaction
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(u32);

impl From<u32> for TransactionId {
    fn from(transaction_id: u32) -> Self {
        Self(transaction_id)
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "id[{}]", self.0)
    }
}

/// A customer that transactions can refer to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    /// Unique identifier for this customer
    pub(crate) id: CustomerId,
    /// Display name, shown in the table and used as the chart label
    pub(crate) name: String,
}

impl Customer {
    /// Creates a new customer
    #[must_use]
    pub fn new(id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the unique identifier for the customer
    #[must_use]
    #[inline]
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// Returns the customer's display name
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A single payment made by a customer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub(crate) id: TransactionId,
    /// The [`Customer`] this transaction belongs to
    pub(crate) customer_id: CustomerId,
    /// The amount of money in this transaction
    #[serde(deserialize_with = "rust_decimal::serde::str::deserialize")]
    pub(crate) amount: Decimal,
    /// The calendar date of this transaction, `YYYY-MM-DD` on the wire
    pub(crate) date: NaiveDate,
}

impl Transaction {
    /// Creates a new transaction. The amount is kept exactly as given.
    #[must_use]
    pub fn new(
        id: TransactionId,
        customer_id: CustomerId,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            customer_id,
            amount,
            date,
        }
    }

    /// Returns the unique identifier for the transaction
    #[must_use]
    #[inline]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the identifier of the customer this transaction belongs to
    #[must_use]
    #[inline]
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the transaction amount
    #[must_use]
    #[inline]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the transaction date
    #[must_use]
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// A [`Transaction`] together with the name of the [`Customer`] it refers to.
///
/// Only [`ops::join`] produces these, so the name always belongs to an existing customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTransaction {
    pub(crate) transaction: Transaction,
    pub(crate) name: String,
}

impl EnrichedTransaction {
    pub(crate) fn new(transaction: Transaction, name: impl Into<String>) -> Self {
        Self {
            transaction,
            name: name.into(),
        }
    }

    /// Returns the underlying transaction
    #[must_use]
    #[inline]
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Returns the joined customer name
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the transaction identifier
    #[must_use]
    #[inline]
    pub fn id(&self) -> TransactionId {
        self.transaction.id
    }

    /// Returns the transaction amount
    #[must_use]
    #[inline]
    pub fn amount(&self) -> Decimal {
        self.transaction.amount
    }

    /// Returns the transaction date
    #[must_use]
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }
}

/// Result of joining transactions to customers.
#[derive(Debug, Default)]
pub struct Joined {
    /// Transactions whose customer was found, in load order
    pub transactions: Vec<EnrichedTransaction>,
    /// One [`Error::UnresolvedReference`] per transaction that was left out
    pub unresolved: Vec<Error>,
}

/// The static set of customers and transactions that every view is derived from.
///
/// # Limitations
/// No persistence. The dataset is never mutated after construction.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    pub(crate) customers: Vec<Customer>,
    pub(crate) transactions: Vec<Transaction>,
}

impl Dataset {
    /// Creates a dataset, checking that customer and transaction ids are unique.
    /// # Errors
    /// [`Error::DuplicateCustomer`] or [`Error::DuplicateTransaction`] for the first repeated id
    pub fn new(customers: Vec<Customer>, transactions: Vec<Transaction>) -> Result<Self, Error> {
        let mut customer_ids = HashSet::with_capacity(customers.len());
        for customer in &customers {
            if !customer_ids.insert(customer.id) {
                return Err(Error::DuplicateCustomer(customer.id));
            }
        }
        let mut transaction_ids = HashSet::with_capacity(transactions.len());
        for transaction in &transactions {
            if !transaction_ids.insert(transaction.id) {
                return Err(Error::DuplicateTransaction(transaction.id));
            }
        }
        Ok(Self {
            customers,
            transactions,
        })
    }

    /// Returns all customers in load order
    #[must_use]
    #[inline]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Returns all transactions in load order
    #[must_use]
    #[inline]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Joins every transaction to its customer. See [`ops::join`].
    #[must_use]
    pub fn join(&self) -> Joined {
        ops::join(&self.customers, &self.transactions)
    }
}
