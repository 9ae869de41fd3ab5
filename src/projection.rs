//! Shapes handed to the table and chart consumers

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{EnrichedTransaction, TransactionId};

/// Caption of the single bar series in [`ChartData`]
pub const CHART_SERIES_LABEL: &str = "Transaction Amount";

/// One line of the transaction table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Transaction identifier, usable as a stable key for the row
    pub id: TransactionId,
    /// Customer name
    pub name: String,
    /// Transaction date
    pub date: NaiveDate,
    /// Transaction amount
    pub amount: Decimal,
}

impl From<&EnrichedTransaction> for Row {
    fn from(transaction: &EnrichedTransaction) -> Self {
        Self {
            id: transaction.id(),
            name: transaction.name().to_owned(),
            date: transaction.date(),
            amount: transaction.amount(),
        }
    }
}

/// Bar chart input. `labels` and `values` are parallel: bar `i` is labelled `labels[i]`
/// and has height `values[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    /// Series caption
    pub label: String,
    /// Customer name per bar
    pub labels: Vec<String>,
    /// Amount per bar
    pub values: Vec<Decimal>,
}

impl Default for ChartData {
    fn default() -> Self {
        Self {
            label: CHART_SERIES_LABEL.to_owned(),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }
}

/// Both consumer-facing shapes of one pipeline run, index-aligned with each other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    /// Rows for the table
    pub rows: Vec<Row>,
    /// Labels and values for the chart
    pub chart: ChartData,
}

impl Projection {
    /// Returns the number of transactions shown
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the view shows nothing, which consumers must render as an empty table
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Projects the final ordered transactions. Every transaction becomes exactly one row and one
/// bar, even when a customer has several.
pub fn project(transactions: &[EnrichedTransaction]) -> Projection {
    let rows: Vec<Row> = transactions.iter().map(Row::from).collect();
    let chart = ChartData {
        labels: rows.iter().map(|row| row.name.clone()).collect(),
        values: rows.iter().map(|row| row.amount).collect(),
        ..ChartData::default()
    };
    Projection { rows, chart }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::types::Transaction;

    use super::*;

    fn enriched(id: u32, name: &str, amount: Decimal, date: &str) -> EnrichedTransaction {
        EnrichedTransaction::new(
            Transaction::new(id.into(), 1.into(), amount, date.parse().unwrap()),
            name,
        )
    }

    #[test]
    fn test_rows_and_chart_are_aligned() {
        let transactions = vec![
            enriched(3, "Bob", dec!(12.5), "2024-05-01"),
            enriched(1, "Alice", dec!(40), "2024-04-01"),
            enriched(2, "Bob", dec!(7), "2024-03-01"),
        ];
        let projection = project(&transactions);
        assert_eq!(projection.len(), 3);
        assert_eq!(projection.chart.labels.len(), projection.rows.len());
        assert_eq!(projection.chart.values.len(), projection.rows.len());
        for (i, row) in projection.rows.iter().enumerate() {
            assert_eq!(projection.chart.labels[i], row.name);
            assert_eq!(projection.chart.values[i], row.amount);
        }
        // No grouping by customer
        assert_eq!(projection.chart.labels, ["Bob", "Alice", "Bob"]);
        assert_eq!(projection.chart.label, CHART_SERIES_LABEL);
    }

    #[test]
    fn test_row_copies_transaction_fields() {
        let projection = project(&[enriched(9, "Alice", dec!(40), "2024-04-01")]);
        assert_eq!(
            projection.rows[0],
            Row {
                id: 9.into(),
                name: "Alice".to_owned(),
                date: "2024-04-01".parse().unwrap(),
                amount: dec!(40),
            }
        );
    }

    #[test]
    fn test_empty_projection() {
        let projection = project(&[]);
        assert!(projection.is_empty());
        assert!(projection.chart.labels.is_empty());
        assert!(projection.chart.values.is_empty());
        assert_eq!(projection.chart.label, CHART_SERIES_LABEL);
    }
}
