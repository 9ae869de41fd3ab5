//! Helpers for loading the dataset from CSV and writing view output

use std::io::{Read, Write};

use csv::Trim;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    errors::Error,
    projection::{ChartData, Row},
    types::{Customer, Dataset, Transaction},
};

/// Reads every record of a CSV stream, trimming whitespace around fields.
fn read_records<R, T>(reader: R) -> Result<Vec<T>, Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for record in csv_reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// Loads customers from a CSV-formatted stream.
///
/// Expects input data in this format (including header):
/// ```csv
/// id, name
/// 1,  Alice
/// 2,  Bob
/// ```
pub fn load_customers_from_csv<R: Read>(reader: R) -> Result<Vec<Customer>, Error> {
    read_records(reader)
}

/// Loads transactions from a CSV-formatted stream.
///
/// Amounts are kept exactly as written and dates must be `YYYY-MM-DD`.
/// Expects input data in this format (including header):
/// ```csv
/// id, customer_id, amount, date
/// 10, 1,           50,     2024-01-01
/// 11, 1,           20.5,   2024-02-01
/// ```
pub fn load_transactions_from_csv<R: Read>(reader: R) -> Result<Vec<Transaction>, Error> {
    read_records(reader)
}

/// Loads customers and transactions and validates them into a [`Dataset`].
pub fn load_dataset<C, T>(customers: C, transactions: T) -> Result<Dataset, Error>
where
    C: Read,
    T: Read,
{
    let customers = load_customers_from_csv(customers)?;
    let transactions = load_transactions_from_csv(transactions)?;
    info!(
        "Loaded {} customers and {} transactions",
        customers.len(),
        transactions.len()
    );
    Dataset::new(customers, transactions)
}

/// Column names of the table, matching the fields of [`Row`]
const ROW_HEADERS: [&str; 4] = ["id", "name", "date", "amount"];

/// Outputs table rows to CSV, in order. The header is always written, so an empty view
/// still yields a table with no rows.
///
/// Output data will be in the form:
/// ```csv
/// id,name,date,amount
/// 11,Alice,2024-02-01,20
/// 10,Alice,2024-01-01,50
/// ```
pub fn write_rows_to_csv<W: Write>(writer: W, rows: &[Row]) -> Result<(), Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(ROW_HEADERS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Outputs chart data as a single JSON object with amounts as strings.
///
/// ```json
/// {"label":"Transaction Amount","labels":["Alice","Alice"],"values":["20","50"]}
/// ```
pub fn write_chart_to_json<W: Write>(mut writer: W, chart: &ChartData) -> Result<(), Error> {
    serde_json::to_writer(&mut writer, chart)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::{
        ops,
        types::{CustomerId, TransactionId},
        view::{CustomerFilter, SortKey, ViewState},
    };

    use super::*;

    const CUSTOMERS_CSV: &[u8] = b"id,   name
1,    Alice
2,    Bob Smith
";

    const TRANSACTIONS_CSV: &[u8] = b"id,  customer_id,  amount,  date
10,  1,            50,      2024-01-01
11,  1,            20.1249,  2024-02-01
12,  2,            7.5,     2023-11-30
";

    #[test]
    fn test_read_with_whitespace() {
        let customers = load_customers_from_csv(Cursor::new(CUSTOMERS_CSV)).unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[1].id(), CustomerId::from(2));
        assert_eq!(customers[1].name(), "Bob Smith");

        let transactions = load_transactions_from_csv(Cursor::new(TRANSACTIONS_CSV)).unwrap();
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[1].id(), TransactionId::from(11));
        assert_eq!(transactions[1].customer_id(), CustomerId::from(1));
        assert_eq!(transactions[1].amount(), dec!(20.1249));
        assert_eq!(transactions[1].amount().to_string(), "20.1249");
        assert_eq!(
            transactions[2].date(),
            "2023-11-30".parse::<NaiveDate>().unwrap()
        );
    }

    #[test]
    fn test_bad_date_is_a_load_error() {
        let input: &[u8] = b"id,customer_id,amount,date\n1,1,5,01/02/2024\n";
        match load_transactions_from_csv(Cursor::new(input)) {
            Err(Error::Load(_)) => {}
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_amount_is_a_load_error() {
        let input: &[u8] = b"id,customer_id,amount,date\n1,1,five,2024-01-02\n";
        assert!(matches!(
            load_transactions_from_csv(Cursor::new(input)),
            Err(Error::Load(_))
        ));
    }

    #[test]
    fn test_load_dataset_rejects_duplicates() {
        let customers: &[u8] = b"id,name\n1,Alice\n1,Bob\n";
        let result = load_dataset(Cursor::new(customers), Cursor::new(TRANSACTIONS_CSV));
        assert!(matches!(result, Err(Error::DuplicateCustomer(_))));
    }

    #[test]
    fn test_write_rows() {
        let dataset =
            load_dataset(Cursor::new(CUSTOMERS_CSV), Cursor::new(TRANSACTIONS_CSV)).unwrap();
        let state = ViewState {
            customer: CustomerFilter::Named("Alice".to_owned()),
            sort: SortKey::LowestAmount,
        };
        let (projection, _) = ops::compute(&dataset, &state);
        let mut output = vec![];
        write_rows_to_csv(&mut output, &projection.rows).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,name,date,amount\n11,Alice,2024-02-01,20.1249\n10,Alice,2024-01-01,50\n"
        );
    }

    #[test]
    fn test_write_chart() {
        let dataset =
            load_dataset(Cursor::new(CUSTOMERS_CSV), Cursor::new(TRANSACTIONS_CSV)).unwrap();
        let (projection, _) = ops::compute(&dataset, &ViewState::default());
        let mut output = vec![];
        write_chart_to_json(&mut output, &projection.chart).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["label"], "Transaction Amount");
        assert_eq!(
            value["labels"],
            serde_json::json!(["Alice", "Alice", "Bob Smith"])
        );
        assert_eq!(
            value["values"],
            serde_json::json!(["50", "20.1249", "7.5"])
        );
    }

    #[test]
    fn test_write_empty_rows_keeps_header() {
        let mut output = vec![];
        write_rows_to_csv(&mut output, &[]).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "id,name,date,amount\n");
    }

    #[test]
    fn test_close_amounts_keep_their_order() {
        let transactions: &[u8] = b"id, customer_id, amount, date
10, 1,           1.004,  2024-01-01
11, 1,           1.001,  2024-01-02
12, 2,           0.005,  2024-01-03
";
        let dataset = load_dataset(Cursor::new(CUSTOMERS_CSV), Cursor::new(transactions)).unwrap();
        let state = ViewState {
            customer: CustomerFilter::All,
            sort: SortKey::LowestAmount,
        };
        let (projection, _) = ops::compute(&dataset, &state);
        let rows: Vec<_> = projection
            .rows
            .iter()
            .map(|row| (row.id, row.amount.to_string()))
            .collect();
        assert_eq!(
            rows,
            [
                (TransactionId::from(12), "0.005".to_owned()),
                (TransactionId::from(11), "1.001".to_owned()),
                (TransactionId::from(10), "1.004".to_owned()),
            ]
        );
    }
}
