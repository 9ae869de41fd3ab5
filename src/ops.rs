use std::{
    cmp::{Ordering, Reverse},
    collections::HashMap,
};

use tracing::{debug, trace};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{
    errors::Error,
    projection::{self, Projection},
    types::{Customer, CustomerId, Dataset, EnrichedTransaction, Joined, Transaction},
    view::{CustomerFilter, SortKey, ViewState},
};

/// Joins each transaction to the customer named by its `customer_id`, keeping transaction order.
///
/// Transactions whose customer cannot be found are recorded as [`Error::UnresolvedReference`]
/// in [`Joined::unresolved`] and left out of the result. The join runs on every recompute, so it
/// only logs them at `debug`; [`TransactionView`](crate::view::TransactionView) warns once.
pub fn join(customers: &[Customer], transactions: &[Transaction]) -> Joined {
    let names: HashMap<CustomerId, &str> = customers
        .iter()
        .map(|customer| (customer.id, customer.name.as_str()))
        .collect();
    let mut joined = Joined {
        transactions: Vec::with_capacity(transactions.len()),
        unresolved: Vec::new(),
    };
    for transaction in transactions {
        match names.get(&transaction.customer_id) {
            Some(name) => joined
                .transactions
                .push(EnrichedTransaction::new(transaction.clone(), *name)),
            None => {
                let error = Error::UnresolvedReference {
                    transaction: transaction.id,
                    customer: transaction.customer_id,
                };
                debug!("Skipping transaction: {error}");
                joined.unresolved.push(error);
            }
        }
    }
    trace!(
        "Joined {} of {} transactions",
        joined.transactions.len(),
        transactions.len()
    );
    joined
}

/// Keeps only the transactions matching `customer`. Names compare exactly, case-sensitive.
///
/// [`CustomerFilter::All`] returns the input unchanged.
pub fn filter(
    mut transactions: Vec<EnrichedTransaction>,
    customer: &CustomerFilter,
) -> Vec<EnrichedTransaction> {
    if let CustomerFilter::Named(name) = customer {
        transactions.retain(|transaction| transaction.name == *name);
    }
    transactions
}

/// Orders transactions by `key`. The sort is stable, so ties keep their incoming order, and
/// [`SortKey::MostRelevant`] leaves the order untouched.
pub fn sort(mut transactions: Vec<EnrichedTransaction>, key: SortKey) -> Vec<EnrichedTransaction> {
    match key {
        SortKey::MostRelevant => {}
        SortKey::LowestAmount => transactions.sort_by(|a, b| a.amount().cmp(&b.amount())),
        SortKey::HighestAmount => transactions.sort_by(|a, b| b.amount().cmp(&a.amount())),
        SortKey::NameAscending => transactions.sort_by_cached_key(|t| collation_key(&t.name)),
        SortKey::NameDescending => {
            transactions.sort_by_cached_key(|t| Reverse(collation_key(&t.name)))
        }
        SortKey::Oldest => transactions.sort_by(|a, b| a.date().cmp(&b.date())),
        SortKey::MostRecent => transactions.sort_by(|a, b| b.date().cmp(&a.date())),
    }
    transactions
}

/// Sort key for names, compared level by level: base letters ignoring accents and case, then
/// accents, then case with lowercase first. `"alice" < "Alice" < "Émile" < "Eve"`.
type CollationKey = (String, String, Vec<bool>);

fn collation_key(name: &str) -> CollationKey {
    let decomposed: String = name.nfd().collect();
    let base: String = decomposed
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let uppercase = base.chars().map(char::is_uppercase).collect();
    (base.to_lowercase(), decomposed.to_lowercase(), uppercase)
}

/// Compares two names the way the name orderings do
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Runs the whole pipeline for one [`ViewState`]: join, filter, sort, project.
///
/// Returns the projection along with any references the join could not resolve.
pub fn compute(dataset: &Dataset, state: &ViewState) -> (Projection, Vec<Error>) {
    let Joined {
        transactions,
        unresolved,
    } = dataset.join();
    let transactions = filter(transactions, &state.customer);
    trace!("{} transactions after filtering", transactions.len());
    let transactions = sort(transactions, state.sort);
    (projection::project(&transactions), unresolved)
}
