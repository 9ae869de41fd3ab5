//! View state, selector values and the recomputing [`TransactionView`]

use tracing::{debug, warn};

use crate::{
    errors::Error,
    ops,
    projection::Projection,
    types::{Customer, Dataset},
};

/// Customer selector value meaning "no filter"
pub const ALL_CUSTOMERS: &str = "All customers";
/// Sort selector value meaning "no sort"
pub const MOST_RELEVANT: &str = "Most Relevant";

/// Which customer's transactions to show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CustomerFilter {
    /// Show every customer
    #[default]
    All,
    /// Show only transactions whose customer name equals this exactly
    Named(String),
}

impl CustomerFilter {
    /// Interprets a customer selector value. The sentinel [`ALL_CUSTOMERS`] and the empty
    /// string both mean no filter.
    #[must_use]
    pub fn from_selection(value: &str) -> Self {
        match value {
            "" | ALL_CUSTOMERS => Self::All,
            name => Self::Named(name.to_owned()),
        }
    }
}

/// The fixed set of orderings the sort selector offers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Keep load order
    #[default]
    MostRelevant,
    /// Amount, ascending
    LowestAmount,
    /// Amount, descending
    HighestAmount,
    /// Customer name, ascending
    NameAscending,
    /// Customer name, descending
    NameDescending,
    /// Date, ascending
    Oldest,
    /// Date, descending
    MostRecent,
}

impl SortKey {
    /// Every key, in selector order
    pub const ALL: [SortKey; 7] = [
        SortKey::MostRelevant,
        SortKey::LowestAmount,
        SortKey::HighestAmount,
        SortKey::NameAscending,
        SortKey::NameDescending,
        SortKey::Oldest,
        SortKey::MostRecent,
    ];

    /// Returns the selector label for this key
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::MostRelevant => MOST_RELEVANT,
            SortKey::LowestAmount => "Lowest amount",
            SortKey::HighestAmount => "Highest amount",
            SortKey::NameAscending => "A->Z",
            SortKey::NameDescending => "Z->A",
            SortKey::Oldest => "Oldest",
            SortKey::MostRecent => "Most Recent",
        }
    }

    /// Interprets a sort selector value. Unknown values fall back to
    /// [`SortKey::MostRelevant`] rather than failing.
    #[must_use]
    pub fn from_selection(value: &str) -> Self {
        // older selectors sent the lowercase label
        if value == "highest amount" {
            return SortKey::HighestAmount;
        }
        Self::ALL
            .into_iter()
            .find(|key| key.label() == value)
            .unwrap_or_default()
    }

    /// Returns all selector labels, [`MOST_RELEVANT`] first
    #[must_use]
    pub fn options() -> Vec<&'static str> {
        Self::ALL.into_iter().map(SortKey::label).collect()
    }
}

/// Returns the customer selector values: [`ALL_CUSTOMERS`] followed by each customer name
/// in load order.
#[must_use]
pub fn customer_options(dataset: &Dataset) -> Vec<&str> {
    std::iter::once(ALL_CUSTOMERS)
        .chain(dataset.customers().iter().map(Customer::name))
        .collect()
}

/// What the user has currently selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Customer filter
    pub customer: CustomerFilter,
    /// Sort order
    pub sort: SortKey,
}

type Subscriber<'a> = Box<dyn FnMut(&Projection) + 'a>;

/// Holds the current [`ViewState`] over a [`Dataset`] and rederives the [`Projection`] every
/// time the state changes.
///
/// Subscribers are called synchronously after each recomputation with the new projection.
/// Nothing is cached between states, so the same state always produces the same projection.
pub struct TransactionView<'a> {
    dataset: &'a Dataset,
    state: ViewState,
    projection: Projection,
    unresolved: Vec<Error>,
    subscribers: Vec<Subscriber<'a>>,
}

impl<'a> TransactionView<'a> {
    /// Creates a view with no filter and no sort
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_state(dataset, ViewState::default())
    }

    /// Creates a view starting from `state`. Transactions the join leaves out are logged here,
    /// once, since every later recompute sees the same dataset.
    #[must_use]
    pub fn with_state(dataset: &'a Dataset, state: ViewState) -> Self {
        let (projection, unresolved) = ops::compute(dataset, &state);
        for error in &unresolved {
            warn!("Skipping transaction: {error}");
        }
        Self {
            dataset,
            state,
            projection,
            unresolved,
            subscribers: Vec::new(),
        }
    }

    /// Registers `subscriber`. It is called once right away with the current projection, then
    /// after every state change.
    pub fn subscribe<F>(&mut self, mut subscriber: F)
    where
        F: FnMut(&Projection) + 'a,
    {
        subscriber(&self.projection);
        self.subscribers.push(Box::new(subscriber));
    }

    /// Applies a customer selector value, see [`CustomerFilter::from_selection`]
    pub fn select_customer(&mut self, value: &str) {
        let state = ViewState {
            customer: CustomerFilter::from_selection(value),
            ..self.state.clone()
        };
        self.set_state(state);
    }

    /// Applies a sort selector value, see [`SortKey::from_selection`]
    pub fn select_sort(&mut self, value: &str) {
        let state = ViewState {
            sort: SortKey::from_selection(value),
            ..self.state.clone()
        };
        self.set_state(state);
    }

    /// Returns to no filter and no sort
    pub fn reset(&mut self) {
        self.set_state(ViewState::default());
    }

    /// Replaces the state, recomputes and notifies subscribers
    pub fn set_state(&mut self, state: ViewState) {
        debug!("Recomputing view for {state:?}");
        let (projection, unresolved) = ops::compute(self.dataset, &state);
        self.state = state;
        self.projection = projection;
        self.unresolved = unresolved;
        for subscriber in &mut self.subscribers {
            subscriber(&self.projection);
        }
    }

    /// Returns the current state
    #[must_use]
    #[inline]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns the projection for the current state
    #[must_use]
    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Returns the references the last join could not resolve
    #[must_use]
    #[inline]
    pub fn unresolved(&self) -> &[Error] {
        &self.unresolved
    }
}
