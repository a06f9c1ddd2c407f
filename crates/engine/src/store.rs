//! The state manager: single source of truth for expenses and categories.
//!
//! [`ExpenseStore`] owns the authoritative collections and applies a change
//! only after the remote store confirms it. Consumers read through
//! [`ExpenseStore::snapshot`], which never suspends.
//!
//! The lock around the collections is only held for short synchronous
//! sections, never across a remote call. Overlapping mutations are not queued:
//! their results are applied in the order the remote calls resolve, with no
//! conflict detection.

use std::{
    collections::HashSet,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde::Serialize;

use crate::{
    Amount, Category, CategoryId, CategoryIndex, EngineError, Expense, ExpenseId, ExpenseInput,
    Operation, RemoteError, RemoteStore, ResultEngine,
    aggregation::{self, CategoryTotal, Summary},
    query::{self, ExpenseQuery},
    validation,
};

/// Point-in-time copy of the store's state.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub expenses: Vec<Expense>,
    pub categories: Vec<Category>,
    /// `true` while at least one remote call is in flight.
    pub loading: bool,
    /// Message of the last remote failure, if any.
    pub error: Option<String>,
}

impl Snapshot {
    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Name of the category of `expense`, preferring the local collection over
    /// the copy embedded by the remote store.
    pub fn category_name<'a>(&'a self, expense: &'a Expense) -> Option<&'a str> {
        self.category(expense.category_id)
            .or(expense.category.as_ref())
            .map(|category| category.name.as_str())
    }

    pub fn total_expenses(&self) -> Amount {
        aggregation::total_expenses(&self.expenses)
    }

    pub fn expenses_by_category(&self) -> Vec<CategoryTotal> {
        aggregation::expenses_by_category(&self.expenses, &self.categories)
    }

    pub fn summary(&self) -> Summary<'_> {
        aggregation::summarize(&self.expenses, &self.categories)
    }

    pub fn query(&self, query: &ExpenseQuery) -> Vec<&Expense> {
        query::query(&self.expenses, query)
    }
}

#[derive(Debug, Default)]
struct State {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    names: CategoryIndex,
    in_flight: usize,
    error: Option<String>,
}

/// Handle to the expense state.
///
/// Cloning is cheap and every clone shares the same state, so the
/// application root can create one store and hand clones to its consumers.
#[derive(Debug)]
pub struct ExpenseStore<R> {
    remote: Arc<R>,
    state: Arc<RwLock<State>>,
}

impl<R> Clone for ExpenseStore<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            state: Arc::clone(&self.state),
        }
    }
}

/// Marks a remote call as in flight until dropped.
///
/// Dropping also runs when the caller abandons the future, so `loading`
/// cannot stay stuck on a cancelled operation.
struct InFlight<'a> {
    state: &'a RwLock<State>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl<R: RemoteStore> ExpenseStore<R> {
    /// Creates an empty store. Call [`initialize`](Self::initialize) to load
    /// the collections.
    pub fn new(remote: R) -> Self {
        Self {
            remote: Arc::new(remote),
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.read();
        Snapshot {
            expenses: state.expenses.clone(),
            categories: state.categories.clone(),
            loading: state.in_flight > 0,
            error: state.error.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.read().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Dismisses the recorded error. Nothing is retried.
    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// Fetches expenses and categories concurrently and replaces both
    /// collections at once.
    ///
    /// On failure the collections are left as they were (empty on first load)
    /// and the error is recorded.
    pub async fn initialize(&self) -> ResultEngine<()> {
        let _in_flight = self.begin();
        tracing::info!("loading expenses and categories");

        let fetched = tokio::try_join!(
            self.remote.list_expenses(),
            self.remote.list_categories()
        );
        let (expenses, categories) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => return Err(self.fail(Operation::Load, err)),
        };

        let expenses = dedup_by_id(expenses, |expense| expense.id);
        let categories = dedup_by_id(categories, |category| category.id);
        tracing::info!(
            expenses = expenses.len(),
            categories = categories.len(),
            "loaded"
        );

        let mut state = self.write();
        state.names = CategoryIndex::from_categories(&categories);
        state.expenses = expenses;
        state.categories = categories;
        state.error = None;
        Ok(())
    }

    /// Reads one expense from the remote store. Local collections are not
    /// touched.
    pub async fn fetch_expense(&self, id: ExpenseId) -> ResultEngine<Expense> {
        let _in_flight = self.begin();
        tracing::debug!(%id, "fetching expense");
        self.remote
            .get_expense(id)
            .await
            .map_err(|err| self.fail(Operation::FetchExpense, err))
    }

    /// Creates an expense and appends the confirmed record.
    pub async fn add_expense(&self, input: ExpenseInput) -> ResultEngine<Expense> {
        validation::validate_expense(&input, &self.read().categories)?;

        let _in_flight = self.begin();
        let created = self
            .remote
            .create_expense(&input)
            .await
            .map_err(|err| self.fail(Operation::AddExpense, err))?;
        tracing::debug!(id = %created.id, "expense created");

        let mut state = self.write();
        match position(&state.expenses, created.id) {
            Some(index) => {
                tracing::warn!(id = %created.id, "remote store reused an existing expense id");
                state.expenses[index] = created.clone();
            }
            None => state.expenses.push(created.clone()),
        }
        Ok(created)
    }

    /// Updates an expense and replaces it in place with the confirmed record.
    ///
    /// `id` must be present locally. If the record disappears while the
    /// request is in flight it is not re-inserted.
    pub async fn edit_expense(
        &self,
        id: ExpenseId,
        input: ExpenseInput,
    ) -> ResultEngine<Expense> {
        {
            let state = self.read();
            if position(&state.expenses, id).is_none() {
                return Err(EngineError::KeyNotFound(format!("expense {id}")));
            }
            validation::validate_expense(&input, &state.categories)?;
        }

        let _in_flight = self.begin();
        let updated = self
            .remote
            .update_expense(id, &input)
            .await
            .map_err(|err| self.fail(Operation::EditExpense, err))?;
        tracing::debug!(%id, "expense updated");

        let mut state = self.write();
        match position(&state.expenses, id) {
            Some(index) => state.expenses[index] = updated.clone(),
            None => tracing::warn!(%id, "expense removed while its update was in flight"),
        }
        Ok(updated)
    }

    /// Deletes an expense and drops it from the collection.
    pub async fn remove_expense(&self, id: ExpenseId) -> ResultEngine<()> {
        let _in_flight = self.begin();
        self.remote
            .delete_expense(id)
            .await
            .map_err(|err| self.fail(Operation::RemoveExpense, err))?;
        tracing::debug!(%id, "expense deleted");

        self.write().expenses.retain(|expense| expense.id != id);
        Ok(())
    }

    /// Creates a category and appends the confirmed record.
    ///
    /// The name is trimmed and must be unique ignoring case; duplicates are
    /// rejected with [`ValidationError::DuplicateCategory`] before any remote
    /// call.
    ///
    /// [`ValidationError::DuplicateCategory`]: crate::ValidationError::DuplicateCategory
    pub async fn add_category(&self, name: &str) -> ResultEngine<Category> {
        let name = validation::validate_category_name(name, &self.read().names)?;

        let _in_flight = self.begin();
        let created = self
            .remote
            .create_category(&name)
            .await
            .map_err(|err| self.fail(Operation::AddCategory, err))?;
        tracing::debug!(id = %created.id, name = %created.name, "category created");

        let mut state = self.write();
        if state.categories.iter().any(|category| category.id == created.id) {
            tracing::warn!(id = %created.id, "remote store reused an existing category id");
        } else {
            state.names.insert(&created);
            state.categories.push(created.clone());
        }
        Ok(created)
    }

    fn begin(&self) -> InFlight<'_> {
        self.write().in_flight += 1;
        InFlight { state: &self.state }
    }

    fn fail(&self, op: Operation, err: RemoteError) -> EngineError {
        tracing::warn!(%op, "remote call failed: {err}");
        self.write().error = Some(op.failure_message().to_string());
        EngineError::Remote { op, source: err }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn position(expenses: &[Expense], id: ExpenseId) -> Option<usize> {
    expenses.iter().position(|expense| expense.id == id)
}

/// Keeps the first record for each id.
fn dedup_by_id<T, K>(records: Vec<T>, id: impl Fn(&T) -> K) -> Vec<T>
where
    K: std::hash::Hash + Eq,
{
    let mut seen = HashSet::new();
    let before = records.len();
    let records: Vec<T> = records
        .into_iter()
        .filter(|record| seen.insert(id(record)))
        .collect();
    if records.len() != before {
        tracing::warn!(dropped = before - records.len(), "duplicate ids from remote store");
    }
    records
}
