//! Adapters for persisting ledger entries.

pub mod file;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::{Expense, Income};

/// Represents errors that can occur when interacting with a ledger store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed record does not exist.
    NotFound,
    /// The record was modified by another writer during an update.
    Conflict,
    /// An I/O failure in the underlying storage.
    Io(String),
    /// Stored data could not be decoded.
    Corrupt(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Conflict => write!(f, "record was modified concurrently"),
            StoreError::Io(msg) => write!(f, "storage I/O error: {msg}"),
            StoreError::Corrupt(msg) => write!(f, "stored data is corrupt: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Abstraction over the durable record of income and expense entries.
///
/// Inserts assign and return the record id. Updates address records by id
/// and fail with [`StoreError::NotFound`] when the id is absent; deletes
/// are unconditional. The aggregate helpers are derived from the listing
/// methods so adapters only implement plain CRUD.
pub trait LedgerStore {
    /// Lists all income entries.
    fn incomes(&self) -> Result<Vec<Income>, StoreError>;
    /// Lists all expense entries.
    fn expenses(&self) -> Result<Vec<Expense>, StoreError>;
    /// Looks up a single income entry by id.
    fn income(&self, id: i64) -> Result<Option<Income>, StoreError>;
    /// Looks up a single expense entry by id.
    fn expense(&self, id: i64) -> Result<Option<Expense>, StoreError>;
    /// Persists a new income entry and returns its assigned id.
    fn insert_income(&mut self, income: Income) -> Result<i64, StoreError>;
    /// Persists a new expense entry and returns its assigned id.
    fn insert_expense(&mut self, expense: Expense) -> Result<i64, StoreError>;
    /// Replaces the stored income entry with the same id.
    fn update_income(&mut self, income: &Income) -> Result<(), StoreError>;
    /// Replaces the stored expense entry with the same id.
    fn update_expense(&mut self, expense: &Expense) -> Result<(), StoreError>;
    /// Removes the income entry with the given id, if present.
    fn delete_income(&mut self, id: i64) -> Result<(), StoreError>;
    /// Removes the expense entry with the given id, if present.
    fn delete_expense(&mut self, id: i64) -> Result<(), StoreError>;

    /// Sums income amounts, optionally scoped to one account label.
    fn income_sum(&self, account: Option<&str>) -> Result<Decimal, StoreError> {
        Ok(self
            .incomes()?
            .iter()
            .filter(|income| account.map_or(true, |a| income.account == a))
            .map(|income| income.amount)
            .sum())
    }

    /// Sums expense amounts, optionally scoped to one account label.
    fn expense_sum(&self, account: Option<&str>) -> Result<Decimal, StoreError> {
        Ok(self
            .expenses()?
            .iter()
            .filter(|expense| account.map_or(true, |a| expense.account == a))
            .map(|expense| expense.amount)
            .sum())
    }

    /// Date of the most recent income entry for the given account, if any.
    fn latest_income_date(&self, account: &str) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self
            .incomes()?
            .into_iter()
            .filter(|income| income.account == account)
            .map(|income| income.date)
            .max())
    }
}

/// In-memory store, used as the test double and for ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    incomes: Vec<Income>,
    expenses: Vec<Expense>,
    next_income_id: i64,
    next_expense_id: i64,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn incomes(&self) -> Result<Vec<Income>, StoreError> {
        Ok(self.incomes.clone())
    }

    fn expenses(&self) -> Result<Vec<Expense>, StoreError> {
        Ok(self.expenses.clone())
    }

    fn income(&self, id: i64) -> Result<Option<Income>, StoreError> {
        Ok(self.incomes.iter().find(|income| income.id == id).cloned())
    }

    fn expense(&self, id: i64) -> Result<Option<Expense>, StoreError> {
        Ok(self
            .expenses
            .iter()
            .find(|expense| expense.id == id)
            .cloned())
    }

    fn insert_income(&mut self, mut income: Income) -> Result<i64, StoreError> {
        self.next_income_id += 1;
        income.id = self.next_income_id;
        self.incomes.push(income);
        Ok(self.next_income_id)
    }

    fn insert_expense(&mut self, mut expense: Expense) -> Result<i64, StoreError> {
        self.next_expense_id += 1;
        expense.id = self.next_expense_id;
        self.expenses.push(expense);
        Ok(self.next_expense_id)
    }

    fn update_income(&mut self, income: &Income) -> Result<(), StoreError> {
        match self.incomes.iter_mut().find(|i| i.id == income.id) {
            Some(slot) => {
                *slot = income.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn update_expense(&mut self, expense: &Expense) -> Result<(), StoreError> {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(slot) => {
                *slot = expense.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete_income(&mut self, id: i64) -> Result<(), StoreError> {
        self.incomes.retain(|income| income.id != id);
        Ok(())
    }

    fn delete_expense(&mut self, id: i64) -> Result<(), StoreError> {
        self.expenses.retain(|expense| expense.id != id);
        Ok(())
    }
}
