//! CRUD orchestration over a ledger store.
//!
//! The manager is the single write path: candidate expenses pass through
//! the admission rules before they reach the store, while edits replace
//! fields without re-running the balance checks.

use tracing::info;

use crate::core::balance::DashboardSummary;
use crate::core::report::{MonthlySummary, monthly_report};
use crate::core::validation::{Rejection, ValidationPolicy, Verdict, admit};
use crate::core::{Attachment, EntryError, Expense, Income};
use crate::store_adapters::{LedgerStore, StoreError};

/// Errors surfaced by record-manager operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The admission rules refused the candidate expense.
    Rejected(Rejection),
    /// The addressed record does not exist.
    NotFound,
    /// The record was modified concurrently and still exists; the caller
    /// must decide how to proceed.
    Conflict,
    /// A field-level validation failure.
    Entry(EntryError),
    /// The underlying store failed.
    Store(StoreError),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Rejected(rejection) => write!(f, "{rejection}"),
            LedgerError::NotFound => write!(f, "record not found"),
            LedgerError::Conflict => write!(f, "record was modified concurrently"),
            LedgerError::Entry(err) => write!(f, "{err}"),
            LedgerError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => LedgerError::NotFound,
            StoreError::Conflict => LedgerError::Conflict,
            other => LedgerError::Store(other),
        }
    }
}

impl From<EntryError> for LedgerError {
    fn from(err: EntryError) -> Self {
        LedgerError::Entry(err)
    }
}

/// Orchestrates reads and writes against a [`LedgerStore`].
pub struct RecordManager<S: LedgerStore> {
    store: S,
    policy: ValidationPolicy,
}

impl<S: LedgerStore> RecordManager<S> {
    /// Creates a manager with the default validation policy.
    pub fn new(store: S) -> Self {
        Self::with_policy(store, ValidationPolicy::default())
    }

    /// Creates a manager with a custom validation policy.
    pub fn with_policy(store: S, policy: ValidationPolicy) -> Self {
        Self { store, policy }
    }

    /// The validation policy in effect.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Persists a new income entry. Income is not subject to admission
    /// rules.
    pub fn add_income(&mut self, income: Income) -> Result<i64, LedgerError> {
        let id = self.store.insert_income(income)?;
        info!(id, "Income recorded");
        Ok(id)
    }

    /// Lists all income entries.
    pub fn incomes(&self) -> Result<Vec<Income>, LedgerError> {
        Ok(self.store.incomes()?)
    }

    /// Looks up one income entry.
    pub fn income(&self, id: i64) -> Result<Income, LedgerError> {
        self.store.income(id)?.ok_or(LedgerError::NotFound)
    }

    /// Replaces the fields of an existing income entry.
    pub fn update_income(&mut self, id: i64, replacement: Income) -> Result<(), LedgerError> {
        let mut updated = replacement;
        updated.id = self.income(id)?.id;
        match self.store.update_income(&updated) {
            Ok(()) => {
                info!(id, "Income updated");
                Ok(())
            }
            Err(StoreError::Conflict) => Err(self.income_conflict(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes an income entry; removing an absent id is not an error.
    pub fn remove_income(&mut self, id: i64) -> Result<(), LedgerError> {
        self.store.delete_income(id)?;
        info!(id, "Income removed");
        Ok(())
    }

    /// Runs the admission rules for `candidate` and persists it when they
    /// pass. Returns the assigned id together with the non-blocking
    /// warning, if one was raised.
    pub fn add_expense(
        &mut self,
        candidate: Expense,
    ) -> Result<(i64, Option<String>), LedgerError> {
        match admit(&self.store, &self.policy, &candidate)? {
            Verdict::Reject(rejection) => {
                info!(%rejection, "Expense rejected");
                Err(LedgerError::Rejected(rejection))
            }
            verdict => {
                let warning = verdict.warning().map(str::to_string);
                let id = self.store.insert_expense(candidate)?;
                info!(id, warned = warning.is_some(), "Expense recorded");
                Ok((id, warning))
            }
        }
    }

    /// Lists all expense entries.
    pub fn expenses(&self) -> Result<Vec<Expense>, LedgerError> {
        Ok(self.store.expenses()?)
    }

    /// Looks up one expense entry.
    pub fn expense(&self, id: i64) -> Result<Expense, LedgerError> {
        self.store.expense(id)?.ok_or(LedgerError::NotFound)
    }

    /// Replaces the fields of an existing expense entry.
    ///
    /// Edits do not re-run the admission rules; only creation validates.
    /// When `replacement` carries no attachment the stored one is kept,
    /// mirroring a form edit without a new upload.
    pub fn update_expense(&mut self, id: i64, replacement: Expense) -> Result<(), LedgerError> {
        let existing = self.expense(id)?;
        let mut updated = replacement;
        updated.id = existing.id;
        if updated.attachment.is_none() {
            updated.attachment = existing.attachment;
        }
        match self.store.update_expense(&updated) {
            Ok(()) => {
                info!(id, "Expense updated");
                Ok(())
            }
            Err(StoreError::Conflict) => Err(self.expense_conflict(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes an expense entry; removing an absent id is not an error.
    pub fn remove_expense(&mut self, id: i64) -> Result<(), LedgerError> {
        self.store.delete_expense(id)?;
        info!(id, "Expense removed");
        Ok(())
    }

    /// Returns the receipt attached to an expense.
    pub fn attachment(&self, id: i64) -> Result<Attachment, LedgerError> {
        self.expense(id)?.attachment.ok_or(LedgerError::NotFound)
    }

    /// Overview figures for the presentation layer.
    pub fn summary(&self) -> Result<DashboardSummary, LedgerError> {
        Ok(DashboardSummary::compute(
            &self.store,
            &self.policy.credit_label,
        )?)
    }

    /// Per-month expense rollups, most recent month first.
    pub fn monthly_report(&self) -> Result<Vec<MonthlySummary>, LedgerError> {
        Ok(monthly_report(&self.store)?)
    }

    // A store-level conflict means another writer got in between. If the
    // record vanished the caller gets NotFound; otherwise the conflict
    // stands and is never retried here.
    fn income_conflict(&self, id: i64) -> LedgerError {
        match self.store.income(id) {
            Ok(None) => LedgerError::NotFound,
            Ok(Some(_)) => LedgerError::Conflict,
            Err(err) => err.into(),
        }
    }

    fn expense_conflict(&self, id: i64) -> LedgerError {
        match self.store.expense(id) {
            Ok(None) => LedgerError::NotFound,
            Ok(Some(_)) => LedgerError::Conflict,
            Err(err) => err.into(),
        }
    }
}
