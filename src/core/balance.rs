//! Balance aggregation over the ledger store.
//!
//! Every call recomputes from the store's current contents; nothing is
//! cached, so readers always see the result of the latest writes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store_adapters::{LedgerStore, StoreError};

/// Overall totals across every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Sum of all income amounts.
    pub total_income: Decimal,
    /// Sum of all expense amounts.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`; negative when overspent.
    pub remaining_balance: Decimal,
}

impl BalanceSheet {
    /// Computes the overall totals. An empty store yields all zeros.
    pub fn compute<S: LedgerStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let total_income = store.income_sum(None)?;
        let total_expenses = store.expense_sum(None)?;
        Ok(Self {
            total_income,
            total_expenses,
            remaining_balance: total_income - total_expenses,
        })
    }
}

/// Totals scoped to a single account label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Sum of income amounts booked against the account.
    pub income: Decimal,
    /// Sum of expense amounts booked against the account.
    pub expenses: Decimal,
    /// `income - expenses` for the account.
    pub remaining: Decimal,
}

/// Computes the balance for one account label. Matching is by string
/// equality on the stored label, nothing is trimmed or case-folded.
pub fn account_balance<S: LedgerStore + ?Sized>(
    store: &S,
    account: &str,
) -> Result<AccountBalance, StoreError> {
    let income = store.income_sum(Some(account))?;
    let expenses = store.expense_sum(Some(account))?;
    Ok(AccountBalance {
        income,
        expenses,
        remaining: income - expenses,
    })
}

/// Figures the presentation layer shows on the overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub remaining_balance: Decimal,
    pub credit_card_income: Decimal,
    pub credit_card_remaining_balance: Decimal,
}

impl DashboardSummary {
    /// Computes the overview figures; `credit_label` names the account
    /// whose scoped balance is broken out separately.
    pub fn compute<S: LedgerStore + ?Sized>(
        store: &S,
        credit_label: &str,
    ) -> Result<Self, StoreError> {
        let sheet = BalanceSheet::compute(store)?;
        let credit = account_balance(store, credit_label)?;
        Ok(Self {
            total_income: sheet.total_income,
            total_expenses: sheet.total_expenses,
            remaining_balance: sheet.remaining_balance,
            credit_card_income: credit.income,
            credit_card_remaining_balance: credit.remaining,
        })
    }
}
