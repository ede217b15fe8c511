//! Monthly expense rollups.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Expense;
use crate::store_adapters::{LedgerStore, StoreError};

/// Expenses of one calendar month, with their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// First day of the month the summary covers.
    pub month: NaiveDate,
    /// Sum of the amounts of all contributing expenses.
    pub total: Decimal,
    /// The expenses that fall into the month.
    pub expenses: Vec<Expense>,
}

/// Groups all expenses by (year, month) of their expense date and sums
/// each group, most recent month first. Months without expenses do not
/// appear.
pub fn monthly_report<S: LedgerStore + ?Sized>(
    store: &S,
) -> Result<Vec<MonthlySummary>, StoreError> {
    let mut groups: BTreeMap<NaiveDate, Vec<Expense>> = BTreeMap::new();
    for expense in store.expenses()? {
        let month = expense
            .expense_date
            .with_day(1)
            .expect("every month has a first day");
        groups.entry(month).or_default().push(expense);
    }
    Ok(groups
        .into_iter()
        .rev()
        .map(|(month, expenses)| MonthlySummary {
            month,
            total: expenses.iter().map(|expense| expense.amount).sum(),
            expenses,
        })
        .collect())
}
