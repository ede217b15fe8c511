//! Admission rules for candidate expenses.
//!
//! A candidate is checked against the ledger before it is persisted:
//! spending past the overall balance only raises a warning, while
//! credit-like accounts additionally enforce a hard balance ceiling and a
//! settlement window tied to the latest income on the account.

use tracing::debug;

use crate::core::Expense;
use crate::core::balance::{BalanceSheet, account_balance};
use crate::store_adapters::{LedgerStore, StoreError};

/// How an account behaves under the admission rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Ordinary account; overspending is allowed (with a warning).
    Standard,
    /// Credit-style account with a hard balance ceiling and a settlement
    /// window after the latest income.
    CreditLike,
}

/// Parameters for the admission rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Account label treated as credit-like. Matched by exact string
    /// equality, no trimming or case folding.
    pub credit_label: String,
    /// Maximum number of days an expense may fall after the latest income
    /// on a credit-like account.
    pub settlement_window_days: i64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            credit_label: "CreditCard".to_string(),
            settlement_window_days: 30,
        }
    }
}

impl ValidationPolicy {
    /// Classifies an account label.
    pub fn kind_of(&self, account: &str) -> AccountKind {
        if account == self.credit_label {
            AccountKind::CreditLike
        } else {
            AccountKind::Standard
        }
    }
}

/// Reasons a candidate expense is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The amount exceeds the scoped balance of a credit-like account.
    ExceedsCreditBalance {
        /// Label of the account that ran out of cover.
        account: String,
    },
    /// The expense date falls too long after the latest income on a
    /// credit-like account.
    StaleExpenseDate {
        /// Label of the account the rule fired for.
        account: String,
        /// The settlement window that was exceeded, in days.
        window_days: i64,
    },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::ExceedsCreditBalance { account } => {
                write!(f, "expense exceeds the {account} available balance")
            }
            Rejection::StaleExpenseDate {
                account,
                window_days,
            } => write!(
                f,
                "expense date is more than {window_days} days after the latest {account} income date"
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Outcome of the admission checks for a candidate expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// All checks passed.
    Admit,
    /// Admissible, but the overall balance goes negative; the message is
    /// surfaced to the caller without blocking persistence.
    AdmitWithWarning(String),
    /// The candidate must not be persisted.
    Reject(Rejection),
}

impl Verdict {
    /// The non-blocking warning attached to an admission, if any.
    pub fn warning(&self) -> Option<&str> {
        match self {
            Verdict::AdmitWithWarning(message) => Some(message),
            _ => None,
        }
    }
}

/// Runs the admission rules for a candidate expense that has not been
/// persisted yet.
///
/// Checks run in order: the overall-balance warning first, then for
/// credit-like accounts the hard balance ceiling and the settlement-window
/// rule. When the account has no prior income the window rule is skipped;
/// there is nothing to measure against.
pub fn admit<S: LedgerStore + ?Sized>(
    store: &S,
    policy: &ValidationPolicy,
    candidate: &Expense,
) -> Result<Verdict, StoreError> {
    let overall = BalanceSheet::compute(store)?;
    let warning = if candidate.amount > overall.remaining_balance {
        Some(
            "expense exceeds the available balance and will result in a negative balance"
                .to_string(),
        )
    } else {
        None
    };

    if policy.kind_of(&candidate.account) == AccountKind::CreditLike {
        let scoped = account_balance(store, &candidate.account)?;
        if candidate.amount > scoped.remaining {
            debug!(account = %candidate.account, "Credit balance exceeded");
            return Ok(Verdict::Reject(Rejection::ExceedsCreditBalance {
                account: candidate.account.clone(),
            }));
        }
        if let Some(latest) = store.latest_income_date(&candidate.account)? {
            let days_since_income = (candidate.expense_date - latest).num_days();
            if days_since_income > policy.settlement_window_days {
                debug!(
                    account = %candidate.account,
                    days_since_income,
                    "Settlement window exceeded"
                );
                return Ok(Verdict::Reject(Rejection::StaleExpenseDate {
                    account: candidate.account.clone(),
                    window_days: policy.settlement_window_days,
                }));
            }
        }
    }

    Ok(match warning {
        Some(message) => Verdict::AdmitWithWarning(message),
        None => Verdict::Admit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, Income};
    use crate::store_adapters::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(amount: Decimal, account: &str, on: NaiveDate) -> Expense {
        Expense::new(
            "purchase".into(),
            amount,
            account.into(),
            Some(on),
            Category::Shopping,
            None,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn classification_is_exact_match() {
        let policy = ValidationPolicy::default();
        assert_eq!(policy.kind_of("CreditCard"), AccountKind::CreditLike);
        assert_eq!(policy.kind_of("creditcard"), AccountKind::Standard);
        assert_eq!(policy.kind_of("CreditCard "), AccountKind::Standard);
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let mut store = MemoryStore::new();
        store
            .insert_income(
                Income::new(
                    "Payment".into(),
                    dec!(100),
                    date(2024, 1, 1),
                    "CreditCard".into(),
                )
                .unwrap(),
            )
            .unwrap();
        let policy = ValidationPolicy::default();
        // exactly 30 days after the income is still inside the window
        let on_boundary = candidate(dec!(10), "CreditCard", date(2024, 1, 31));
        assert!(matches!(
            admit(&store, &policy, &on_boundary).unwrap(),
            Verdict::Admit
        ));
        let past_boundary = candidate(dec!(10), "CreditCard", date(2024, 2, 1));
        assert!(matches!(
            admit(&store, &policy, &past_boundary).unwrap(),
            Verdict::Reject(Rejection::StaleExpenseDate { .. })
        ));
    }

    #[test]
    fn zero_amount_is_always_admissible() {
        let store = MemoryStore::new();
        let policy = ValidationPolicy::default();
        let verdict = admit(
            &store,
            &policy,
            &candidate(dec!(0), "CreditCard", date(2024, 1, 1)),
        )
        .unwrap();
        assert_eq!(verdict, Verdict::Admit);
    }
}
