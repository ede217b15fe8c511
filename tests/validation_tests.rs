use balance_my_books::core::validation::{
    Rejection, ValidationPolicy, Verdict, admit,
};
use balance_my_books::core::{Category, Expense, Income};
use balance_my_books::store_adapters::{LedgerStore, MemoryStore};
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

fn store_with_credit_income(amount: Decimal, on: NaiveDate) -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .insert_income(Income::new("Payment".into(), amount, on, "CreditCard".into()).unwrap())
        .unwrap();
    store
}

#[test]
fn covered_credit_expense_inside_the_window_is_admitted() {
    let store = store_with_credit_income(dec!(100), date(2024, 1, 1));
    let verdict = admit(
        &store,
        &ValidationPolicy::default(),
        &candidate(dec!(50), "CreditCard", date(2024, 1, 20)),
    )
    .unwrap();
    assert_eq!(verdict, Verdict::Admit);
}

#[test]
fn credit_expense_over_the_scoped_balance_is_rejected() {
    let store = store_with_credit_income(dec!(100), date(2024, 1, 1));
    let verdict = admit(
        &store,
        &ValidationPolicy::default(),
        &candidate(dec!(150), "CreditCard", date(2024, 1, 20)),
    )
    .unwrap();
    assert_eq!(
        verdict,
        Verdict::Reject(Rejection::ExceedsCreditBalance {
            account: "CreditCard".into()
        })
    );
}

#[test]
fn credit_expense_past_the_window_is_rejected_despite_cover() {
    let store = store_with_credit_income(dec!(100), date(2024, 1, 1));
    let verdict = admit(
        &store,
        &ValidationPolicy::default(),
        &candidate(dec!(50), "CreditCard", date(2024, 3, 5)),
    )
    .unwrap();
    assert_eq!(
        verdict,
        Verdict::Reject(Rejection::StaleExpenseDate {
            account: "CreditCard".into(),
            window_days: 30,
        })
    );
}

#[test]
fn without_prior_credit_income_only_the_balance_rule_applies() {
    // No CreditCard income at all: the scoped balance is zero, so any
    // positive amount is rejected; the date rule never fires.
    let store = MemoryStore::new();
    let verdict = admit(
        &store,
        &ValidationPolicy::default(),
        &candidate(dec!(10), "CreditCard", date(2030, 12, 31)),
    )
    .unwrap();
    assert_eq!(
        verdict,
        Verdict::Reject(Rejection::ExceedsCreditBalance {
            account: "CreditCard".into()
        })
    );
}

#[test]
fn overspending_a_standard_account_only_warns() {
    let mut store = MemoryStore::new();
    store
        .insert_income(
            Income::new("Salary".into(), dec!(20), date(2024, 1, 1), "Checking".into()).unwrap(),
        )
        .unwrap();
    let verdict = admit(
        &store,
        &ValidationPolicy::default(),
        &candidate(dec!(50), "Checking", date(2024, 1, 2)),
    )
    .unwrap();
    assert!(matches!(verdict, Verdict::AdmitWithWarning(_)));
}

#[test]
fn warning_is_carried_through_on_admitted_credit_expenses() {
    // Overall balance is drained by a checking expense, but the credit
    // account itself still has cover: admitted, with the warning.
    let mut store = store_with_credit_income(dec!(100), date(2024, 1, 1));
    store
        .insert_expense(
            Expense::new(
                "rent".into(),
                dec!(90),
                "Checking".into(),
                Some(date(2024, 1, 2)),
                Category::Housing,
                None,
                None,
                None,
            )
            .unwrap(),
        )
        .unwrap();
    let verdict = admit(
        &store,
        &ValidationPolicy::default(),
        &candidate(dec!(50), "CreditCard", date(2024, 1, 10)),
    )
    .unwrap();
    assert!(verdict.warning().is_some());
}

#[test]
fn the_window_rule_honors_the_most_recent_income() {
    let mut store = store_with_credit_income(dec!(100), date(2024, 1, 1));
    store
        .insert_income(
            Income::new(
                "Payment".into(),
                dec!(100),
                date(2024, 3, 1),
                "CreditCard".into(),
            )
            .unwrap(),
        )
        .unwrap();
    // 2024-03-05 is far past the January income but close to the March one.
    let verdict = admit(
        &store,
        &ValidationPolicy::default(),
        &candidate(dec!(50), "CreditCard", date(2024, 3, 5)),
    )
    .unwrap();
    assert_eq!(verdict, Verdict::Admit);
}

#[test]
fn policy_window_is_parameterized() {
    let store = store_with_credit_income(dec!(100), date(2024, 1, 1));
    let policy = ValidationPolicy {
        credit_label: "CreditCard".into(),
        settlement_window_days: 60,
    };
    let verdict = admit(
        &store,
        &policy,
        &candidate(dec!(50), "CreditCard", date(2024, 2, 25)),
    )
    .unwrap();
    assert_eq!(verdict, Verdict::Admit);
}
