use balance_my_books::core::report::monthly_report;
use balance_my_books::core::{Category, Expense};
use balance_my_books::store_adapters::{LedgerStore, MemoryStore};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn expense(amount: Decimal, y: i32, m: u32, d: u32) -> Expense {
    Expense::new(
        "item".into(),
        amount,
        "Checking".into(),
        Some(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
        Category::Food,
        None,
        None,
        None,
    )
    .unwrap()
}

#[test]
fn per_month_totals_sum_to_total_expenses() {
    let mut store = MemoryStore::new();
    store.insert_expense(expense(dec!(10.25), 2024, 1, 5)).unwrap();
    store.insert_expense(expense(dec!(4.75), 2024, 1, 20)).unwrap();
    store.insert_expense(expense(dec!(30), 2024, 3, 1)).unwrap();
    store.insert_expense(expense(dec!(7.50), 2023, 11, 30)).unwrap();

    let report = monthly_report(&store).unwrap();
    let total: Decimal = report.iter().map(|summary| summary.total).sum();
    assert_eq!(total, store.expense_sum(None).unwrap());
}

#[test]
fn months_are_strictly_descending() {
    let mut store = MemoryStore::new();
    store.insert_expense(expense(dec!(1), 2024, 2, 1)).unwrap();
    store.insert_expense(expense(dec!(1), 2024, 7, 1)).unwrap();
    store.insert_expense(expense(dec!(1), 2023, 12, 1)).unwrap();
    store.insert_expense(expense(dec!(1), 2024, 7, 15)).unwrap();

    let report = monthly_report(&store).unwrap();
    let months: Vec<_> = report.iter().map(|summary| summary.month).collect();
    assert!(months.windows(2).all(|pair| pair[0] > pair[1]));
}

#[test]
fn december_and_january_fall_into_different_groups() {
    let mut store = MemoryStore::new();
    store.insert_expense(expense(dec!(15), 2024, 12, 10)).unwrap();
    store.insert_expense(expense(dec!(25), 2025, 1, 10)).unwrap();

    let report = monthly_report(&store).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(
        report[0].month,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    );
    assert_eq!(report[0].total, dec!(25));
    assert_eq!(
        report[1].month,
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    );
    assert_eq!(report[1].total, dec!(15));
}

#[test]
fn only_months_with_expenses_appear() {
    let mut store = MemoryStore::new();
    store.insert_expense(expense(dec!(5), 2024, 1, 1)).unwrap();
    store.insert_expense(expense(dec!(5), 2024, 4, 1)).unwrap();

    let report = monthly_report(&store).unwrap();
    assert_eq!(report.len(), 2);
}

#[test]
fn summaries_list_their_contributing_expenses() {
    let mut store = MemoryStore::new();
    store.insert_expense(expense(dec!(5), 2024, 6, 3)).unwrap();
    store.insert_expense(expense(dec!(6), 2024, 6, 17)).unwrap();

    let report = monthly_report(&store).unwrap();
    assert_eq!(report[0].expenses.len(), 2);
    assert_eq!(report[0].total, dec!(11));
}
