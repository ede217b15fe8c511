use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::core::{Attachment, Category, Expense, Income};
use crate::store_adapters::{LedgerStore, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Store that keeps ledger entries in two local CSV files.
///
/// `income.csv` and `expense.csv` live under `base_dir`; attachment bytes
/// are Base64-encoded inline. Ids are re-seeded from the highest stored id,
/// so a reopened store continues the sequence.
pub struct CsvStore {
    base_dir: PathBuf,
}

impl CsvStore {
    /// Opens a store rooted at `base_dir`, creating the directory if
    /// needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir).map_err(io_err)?;
        Ok(Self { base_dir })
    }

    fn income_path(&self) -> PathBuf {
        self.base_dir.join("income.csv")
    }

    fn expense_path(&self) -> PathBuf {
        self.base_dir.join("expense.csv")
    }
}

fn io_err(err: std::io::Error) -> StoreError {
    StoreError::Io(err.to_string())
}

fn corrupt(msg: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(msg.to_string())
}

fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path).map_err(io_err)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut rows = Vec::new();
    for record in rdr.records() {
        let rec = record.map_err(|e| corrupt(e))?;
        rows.push(rec.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<(), StoreError> {
    let file = std::fs::File::create(path).map_err(io_err)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    for row in rows {
        wtr.write_record(row).map_err(|e| StoreError::Io(e.to_string()))?;
    }
    wtr.flush().map_err(io_err)
}

fn append_row(path: &Path, row: &[String]) -> Result<(), StoreError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    wtr.write_record(row)
        .map_err(|e| StoreError::Io(e.to_string()))?;
    wtr.flush().map_err(io_err)
}

fn income_to_row(income: &Income) -> Vec<String> {
    vec![
        income.id.to_string(),
        income.source.clone(),
        income.amount.to_string(),
        income.date.format(DATE_FORMAT).to_string(),
        income.account.clone(),
    ]
}

fn income_from_row(row: &[String]) -> Result<Income, StoreError> {
    if row.len() != 5 {
        return Err(corrupt(format!("income row has {} fields", row.len())));
    }
    Ok(Income {
        id: row[0].parse().map_err(corrupt)?,
        source: row[1].clone(),
        amount: Decimal::from_str(&row[2]).map_err(corrupt)?,
        date: NaiveDate::parse_from_str(&row[3], DATE_FORMAT).map_err(corrupt)?,
        account: row[4].clone(),
    })
}

fn expense_to_row(expense: &Expense) -> Vec<String> {
    let (file_name, mime_type, data) = match &expense.attachment {
        Some(attachment) => (
            attachment.file_name.clone(),
            attachment.mime_type.clone(),
            BASE64.encode(&attachment.data),
        ),
        None => (String::new(), String::new(), String::new()),
    };
    vec![
        expense.id.to_string(),
        expense.item_name.clone(),
        expense.amount.to_string(),
        expense.account.clone(),
        expense.expense_date.format(DATE_FORMAT).to_string(),
        expense.category.to_string(),
        expense.custom_category.clone().unwrap_or_default(),
        expense.description.clone().unwrap_or_default(),
        file_name,
        mime_type,
        data,
    ]
}

fn expense_from_row(row: &[String]) -> Result<Expense, StoreError> {
    if row.len() != 11 {
        return Err(corrupt(format!("expense row has {} fields", row.len())));
    }
    let attachment = if row[8].is_empty() {
        None
    } else {
        Some(Attachment {
            data: BASE64.decode(&row[10]).map_err(corrupt)?,
            mime_type: row[9].clone(),
            file_name: row[8].clone(),
        })
    };
    Ok(Expense {
        id: row[0].parse().map_err(corrupt)?,
        item_name: row[1].clone(),
        amount: Decimal::from_str(&row[2]).map_err(corrupt)?,
        account: row[3].clone(),
        expense_date: NaiveDate::parse_from_str(&row[4], DATE_FORMAT).map_err(corrupt)?,
        category: Category::from_str(&row[5]).map_err(corrupt)?,
        custom_category: (!row[6].is_empty()).then(|| row[6].clone()),
        description: (!row[7].is_empty()).then(|| row[7].clone()),
        attachment,
    })
}

fn next_id<T>(entries: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
    entries.iter().map(&id_of).max().unwrap_or(0) + 1
}

impl LedgerStore for CsvStore {
    fn incomes(&self) -> Result<Vec<Income>, StoreError> {
        read_rows(&self.income_path())?
            .iter()
            .map(|row| income_from_row(row))
            .collect()
    }

    fn expenses(&self) -> Result<Vec<Expense>, StoreError> {
        read_rows(&self.expense_path())?
            .iter()
            .map(|row| expense_from_row(row))
            .collect()
    }

    fn income(&self, id: i64) -> Result<Option<Income>, StoreError> {
        Ok(self.incomes()?.into_iter().find(|income| income.id == id))
    }

    fn expense(&self, id: i64) -> Result<Option<Expense>, StoreError> {
        Ok(self
            .expenses()?
            .into_iter()
            .find(|expense| expense.id == id))
    }

    fn insert_income(&mut self, mut income: Income) -> Result<i64, StoreError> {
        income.id = next_id(&self.incomes()?, |i| i.id);
        append_row(&self.income_path(), &income_to_row(&income))?;
        debug!(id = income.id, "Income row appended");
        Ok(income.id)
    }

    fn insert_expense(&mut self, mut expense: Expense) -> Result<i64, StoreError> {
        expense.id = next_id(&self.expenses()?, |e| e.id);
        append_row(&self.expense_path(), &expense_to_row(&expense))?;
        debug!(id = expense.id, "Expense row appended");
        Ok(expense.id)
    }

    fn update_income(&mut self, income: &Income) -> Result<(), StoreError> {
        let mut incomes = self.incomes()?;
        let slot = incomes
            .iter_mut()
            .find(|i| i.id == income.id)
            .ok_or(StoreError::NotFound)?;
        *slot = income.clone();
        let rows: Vec<_> = incomes.iter().map(income_to_row).collect();
        write_rows(&self.income_path(), &rows)
    }

    fn update_expense(&mut self, expense: &Expense) -> Result<(), StoreError> {
        let mut expenses = self.expenses()?;
        let slot = expenses
            .iter_mut()
            .find(|e| e.id == expense.id)
            .ok_or(StoreError::NotFound)?;
        *slot = expense.clone();
        let rows: Vec<_> = expenses.iter().map(expense_to_row).collect();
        write_rows(&self.expense_path(), &rows)
    }

    fn delete_income(&mut self, id: i64) -> Result<(), StoreError> {
        let mut incomes = self.incomes()?;
        incomes.retain(|income| income.id != id);
        let rows: Vec<_> = incomes.iter().map(income_to_row).collect();
        write_rows(&self.income_path(), &rows)
    }

    fn delete_expense(&mut self, id: i64) -> Result<(), StoreError> {
        let mut expenses = self.expenses()?;
        expenses.retain(|expense| expense.id != id);
        let rows: Vec<_> = expenses.iter().map(expense_to_row).collect();
        write_rows(&self.expense_path(), &rows)
    }
}
