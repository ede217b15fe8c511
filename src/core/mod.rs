//! Core logic for the income/expense ledger.

pub mod balance;
pub mod manager;
pub mod report;
pub mod validation;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Errors that can occur when creating an [`Income`] or [`Expense`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// A required text field was empty.
    MissingField(&'static str),
    /// The amount provided is negative.
    NegativeAmount,
    /// The category label is not one of the known categories.
    UnknownCategory(String),
    /// The attachment's file extension is not on the allow-list.
    DisallowedFileType(String),
}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryError::MissingField(field) => write!(f, "{field} must not be empty"),
            EntryError::NegativeAmount => write!(f, "amount must not be negative"),
            EntryError::UnknownCategory(label) => write!(f, "unknown category: {label}"),
            EntryError::DisallowedFileType(name) => write!(
                f,
                "{name}: only PDF, JPG, JPEG, PNG and TXT files are allowed"
            ),
        }
    }
}

impl std::error::Error for EntryError {}

/// Categories an expense can be filed under. Anything outside the fixed
/// set goes through [`Category::Other`] with a custom label on the expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Housing,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Shopping,
    Other,
}

impl Category {
    fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Housing => "Housing",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Category::Food),
            "Housing" => Ok(Category::Housing),
            "Transport" => Ok(Category::Transport),
            "Utilities" => Ok(Category::Utilities),
            "Entertainment" => Ok(Category::Entertainment),
            "Health" => Ok(Category::Health),
            "Shopping" => Ok(Category::Shopping),
            "Other" => Ok(Category::Other),
            other => Err(EntryError::UnknownCategory(other.to_string())),
        }
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Category::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// File extensions accepted for receipt attachments.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "jpg", "jpeg", "png", "txt"];

/// Receipt file attached to an expense.
///
/// Bytes, MIME type and original filename travel together; an expense
/// either carries a whole attachment or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Raw file contents.
    pub data: Vec<u8>,
    /// Declared MIME type (e.g. `application/pdf`).
    pub mime_type: String,
    /// Original filename as supplied by the uploader.
    pub file_name: String,
}

impl Attachment {
    /// Creates an attachment after checking the filename extension against
    /// the allow-list (case-insensitive).
    pub fn new(
        data: Vec<u8>,
        mime_type: String,
        file_name: String,
    ) -> Result<Self, EntryError> {
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(Self {
                data,
                mime_type,
                file_name,
            }),
            _ => Err(EntryError::DisallowedFileType(file_name)),
        }
    }
}

/// Money coming into an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    /// Store-assigned identifier; `0` until persisted.
    pub id: i64,
    /// Where the money came from.
    pub source: String,
    /// Monetary amount, always non-negative.
    pub amount: Decimal,
    /// Date the income was received.
    pub date: NaiveDate,
    /// Account label the income is booked against.
    pub account: String,
}

impl Income {
    /// Creates a new income entry after validating the fields.
    pub fn new(
        source: String,
        amount: Decimal,
        date: NaiveDate,
        account: String,
    ) -> Result<Self, EntryError> {
        if source.is_empty() {
            return Err(EntryError::MissingField("source"));
        }
        if account.is_empty() {
            return Err(EntryError::MissingField("account"));
        }
        if amount.is_sign_negative() {
            return Err(EntryError::NegativeAmount);
        }
        Ok(Self {
            id: 0,
            source,
            amount,
            date,
            account,
        })
    }

    /// Serializes the income to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an income from a JSON string.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

/// Money going out of an account, optionally with a receipt attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identifier; `0` until persisted.
    pub id: i64,
    /// What the money was spent on.
    pub item_name: String,
    /// Monetary amount, always non-negative, kept at two decimal places.
    pub amount: Decimal,
    /// Account label the expense is booked against.
    pub account: String,
    /// Date of the expense.
    pub expense_date: NaiveDate,
    /// Category the expense is filed under.
    pub category: Category,
    /// Free-form label used when the category is [`Category::Other`].
    pub custom_category: Option<String>,
    /// Optional memo.
    pub description: Option<String>,
    /// Optional receipt file.
    pub attachment: Option<Attachment>,
}

impl Expense {
    /// Creates a new expense entry after validating the fields.
    ///
    /// When `expense_date` is `None` the current date is used. The amount
    /// is rescaled to two decimal places.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_name: String,
        amount: Decimal,
        account: String,
        expense_date: Option<NaiveDate>,
        category: Category,
        custom_category: Option<String>,
        description: Option<String>,
        attachment: Option<Attachment>,
    ) -> Result<Self, EntryError> {
        if item_name.is_empty() {
            return Err(EntryError::MissingField("item name"));
        }
        if account.is_empty() {
            return Err(EntryError::MissingField("account"));
        }
        if amount.is_sign_negative() {
            return Err(EntryError::NegativeAmount);
        }
        Ok(Self {
            id: 0,
            item_name,
            amount: amount.round_dp(2),
            account,
            expense_date: expense_date.unwrap_or_else(|| Utc::now().date_naive()),
            category,
            custom_category,
            description,
            attachment,
        })
    }

    /// Serializes the expense to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an expense from a JSON string.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}
