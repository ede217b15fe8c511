use std::fs;
use std::path::{Path, PathBuf};

use balance_my_books::core::manager::RecordManager;
use balance_my_books::core::{Attachment, Category, Expense, Income};
use balance_my_books::store_adapters::file::CsvStore;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize, Default)]
struct StorageConfig {
    data_dir: Option<String>,
}

#[derive(Deserialize, Default)]
struct Config {
    #[serde(default)]
    storage: StorageConfig,
}

#[derive(Parser)]
#[command(name = "books", about = "Track income and expenses per account")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage income entries
    Income {
        #[command(subcommand)]
        command: IncomeCommands,
    },
    /// Manage expense entries
    Expense {
        #[command(subcommand)]
        command: ExpenseCommands,
    },
    /// Show overall and credit-card balances
    Summary,
    /// Show monthly expense rollups, most recent month first
    Report,
}

#[derive(Subcommand)]
enum IncomeCommands {
    /// Record a new income entry
    Add {
        #[arg(long)]
        source: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        account: String,
    },
    /// List all income entries
    List,
    /// Print one income entry as JSON
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Replace fields of an existing income entry
    Edit {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        account: Option<String>,
    },
    /// Delete an income entry
    Remove {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum ExpenseCommands {
    /// Record a new expense entry, subject to the admission rules
    Add {
        #[arg(long)]
        item: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        account: String,
        /// Expense date; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        category: String,
        /// Free-form label, used with --category Other
        #[arg(long)]
        custom_category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Receipt file to attach (pdf, jpg, jpeg, png or txt)
        #[arg(long)]
        receipt: Option<PathBuf>,
    },
    /// List all expense entries
    List,
    /// Print one expense entry as JSON
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Replace fields of an existing expense entry (no balance re-check)
    Edit {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        item: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        custom_category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New receipt file; the stored one is kept when omitted
        #[arg(long)]
        receipt: Option<PathBuf>,
    },
    /// Delete an expense entry
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Write the stored receipt of an expense to disk
    FetchReceipt {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug)]
enum CliError {
    InvalidConfig(String),
    InvalidReceipt(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            CliError::InvalidReceipt(msg) => write!(f, "invalid receipt file: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

fn load_config(path: &Path) -> Result<Config, CliError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let data = fs::read_to_string(path).map_err(|e| CliError::InvalidConfig(e.to_string()))?;
    toml::from_str(&data).map_err(|e| CliError::InvalidConfig(e.to_string()))
}

fn mime_type_for(file_name: &str) -> String {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn load_attachment(path: &Path) -> Result<Attachment, Box<dyn std::error::Error>> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::InvalidReceipt(path.display().to_string()))?
        .to_string();
    let data = fs::read(path).map_err(|e| CliError::InvalidReceipt(e.to_string()))?;
    let mime_type = mime_type_for(&file_name);
    Ok(Attachment::new(data, mime_type, file_name)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let data_dir = config
        .storage
        .data_dir
        .unwrap_or_else(|| "books".to_string());
    let store = CsvStore::open(data_dir)?;
    let mut manager = RecordManager::new(store);

    match cli.command {
        Commands::Income { command } => run_income(&mut manager, command)?,
        Commands::Expense { command } => run_expense(&mut manager, command)?,
        Commands::Summary => {
            let summary = manager.summary()?;
            let label = manager.policy().credit_label.clone();
            println!("total income: {}", summary.total_income);
            println!("total expenses: {}", summary.total_expenses);
            println!("remaining balance: {}", summary.remaining_balance);
            println!("{label} income: {}", summary.credit_card_income);
            println!(
                "{label} remaining balance: {}",
                summary.credit_card_remaining_balance
            );
        }
        Commands::Report => {
            for summary in manager.monthly_report()? {
                println!("{}: {}", summary.month.format("%B %Y"), summary.total);
                for expense in &summary.expenses {
                    println!(
                        "  {} | {} | {} ({})",
                        expense.expense_date, expense.item_name, expense.amount, expense.account
                    );
                }
            }
        }
    }

    Ok(())
}

fn run_income(
    manager: &mut RecordManager<CsvStore>,
    command: IncomeCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        IncomeCommands::Add {
            source,
            amount,
            date,
            account,
        } => {
            let income = Income::new(source, amount, date, account)?;
            let id = manager.add_income(income)?;
            println!("recorded income {id}");
        }
        IncomeCommands::List => {
            for income in manager.incomes()? {
                println!(
                    "{} | {} | {} | {} ({})",
                    income.id, income.date, income.source, income.amount, income.account
                );
            }
        }
        IncomeCommands::Show { id } => {
            println!("{}", manager.income(id)?.to_json()?);
        }
        IncomeCommands::Edit {
            id,
            source,
            amount,
            date,
            account,
        } => {
            let existing = manager.income(id)?;
            let replacement = Income::new(
                source.unwrap_or(existing.source),
                amount.unwrap_or(existing.amount),
                date.unwrap_or(existing.date),
                account.unwrap_or(existing.account),
            )?;
            manager.update_income(id, replacement)?;
            println!("updated income {id}");
        }
        IncomeCommands::Remove { id } => {
            manager.remove_income(id)?;
            println!("removed income {id}");
        }
    }
    Ok(())
}

fn run_expense(
    manager: &mut RecordManager<CsvStore>,
    command: ExpenseCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ExpenseCommands::Add {
            item,
            amount,
            account,
            date,
            category,
            custom_category,
            description,
            receipt,
        } => {
            let attachment = receipt.as_deref().map(load_attachment).transpose()?;
            let candidate = Expense::new(
                item,
                amount,
                account,
                date,
                category.parse::<Category>()?,
                custom_category,
                description,
                attachment,
            )?;
            let (id, warning) = manager.add_expense(candidate)?;
            if let Some(warning) = warning {
                eprintln!("warning: {warning}");
            }
            println!("recorded expense {id}");
        }
        ExpenseCommands::List => {
            for expense in manager.expenses()? {
                println!(
                    "{} | {} | {} | {} | {} ({})",
                    expense.id,
                    expense.expense_date,
                    expense.item_name,
                    expense.amount,
                    expense.category,
                    expense.account
                );
            }
        }
        ExpenseCommands::Show { id } => {
            println!("{}", manager.expense(id)?.to_json()?);
        }
        ExpenseCommands::Edit {
            id,
            item,
            amount,
            account,
            date,
            category,
            custom_category,
            description,
            receipt,
        } => {
            let existing = manager.expense(id)?;
            let attachment = receipt.as_deref().map(load_attachment).transpose()?;
            let category = match category {
                Some(label) => label.parse::<Category>()?,
                None => existing.category,
            };
            let replacement = Expense::new(
                item.unwrap_or(existing.item_name),
                amount.unwrap_or(existing.amount),
                account.unwrap_or(existing.account),
                Some(date.unwrap_or(existing.expense_date)),
                category,
                custom_category.or(existing.custom_category),
                description.or(existing.description),
                attachment,
            )?;
            manager.update_expense(id, replacement)?;
            println!("updated expense {id}");
        }
        ExpenseCommands::Remove { id } => {
            manager.remove_expense(id)?;
            println!("removed expense {id}");
        }
        ExpenseCommands::FetchReceipt { id, out } => {
            let attachment = manager.attachment(id)?;
            fs::write(&out, &attachment.data)?;
            println!(
                "wrote {} ({}) to {}",
                attachment.file_name,
                attachment.mime_type,
                out.display()
            );
        }
    }
    Ok(())
}
