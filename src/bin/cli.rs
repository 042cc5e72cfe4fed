use billsplit::{AppConfig, BillBook, Expense, Participant, Amount,
    backend::JsonStore,
    ledger::{BillSummary, ExpenseBreakdown}};

use std::path::PathBuf;
use anyhow::Context;
use chrono::NaiveDate;
use colored::Colorize;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Bills file to operate on, overriding the configuration
    #[clap(short, long, value_parser)]
    file: Option<PathBuf>,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Show every bill with what each person owes
    Summary,
    /// Show the expenses of one bill
    Show(Show),
    /// Create a new, empty bill
    CreateBill(CreateBill),
    /// Add an expense to a bill
    AddExpense(AddExpense),
    /// Replace an expense of a bill
    UpdateExpense(UpdateExpense),
    /// Remove an expense from a bill
    DeleteExpense(DeleteExpense)
}

#[derive(Args, Debug)]
struct Show {
    /// Name of the bill
    #[clap(value_parser)]
    bill: String
}

#[derive(Args, Debug)]
struct CreateBill {
    /// Name of the new bill
    #[clap(value_parser)]
    name: String,

    /// Date of the bill, YYYY-MM-DD; today if not given
    #[clap(short, long, value_parser)]
    date: Option<NaiveDate>,

    /// Who paid
    #[clap(short, long, value_parser)]
    payer: Participant
}

#[derive(Args, Debug)]
struct ExpenseFields {
    /// What was bought
    #[clap(short, long, value_parser)]
    item: String,

    /// Amount before tax
    #[clap(short, long, value_parser)]
    amount: Amount,

    /// Apply the default tax rate
    #[clap(short, long)]
    taxable: bool,

    /// Apply this tax rate (0 to 1); implies --taxable
    #[clap(short='r', long, value_parser)]
    tax_rate: Option<Amount>,

    /// Who shares this expense; repeat for each person
    #[clap(short, long="participant", value_parser, required = true)]
    participants: Vec<Participant>
}

impl ExpenseFields {
    fn to_expense(&self, default_tax_rate: Amount) -> Expense {
        let tax_rate = match (self.tax_rate, self.taxable) {
            (Some(rate), _) => Some(rate),
            (None, true) => Some(default_tax_rate),
            (None, false) => None
        };
        Expense::new(&self.item, self.amount, tax_rate, self.participants.clone())
    }
}

#[derive(Args, Debug)]
struct AddExpense {
    /// Name of the bill
    #[clap(value_parser)]
    bill: String,

    #[clap(flatten)]
    fields: ExpenseFields
}

#[derive(Args, Debug)]
struct UpdateExpense {
    /// Name of the bill
    #[clap(value_parser)]
    bill: String,

    /// Number of the expense, as listed by `show`
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    number: u64,

    #[clap(flatten)]
    fields: ExpenseFields
}

#[derive(Args, Debug)]
struct DeleteExpense {
    /// Name of the bill
    #[clap(value_parser)]
    bill: String,

    /// Number of the expense, as listed by `show`
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    number: u64
}

fn to_index(number: u64) -> usize {
    (number - 1) as usize
}

fn print_owed(participant: &Participant, owed: Amount) {
    let fmt_owed = if owed > 0.0 {
        format!("{:.2}", owed).bright_red()
    } else {
        format!("{:.2}", owed).normal()
    };
    println!("  {}: {}", participant, fmt_owed);
}

fn print_summary(summary: &[BillSummary]) {
    if summary.is_empty() {
        println!("No bills yet");
        return;
    }
    for row in summary {
        println!("{} {} paid by {}: {}",
            row.name.bold(), row.date, row.payer, format!("{:.2}", row.total).green());
        for (participant, owed) in &row.totals {
            print_owed(participant, *owed);
        }
    }
}

fn print_breakdown(name: &str, book: &BillBook<JsonStore>, rows: &[ExpenseBreakdown]) -> anyhow::Result<()> {
    let bill = book.bill(name)?;
    println!("{}: {}, paid by {}", name.bold(), bill.date, bill.payer);

    if rows.is_empty() {
        println!("No expenses on this bill yet");
        return Ok(());
    }
    for (index, row) in rows.iter().enumerate() {
        println!("{}. {}", index + 1, row);
    }

    println!("Total including tax: {}", format!("{:.2}", bill.total()).green());
    for (participant, owed) in bill.participant_totals()? {
        print_owed(&participant, owed);
    }
    return Ok(());
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => AppConfig::read(path)?,
        None => AppConfig::default()
    };
    let path = args.file.unwrap_or(config.storage.bills_file);
    let default_tax_rate = config.defaults.tax_rate;

    let mut book = BillBook::open(JsonStore::new(&path))
        .with_context(|| format!("failed to open bills from {}", path.display()))?;

    match args.action {
        Subcommands::Summary => {
            print_summary(&book.summary()?);
        },
        Subcommands::Show(show) => {
            let rows = book.breakdown(&show.bill)?;
            print_breakdown(&show.bill, &book, &rows)?;
        },
        Subcommands::CreateBill(create) => {
            let date = create.date.unwrap_or_else(|| chrono::Local::now().date_naive());
            if book.create_bill(&create.name, date, create.payer)? {
                println!("Created bill {}", create.name.bold());
            } else {
                println!("Bill {} already exists, left unchanged", create.name.bold());
            }
        },
        Subcommands::AddExpense(add) => {
            let index = book.add_expense(&add.bill, add.fields.to_expense(default_tax_rate))?;
            println!("Added expense {} to {}", index + 1, add.bill.bold());
        },
        Subcommands::UpdateExpense(update) => {
            let expense = update.fields.to_expense(default_tax_rate);
            book.update_expense(&update.bill, to_index(update.number), expense)?;
            println!("Updated expense {} of {}", update.number, update.bill.bold());
        },
        Subcommands::DeleteExpense(delete) => {
            let removed = book.delete_expense(&delete.bill, to_index(delete.number))?;
            println!("Deleted {}", removed);
        }
    }

    return Ok(());
}
