mod error;
use error::ServerError;

use std::{path::PathBuf, sync::{Arc, Mutex, MutexGuard}};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router
};
use chrono::NaiveDate;
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};

use billsplit::{AppConfig, Amount, BillBook, Expense, Participant, ParticipantTotals,
    backend::JsonStore,
    ledger::{BillSummary, ExpenseBreakdown}};

#[derive(Parser, Debug)]
#[clap(version, about = "Serve bills over HTTP")]
struct Args {
    /// Configuration file
    #[clap(value_parser)]
    config: Option<PathBuf>
}

struct AppState {
    book: Mutex<BillBook<JsonStore>>,
    default_tax_rate: Amount
}

type SharedState = Arc<AppState>;

impl AppState {
    fn book(&self) -> Result<MutexGuard<'_, BillBook<JsonStore>>, ServerError> {
        self.book.lock()
            .map_err(|_| ServerError::InternalError(anyhow::anyhow!("bill book lock poisoned")))
    }
}

#[derive(Debug, Deserialize)]
struct NewBill {
    name: String,
    date: Option<NaiveDate>,
    payer: Participant
}

#[derive(Debug, Serialize, Deserialize)]
struct Created {
    created: bool
}

#[derive(Debug, Deserialize)]
struct ExpenseForm {
    item: String,
    amount: Amount,
    #[serde(default)]
    is_taxable: bool,
    tax_rate: Option<Amount>,
    participants: Vec<Participant>
}

impl ExpenseForm {
    fn into_expense(self, default_tax_rate: Amount) -> Expense {
        let tax_rate = if self.is_taxable {
            Some(self.tax_rate.unwrap_or(default_tax_rate))
        } else {
            None
        };
        Expense::new(&self.item, self.amount, tax_rate, self.participants)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AddedExpense {
    index: usize
}

#[derive(Debug, Serialize)]
struct BillDetail {
    name: String,
    date: NaiveDate,
    payer: Participant,
    total: Amount,
    totals: ParticipantTotals,
    expenses: Vec<ExpenseBreakdown>
}

async fn list_bills(State(state): State<SharedState>) -> Result<Json<Vec<BillSummary>>, ServerError> {
    let book = state.book()?;
    Ok(Json(book.summary()?))
}

async fn create_bill(State(state): State<SharedState>, Json(form): Json<NewBill>)
    -> Result<(StatusCode, Json<Created>), ServerError>
{
    let date = form.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let created = state.book()?.create_bill(&form.name, date, form.payer)?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(Created { created })))
}

async fn show_bill(State(state): State<SharedState>, Path(name): Path<String>) -> Result<Json<BillDetail>, ServerError> {
    let book = state.book()?;
    let bill = book.bill(&name)?;
    Ok(Json(BillDetail {
        name: name.clone(),
        date: bill.date,
        payer: bill.payer,
        total: bill.total(),
        totals: bill.participant_totals()?,
        expenses: book.breakdown(&name)?
    }))
}

async fn add_expense(State(state): State<SharedState>, Path(name): Path<String>, Json(form): Json<ExpenseForm>)
    -> Result<(StatusCode, Json<AddedExpense>), ServerError>
{
    let expense = form.into_expense(state.default_tax_rate);
    let index = state.book()?.add_expense(&name, expense)?;
    Ok((StatusCode::CREATED, Json(AddedExpense { index })))
}

async fn update_expense(State(state): State<SharedState>, Path((name, index)): Path<(String, usize)>, Json(form): Json<ExpenseForm>)
    -> Result<StatusCode, ServerError>
{
    let expense = form.into_expense(state.default_tax_rate);
    state.book()?.update_expense(&name, index, expense)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_expense(State(state): State<SharedState>, Path((name, index)): Path<(String, usize)>)
    -> Result<Json<Expense>, ServerError>
{
    let removed = state.book()?.delete_expense(&name, index)?;
    Ok(Json(removed))
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/bills", get(list_bills).post(create_bill))
        .route("/bills/:name", get(show_bill))
        .route("/bills/:name/expenses", axum::routing::post(add_expense))
        .route("/bills/:name/expenses/:index", put(update_expense).delete(delete_expense))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::read(path)?,
        None => AppConfig::default()
    };

    let book = BillBook::open(JsonStore::new(&config.storage.bills_file))
        .with_context(|| format!("failed to open bills from {}", config.storage.bills_file.display()))?;
    let state = Arc::new(AppState {
        book: Mutex::new(book),
        default_tax_rate: config.defaults.tax_rate
    });

    let listener = tokio::net::TcpListener::bind(config.server.address).await
        .with_context(|| format!("failed to bind {}", config.server.address))?;
    info!("serving bills from {} on {}", config.storage.bills_file.display(), config.server.address);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
