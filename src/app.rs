//! The application state shared by the front-ends: every bill in memory plus
//! the place they are saved to. Every change is saved straight away.

use chrono::NaiveDate;
use log::{info, warn};
use thiserror::Error;

use crate::backend::{BillStore, BackendError};
use crate::core::{Bill, Expense, Participant, Store, LedgerError, LedgerResult};
use crate::core::ledger::{self, BillSummary, ExpenseBreakdown};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Backend(#[from] BackendError)
}

pub type AppResult<T> = Result<T, AppError>;

pub struct BillBook<S: BillStore> {
    store: S,
    bills: Store
}

impl<S: BillStore> BillBook<S> {
    /// Loads whatever `store` holds.
    pub fn open(store: S) -> AppResult<BillBook<S>> {
        let bills = store.load()?;
        return Ok(BillBook { store, bills });
    }

    pub fn bills(&self) -> &Store {
        &self.bills
    }

    pub fn bill(&self, name: &str) -> LedgerResult<&Bill> {
        self.bills.get(name)
            .ok_or_else(|| LedgerError::NoSuchBill(name.to_owned()))
    }

    fn bill_mut(&mut self, name: &str) -> LedgerResult<&mut Bill> {
        self.bills.get_mut(name)
            .ok_or_else(|| LedgerError::NoSuchBill(name.to_owned()))
    }

    fn save(&self) -> AppResult<()> {
        self.store.save(&self.bills)?;
        return Ok(());
    }

    /// Creates an empty bill. Returns `false` without touching anything
    /// when a bill with that name already exists.
    pub fn create_bill(&mut self, name: &str, date: NaiveDate, payer: Participant) -> AppResult<bool> {
        if name.is_empty() {
            return Err(LedgerError::EmptyField("name").into());
        }
        if self.bills.contains_key(name) {
            warn!("bill '{}' already exists, not creating it again", name);
            return Ok(false);
        }

        self.bills.insert(name.to_owned(), Bill::new(date, payer));
        self.save()?;
        info!("created bill '{}' paid by {}", name, payer);
        return Ok(true);
    }

    /// Appends an expense and returns its index in the bill.
    pub fn add_expense(&mut self, bill_name: &str, expense: Expense) -> AppResult<usize> {
        expense.validate()?;
        if expense.amount == 0.0 {
            return Err(LedgerError::ZeroAmount.into());
        }

        let bill = self.bill_mut(bill_name)?;
        bill.expenses.push(expense);
        let index = bill.expenses.len() - 1;
        self.save()?;
        info!("added expense {} to bill '{}'", index, bill_name);
        return Ok(index);
    }

    pub fn update_expense(&mut self, bill_name: &str, index: usize, expense: Expense) -> AppResult<()> {
        expense.validate()?;

        let bill = self.bill_mut(bill_name)?;
        let slot = bill.expenses.get_mut(index)
            .ok_or_else(|| LedgerError::NoSuchExpense { bill: bill_name.to_owned(), index })?;
        *slot = expense;
        self.save()?;
        info!("updated expense {} of bill '{}'", index, bill_name);
        return Ok(());
    }

    /// Removes an expense, shifting the ones after it down by one.
    pub fn delete_expense(&mut self, bill_name: &str, index: usize) -> AppResult<Expense> {
        let bill = self.bill_mut(bill_name)?;
        if index >= bill.expenses.len() {
            return Err(LedgerError::NoSuchExpense { bill: bill_name.to_owned(), index }.into());
        }
        let removed = bill.expenses.remove(index);
        self.save()?;
        info!("deleted expense {} of bill '{}'", index, bill_name);
        return Ok(removed);
    }

    pub fn summary(&self) -> LedgerResult<Vec<BillSummary>> {
        ledger::store_summary(&self.bills)
    }

    pub fn breakdown(&self, bill_name: &str) -> LedgerResult<Vec<ExpenseBreakdown>> {
        ledger::bill_breakdown(self.bill(bill_name)?)
    }
}


#[cfg(test)]
mod tests {
    use crate::app::{AppError, BillBook};
    use crate::backend::{BillStore, BackendError, JsonStore};
    use crate::core::{Expense, LedgerError};
    use crate::core::Participant::*;

    use std::fs;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 14).unwrap()
    }

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn open(dir: &TempDir) -> BillBook<JsonStore> {
        BillBook::open(JsonStore::new(dir.path().join("bills.json"))).unwrap()
    }

    fn on_disk(dir: &TempDir) -> crate::core::Store {
        JsonStore::new(dir.path().join("bills.json")).load().unwrap()
    }

    #[fixture]
    fn dinner() -> Expense {
        Expense::new("dinner", 100.0, Some(0.08375), vec![Leo, Yihua])
    }

    #[rstest]
    fn create_bill_persists(dir: TempDir) {
        let mut book = open(&dir);

        assert!(book.create_bill("hotpot", date(), Cyclone).unwrap());

        let saved = on_disk(&dir);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved["hotpot"].payer, Cyclone);
        assert!(saved["hotpot"].expenses.is_empty());
    }

    #[rstest]
    fn duplicate_bill_is_skipped(dir: TempDir, dinner: Expense) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Cyclone).unwrap();
        book.add_expense("hotpot", dinner.clone()).unwrap();
        let before = book.bills().clone();

        let other_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(!book.create_bill("hotpot", other_date, Vicky).unwrap());

        assert_eq!(book.bills(), &before);
        assert_eq!(on_disk(&dir), before);
        assert_eq!(book.bill("hotpot").unwrap().expenses, vec![dinner]);
    }

    #[rstest]
    fn blank_bill_name(dir: TempDir) {
        let mut book = open(&dir);
        let res = book.create_bill("", date(), Leo);
        assert!(matches!(res, Err(AppError::Ledger(LedgerError::EmptyField("name")))));
        assert!(book.bills().is_empty());
        assert!(!dir.path().join("bills.json").exists());
    }

    #[rstest]
    fn expense_lifecycle(dir: TempDir, dinner: Expense) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Leo).unwrap();

        assert_eq!(book.add_expense("hotpot", dinner.clone()).unwrap(), 0);
        let drinks = Expense::new("drinks", 30.0, None, vec![Vicky, Cyclone]);
        assert_eq!(book.add_expense("hotpot", drinks.clone()).unwrap(), 1);
        assert_eq!(on_disk(&dir)["hotpot"].expenses, vec![dinner.clone(), drinks.clone()]);

        let cheaper = Expense::new("drinks", 24.0, None, vec![Vicky, Cyclone, Yihua]);
        book.update_expense("hotpot", 1, cheaper.clone()).unwrap();
        assert_eq!(on_disk(&dir)["hotpot"].expenses[1], cheaper);

        let removed = book.delete_expense("hotpot", 0).unwrap();
        assert_eq!(removed, dinner);
        assert_eq!(on_disk(&dir)["hotpot"].expenses, vec![cheaper]);
    }

    #[rstest]
    fn reopen_sees_saved_state(dir: TempDir, dinner: Expense) {
        {
            let mut book = open(&dir);
            book.create_bill("b", date(), Leo).unwrap();
            book.create_bill("a", date(), Leo).unwrap();
            book.add_expense("a", dinner).unwrap();
        }

        let book = open(&dir);
        let names: Vec<_> = book.bills().keys().collect();
        assert_eq!(names, vec!["b", "a"]);

        let summary = book.summary().unwrap();
        assert!((summary[1].total - 108.375).abs() < 1e-9);
        assert!((summary[1].totals[&Yihua] - 54.1875).abs() < 1e-9);
    }

    #[rstest]
    #[case(Expense::new("", 10.0, None, vec![Leo]), LedgerError::EmptyField("item"))]
    #[case(Expense::new("gum", 0.0, None, vec![Leo]), LedgerError::ZeroAmount)]
    #[case(Expense::new("gum", 1.0, None, vec![]), LedgerError::NoParticipants { item: "gum".to_owned() })]
    fn rejected_expenses(dir: TempDir, #[case] expense: Expense, #[case] expected: LedgerError) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Leo).unwrap();

        let res = book.add_expense("hotpot", expense);
        match res {
            Err(AppError::Ledger(err)) => assert_eq!(err, expected),
            other => panic!("unexpected result {:?}", other)
        }
        assert!(book.bill("hotpot").unwrap().expenses.is_empty());
        assert!(on_disk(&dir)["hotpot"].expenses.is_empty());
    }

    #[rstest]
    #[case(Expense::new("", 10.0, None, vec![Leo]), LedgerError::EmptyField("item"))]
    #[case(Expense::new("gum", 1.0, None, vec![]), LedgerError::NoParticipants { item: "gum".to_owned() })]
    #[case(Expense::new("gum", 1.0, Some(1.5), vec![Leo]), LedgerError::InvalidTaxRate(1.5))]
    #[case(Expense::new("gum", -2.0, None, vec![Leo]), LedgerError::InvalidAmount(-2.0))]
    fn rejected_updates(dir: TempDir, dinner: Expense, #[case] expense: Expense, #[case] expected: LedgerError) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Leo).unwrap();
        book.add_expense("hotpot", dinner.clone()).unwrap();

        let res = book.update_expense("hotpot", 0, expense);
        match res {
            Err(AppError::Ledger(err)) => assert_eq!(err, expected),
            other => panic!("unexpected result {:?}", other)
        }
        assert_eq!(book.bill("hotpot").unwrap().expenses, vec![dinner.clone()]);
        assert_eq!(on_disk(&dir)["hotpot"].expenses, vec![dinner]);
    }

    #[rstest]
    fn non_finite_tax_rate_is_not_saved(dir: TempDir, dinner: Expense) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Leo).unwrap();

        let mut broken = Expense::new("gum", 10.0, None, vec![Leo]);
        broken.tax_rate = f64::NAN;
        let res = book.add_expense("hotpot", broken.clone());
        assert!(matches!(res, Err(AppError::Ledger(LedgerError::InvalidTaxRate(..)))));

        book.add_expense("hotpot", dinner.clone()).unwrap();
        let res = book.update_expense("hotpot", 0, broken);
        assert!(matches!(res, Err(AppError::Ledger(LedgerError::InvalidTaxRate(..)))));

        let reopened = open(&dir);
        assert_eq!(reopened.bill("hotpot").unwrap().expenses, vec![dinner]);
    }

    #[rstest]
    fn whitespace_bill_name_is_accepted(dir: TempDir) {
        let mut book = open(&dir);
        assert!(book.create_bill(" ", date(), Leo).unwrap());
        assert!(on_disk(&dir).contains_key(" "));
    }

    #[rstest]
    fn update_allows_zero_amount(dir: TempDir, dinner: Expense) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Leo).unwrap();
        book.add_expense("hotpot", dinner).unwrap();

        let free = Expense::new("dinner", 0.0, None, vec![Leo]);
        book.update_expense("hotpot", 0, free).unwrap();
        assert_eq!(book.bill("hotpot").unwrap().total(), 0.0);
    }

    #[rstest]
    fn unknown_bill_and_index(dir: TempDir, dinner: Expense) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Leo).unwrap();

        let res = book.add_expense("bbq", dinner.clone());
        assert!(matches!(res, Err(AppError::Ledger(LedgerError::NoSuchBill(name))) if name == "bbq"));

        let res = book.update_expense("hotpot", 0, dinner);
        assert!(matches!(res, Err(AppError::Ledger(LedgerError::NoSuchExpense { index: 0, .. }))));

        let res = book.delete_expense("hotpot", 3);
        assert!(matches!(res, Err(AppError::Ledger(LedgerError::NoSuchExpense { index: 3, .. }))));

        assert!(book.breakdown("bbq").is_err());
    }

    #[rstest]
    fn failed_save_keeps_memory_ahead(dir: TempDir, dinner: Expense) {
        let path = dir.path().join("bills.json");
        let mut book = BillBook::open(JsonStore::new(&path)).unwrap();
        book.create_bill("hotpot", date(), Leo).unwrap();

        // replace the file with a directory so the next write fails
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let res = book.add_expense("hotpot", dinner.clone());
        assert!(matches!(res, Err(AppError::Backend(BackendError::Io { .. }))));
        assert_eq!(book.bill("hotpot").unwrap().expenses, vec![dinner]);
    }

    #[rstest]
    fn malformed_file_fails_open(dir: TempDir) {
        fs::write(dir.path().join("bills.json"), "{ broken").unwrap();
        let res = BillBook::open(JsonStore::new(dir.path().join("bills.json")));
        assert!(matches!(res, Err(AppError::Backend(BackendError::Parse { .. }))));
    }

    #[rstest]
    fn breakdown_of_bill(dir: TempDir, dinner: Expense) {
        let mut book = open(&dir);
        book.create_bill("hotpot", date(), Leo).unwrap();
        book.add_expense("hotpot", dinner).unwrap();

        let rows = book.breakdown("hotpot").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].shares[&Vicky], 0.0);
        assert!((rows[0].shares[&Leo] - 54.1875).abs() < 1e-9);
    }
}
