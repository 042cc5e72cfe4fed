mod interface;
pub mod json_store;

pub use interface::{BillStore, Result, BackendError};
pub use json_store::JsonStore;
