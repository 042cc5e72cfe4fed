use axum::{
    http::StatusCode,
    response::{IntoResponse, Response}
};
use anyhow;
use log::error;

use billsplit::{AppError, LedgerError};

#[derive(Debug)]
pub(crate) enum ServerError {
    NotFound(String),
    BadRequest(String),
    InternalError(anyhow::Error)
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(msg) =>
                (StatusCode::NOT_FOUND, format!("Resource not found: {}", msg)).into_response(),
            Self::BadRequest(msg) =>
                (StatusCode::BAD_REQUEST, format!("Bad request: {}", msg)).into_response(),
            Self::InternalError(err) => {
                error!("request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", err)).into_response()
            }
        }
    }
}

impl From<LedgerError> for ServerError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NoSuchBill(..) | LedgerError::NoSuchExpense { .. } =>
                Self::NotFound(err.to_string()),
            _ => Self::BadRequest(err.to_string())
        }
    }
}

impl From<AppError> for ServerError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Ledger(err) => err.into(),
            AppError::Backend(err) => Self::InternalError(err.into())
        }
    }
}
