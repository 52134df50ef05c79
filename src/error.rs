//! Error taxonomy for the ledger core and its HTTP mapping.
//!
//! Domain variants carry messages that are safe to show to callers. Storage
//! and conversion failures render as a generic message; the detail goes to
//! the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing request fields, duplicate unique keys.
    #[error("{0}")]
    Validation(String),

    /// A balance precondition failed.
    #[error("{0}")]
    InsufficientFunds(&'static str),

    /// A referenced account, trader, or transaction does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The account already holds an allocation for this trader.
    #[error("already mirroring this strategist")]
    AlreadyFollowing,

    /// The transaction has reached a terminal status.
    #[error("transaction already processed")]
    AlreadyProcessed,

    /// Refusing to remove the only remaining admin account.
    #[error("cannot delete the only remaining admin")]
    LastAdminProtection,

    /// Missing, expired, or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role.
    #[error("{0}")]
    Forbidden(&'static str),

    /// A non-critical external collaborator failed.
    #[error("upstream service failure: {0}")]
    Upstream(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value (amount, timestamp) failed to parse back.
    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InsufficientFunds(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AlreadyFollowing | Error::AlreadyProcessed | Error::LastAdminProtection => {
                StatusCode::CONFLICT
            }
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Database(_) | Error::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message rendered to the caller. Internal failures are masked.
    fn public_message(&self) -> String {
        match self {
            Error::Database(_) | Error::Corrupt(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let err = Error::Corrupt("wallet_balance for acct-1: xyz".to_string());
        assert_eq!(err.public_message(), "internal server error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_surface_their_message() {
        let err = Error::InsufficientFunds("insufficient wallet balance");
        assert_eq!(err.public_message(), "insufficient wallet balance");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        assert_eq!(Error::AlreadyFollowing.status(), StatusCode::CONFLICT);
        assert_eq!(Error::NotFound("trader").to_string(), "trader not found");
    }
}
