//! Business-rule failures reported to clients.
//!
//! The `Display` text of each variant is exactly what follows `1|` in the
//! reply body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::debug;

use crate::reply::ERROR_CODE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Missing parameter {0}")]
    MissingParameter(&'static str),

    #[error("Cart id is invalid")]
    InvalidCartId,

    #[error("Cart id does not exist")]
    UnknownCart,

    #[error("Book quantity is invalid")]
    InvalidBookQuantity,

    #[error("Must add at least one book")]
    NonPositiveQuantity,

    #[error("Book not found")]
    BookNotFound,

    #[error("Invalid client id or password")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Card Expiration date is invalid")]
    InvalidExpirationDate,

    #[error("Invalid card data")]
    InvalidCardData,

    #[error("Cannot checkout empty cart")]
    EmptyCart,

    #[error("Cannot checkout with expired credit card")]
    ExpiredCard,

    #[error("Unable to process payment")]
    PaymentFailed,
}

// Rejections are ordinary replies: status 200, code 1.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        debug!(error = %self, "request rejected");
        (StatusCode::OK, format!("{ERROR_CODE}|{self}")).into_response()
    }
}
