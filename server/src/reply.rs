//! Successful replies in the `0|<payload>` body format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const SUCCESS_CODE: &str = "0";
pub const ERROR_CODE: &str = "1";
pub const SEPARATOR: &str = "|";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success(pub String);

impl Success {
    pub fn ok() -> Self {
        Self("OK".to_string())
    }

    pub fn body(&self) -> String {
        format!("{SUCCESS_CODE}{SEPARATOR}{}", self.0)
    }
}

impl IntoResponse for Success {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.body()).into_response()
    }
}

/// `isbn|qty|isbn|qty…`, empty for no books.
pub fn book_list(books: &[(String, u32)]) -> String {
    books
        .iter()
        .map(|(isbn, quantity)| format!("{isbn}{SEPARATOR}{quantity}"))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Book list followed by the total, or just the total when nothing was bought.
pub fn purchases(books: &[(String, u32)], total: u64) -> String {
    if books.is_empty() {
        return total.to_string();
    }
    format!("{}{SEPARATOR}{total}", book_list(books))
}
