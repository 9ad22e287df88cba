//! Domain values the facade flattens into request parameters.
//!
//! # Design
//! These mirror the service's vocabulary but carry no validation: the
//! service is the authority on what a valid card or cart id looks like.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque cart identifier issued by `createCart`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub String);

impl CartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CartId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CartId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
}

impl Book {
    pub fn new(isbn: impl Into<String>) -> Self {
        Self { isbn: isbn.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
}

impl Cart {
    pub fn new(id: impl Into<CartId>) -> Self {
        Self { id: id.into() }
    }
}

/// Payment card as entered by the buyer. `expiry` is sent verbatim; the
/// service expects `MMYYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub number: String,
    pub expiry: String,
    pub name: String,
}

/// One line of a cart or purchase summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookQuantity {
    pub isbn: String,
    pub quantity: u32,
}

impl BookQuantity {
    pub fn new(isbn: impl Into<String>, quantity: u32) -> Self {
        Self {
            isbn: isbn.into(),
            quantity,
        }
    }
}
