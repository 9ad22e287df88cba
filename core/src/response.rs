//! Response shapes and the reply codec.
//!
//! # Design
//! The service answers every operation with HTTP 200 and a body of the form
//! `<code>|<payload>`, where code `0` means success and `1` means a declared
//! error. `ResponseShape` identifies how a payload is read; an endpoint
//! lists the shapes it accepts and the dispatcher picks the first one whose
//! discriminator equals the reply code.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::{BookQuantity, CartId};

const SEPARATOR: char = '|';
const SUCCESS_CODE: &str = "0";
const ERROR_CODE: &str = "1";

/// Identifier of a payload interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseShape {
    CartCreated,
    CartContents,
    Ack,
    SuccessfulCheckout,
    Purchases,
    Error,
}

/// A decoded reply: one instance of a `ResponseShape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Response {
    CartCreated { cart_id: CartId },
    CartContents { items: Vec<BookQuantity> },
    Ack,
    SuccessfulCheckout { transaction_id: String },
    Purchases { items: Vec<BookQuantity>, total: u64 },
    Error { message: String },
}

impl Response {
    pub const fn shape(&self) -> ResponseShape {
        match self {
            Response::CartCreated { .. } => ResponseShape::CartCreated,
            Response::CartContents { .. } => ResponseShape::CartContents,
            Response::Ack => ResponseShape::Ack,
            Response::SuccessfulCheckout { .. } => ResponseShape::SuccessfulCheckout,
            Response::Purchases { .. } => ResponseShape::Purchases,
            Response::Error { .. } => ResponseShape::Error,
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Response::Error { message } => Some(message),
            _ => None,
        }
    }
}

impl ResponseShape {
    /// Reply code that selects this shape.
    pub const fn discriminator(self) -> &'static str {
        match self {
            ResponseShape::Error => ERROR_CODE,
            ResponseShape::CartCreated
            | ResponseShape::CartContents
            | ResponseShape::Ack
            | ResponseShape::SuccessfulCheckout
            | ResponseShape::Purchases => SUCCESS_CODE,
        }
    }

    /// First shape in `declared` whose discriminator equals `code`.
    pub fn select(declared: &[ResponseShape], code: &str) -> Option<ResponseShape> {
        declared.iter().copied().find(|shape| shape.discriminator() == code)
    }

    /// Read `payload` as an instance of this shape.
    pub fn decode(self, payload: &str) -> Result<Response, ApiError> {
        match self {
            ResponseShape::CartCreated => Ok(Response::CartCreated {
                cart_id: CartId::new(non_empty(payload, "cart id")?),
            }),
            ResponseShape::CartContents => {
                let fields = fields(payload);
                Ok(Response::CartContents {
                    items: book_quantities(&fields)?,
                })
            }
            ResponseShape::Ack => Ok(Response::Ack),
            ResponseShape::SuccessfulCheckout => Ok(Response::SuccessfulCheckout {
                transaction_id: non_empty(payload, "transaction id")?.to_string(),
            }),
            ResponseShape::Purchases => {
                let fields = fields(payload);
                let Some((total, items)) = fields.split_last() else {
                    return Err(ApiError::Deserialization("purchases reply has no total".to_string()));
                };
                let total = total
                    .parse()
                    .map_err(|e| ApiError::Deserialization(format!("purchases total {total:?}: {e}")))?;
                Ok(Response::Purchases {
                    items: book_quantities(items)?,
                    total,
                })
            }
            ResponseShape::Error => Ok(Response::Error {
                message: payload.to_string(),
            }),
        }
    }
}

/// A reply body split into its discriminator and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReply<'a> {
    pub code: &'a str,
    pub payload: &'a str,
}

impl<'a> RawReply<'a> {
    /// Split at the first separator. A body without one is all code.
    pub fn parse(body: &'a str) -> Self {
        match body.split_once(SEPARATOR) {
            Some((code, payload)) => Self { code, payload },
            None => Self { code: body, payload: "" },
        }
    }
}

fn fields(payload: &str) -> Vec<&str> {
    if payload.is_empty() {
        Vec::new()
    } else {
        payload.split(SEPARATOR).collect()
    }
}

fn non_empty<'a>(payload: &'a str, what: &str) -> Result<&'a str, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::Deserialization(format!("empty {what}")));
    }
    Ok(payload)
}

fn book_quantities(fields: &[&str]) -> Result<Vec<BookQuantity>, ApiError> {
    if fields.len() % 2 != 0 {
        return Err(ApiError::Deserialization(format!(
            "expected isbn/quantity pairs, got {} fields",
            fields.len()
        )));
    }
    fields
        .chunks_exact(2)
        .map(|pair| {
            let quantity = pair[1]
                .parse()
                .map_err(|e| ApiError::Deserialization(format!("quantity {:?} for {}: {e}", pair[1], pair[0])))?;
            Ok::<_, ApiError>(BookQuantity::new(pair[0], quantity))
        })
        .collect()
}
