//! Endpoint registry for the Tus Libros service.
//!
//! # Design
//! Each remote operation is a variant of `Endpoint`. Its URL path, HTTP
//! method, declared response shapes and authorization flag are fixed by a
//! `match` over the variant, so one dispatch routine serves every operation
//! without per-endpoint types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;
use crate::response::ResponseShape;

/// One remote operation of the bookstore service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    CreateCart,
    ListCart,
    AddToCart,
    CheckoutCart,
    ListPurchases,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::CreateCart,
        Endpoint::ListCart,
        Endpoint::AddToCart,
        Endpoint::CheckoutCart,
        Endpoint::ListPurchases,
    ];

    /// Path relative to the service base URL, without a leading slash.
    pub const fn url_path(self) -> &'static str {
        match self {
            Endpoint::CreateCart => "createCart",
            Endpoint::ListCart => "listCart",
            Endpoint::AddToCart => "addToCart",
            Endpoint::CheckoutCart => "checkOutCart",
            Endpoint::ListPurchases => "listPurchases",
        }
    }

    /// The service routes every operation as a GET with query parameters.
    pub const fn http_method(self) -> HttpMethod {
        HttpMethod::Get
    }

    /// Shapes this endpoint may reply with, in matching priority order.
    pub const fn response_shapes(self) -> &'static [ResponseShape] {
        match self {
            Endpoint::CreateCart => &[ResponseShape::CartCreated, ResponseShape::Error],
            Endpoint::ListCart => &[ResponseShape::CartContents, ResponseShape::Error],
            Endpoint::AddToCart => &[ResponseShape::Ack, ResponseShape::Error],
            Endpoint::CheckoutCart => &[ResponseShape::SuccessfulCheckout, ResponseShape::Error],
            Endpoint::ListPurchases => &[ResponseShape::Purchases, ResponseShape::Error],
        }
    }

    // None of the operations is session-guarded yet, including checkout
    // and list purchases.
    pub const fn requires_auth(self) -> bool {
        match self {
            Endpoint::CreateCart
            | Endpoint::ListCart
            | Endpoint::AddToCart
            | Endpoint::CheckoutCart
            | Endpoint::ListPurchases => false,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url_path())
    }
}
