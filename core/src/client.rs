//! Typed facade over the Tus Libros endpoints.
//!
//! # Design
//! `TusLibrosClient` holds only its dispatcher and carries no mutable state
//! between calls. Each operation builds a parameter map, picks its
//! `Endpoint` and hands both to `Dispatch::call_endpoint`. Whatever the
//! dispatcher returns, reply or error, reaches the caller untouched.

use crate::dispatch::Dispatch;
use crate::endpoint::Endpoint;
use crate::params;
use crate::response::Response;
use crate::types::{Book, Cart, CartId, CreditCard};

/// One method per bookstore operation, generic over the dispatcher.
#[derive(Debug, Clone)]
pub struct TusLibrosClient<D> {
    dispatcher: D,
}

impl<D: Dispatch> TusLibrosClient<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Reply is `CartCreated` or `Error`.
    pub async fn create_cart(&self, client_id: &str, password: &str) -> Result<Response, D::Error> {
        self.dispatcher
            .call_endpoint(Endpoint::CreateCart, params::create_cart(client_id, password))
            .await
    }

    /// Reply is `CartContents` or `Error`.
    pub async fn list_cart(&self, cart_id: &CartId) -> Result<Response, D::Error> {
        self.dispatcher
            .call_endpoint(Endpoint::ListCart, params::list_cart(cart_id))
            .await
    }

    /// Reply is `Ack` or `Error`.
    pub async fn add_to_cart(&self, book: &Book, quantity: u32, cart: &Cart) -> Result<Response, D::Error> {
        self.dispatcher
            .call_endpoint(Endpoint::AddToCart, params::add_to_cart(book, quantity, cart))
            .await
    }

    /// Reply is `SuccessfulCheckout` or `Error`.
    pub async fn checkout(&self, card: &CreditCard, cart: &Cart) -> Result<Response, D::Error> {
        self.dispatcher
            .call_endpoint(Endpoint::CheckoutCart, params::checkout(card, cart))
            .await
    }

    /// Reply is `Purchases` or `Error`.
    pub async fn list_purchases(&self, client_id: &str, password: &str) -> Result<Response, D::Error> {
        self.dispatcher
            .call_endpoint(Endpoint::ListPurchases, params::list_purchases(client_id, password))
            .await
    }
}
