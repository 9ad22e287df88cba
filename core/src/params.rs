//! Per-operation parameter maps.
//!
//! Each builder renames and flattens typed arguments into the flat,
//! string-keyed map the service reads from the query string. No validation
//! happens here.

use std::collections::BTreeMap;

use crate::types::{Book, Cart, CartId, CreditCard};

pub type ParameterMap = BTreeMap<String, String>;

fn map<const N: usize>(pairs: [(&str, &str); N]) -> ParameterMap {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn credentials(client_id: &str, password: &str) -> ParameterMap {
    map([("clientId", client_id), ("password", password)])
}

pub fn create_cart(client_id: &str, password: &str) -> ParameterMap {
    credentials(client_id, password)
}

pub fn list_cart(cart_id: &CartId) -> ParameterMap {
    map([("cartId", cart_id.as_str())])
}

pub fn add_to_cart(book: &Book, quantity: u32, cart: &Cart) -> ParameterMap {
    let quantity = quantity.to_string();
    map([
        ("bookIsbn", book.isbn.as_str()),
        ("bookQuantity", quantity.as_str()),
        ("cartId", cart.id.as_str()),
    ])
}

pub fn checkout(card: &CreditCard, cart: &Cart) -> ParameterMap {
    map([
        ("cartId", cart.id.as_str()),
        ("ccn", card.number.as_str()),
        ("cced", card.expiry.as_str()),
        ("cco", card.name.as_str()),
    ])
}

pub fn list_purchases(client_id: &str, password: &str) -> ParameterMap {
    credentials(client_id, password)
}
