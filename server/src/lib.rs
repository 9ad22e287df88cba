//! HTTP service for the Tus Libros bookstore.
//!
//! # Design
//! Every operation is a GET whose parameters arrive in the query string.
//! Replies are always HTTP 200 with a `0|<payload>` or `1|<message>` body,
//! so business failures travel as data rather than status codes.

pub mod auth;
pub mod calendar;
pub mod cart;
pub mod cashier;
pub mod config;
pub mod error;
pub mod reply;
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;
use uuid::Uuid;

use crate::calendar::MonthOfYear;

pub use config::ServerConfig;
pub use error::StoreError;
pub use reply::Success;
pub use store::Bookstore;

pub type SharedStore = Arc<Mutex<Bookstore>>;

type Params = Query<HashMap<String, String>>;

pub fn app(store: Bookstore) -> Router {
    let store: SharedStore = Arc::new(Mutex::new(store));
    Router::new()
        .route("/createCart", get(create_cart))
        .route("/addToCart", get(add_to_cart))
        .route("/listCart", get(list_cart))
        .route("/checkOutCart", get(checkout_cart))
        .route("/listPurchases", get(list_purchases))
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: Bookstore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

fn param<'a>(params: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str, StoreError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or(StoreError::MissingParameter(name))
}

fn cart_id(params: &HashMap<String, String>) -> Result<Uuid, StoreError> {
    Uuid::parse_str(param(params, "cartId")?).map_err(|_| StoreError::InvalidCartId)
}

// Negative counts clamp to zero so the cart reports them as too few books.
fn book_quantity(params: &HashMap<String, String>) -> Result<u32, StoreError> {
    let quantity: i64 = param(params, "bookQuantity")?
        .parse()
        .map_err(|_| StoreError::InvalidBookQuantity)?;
    u32::try_from(quantity.max(0)).map_err(|_| StoreError::InvalidBookQuantity)
}

async fn create_cart(State(store): State<SharedStore>, Query(params): Params) -> Result<Success, StoreError> {
    let client_id = param(&params, "clientId")?;
    let password = param(&params, "password")?;
    let cart_id = store.lock().await.create_cart(client_id, password)?;
    info!(client_id, %cart_id, "cart created");
    Ok(Success(cart_id.to_string()))
}

async fn add_to_cart(State(store): State<SharedStore>, Query(params): Params) -> Result<Success, StoreError> {
    let quantity = book_quantity(&params)?;
    let isbn = param(&params, "bookIsbn")?;
    let cart_id = cart_id(&params)?;
    store.lock().await.add_to_cart(cart_id, isbn, quantity)?;
    info!(%cart_id, isbn, quantity, "book added");
    Ok(Success::ok())
}

async fn list_cart(State(store): State<SharedStore>, Query(params): Params) -> Result<Success, StoreError> {
    let cart_id = cart_id(&params)?;
    let books = store.lock().await.list_cart(cart_id)?;
    info!(%cart_id, titles = books.len(), "cart listed");
    Ok(Success(reply::book_list(&books)))
}

async fn checkout_cart(State(store): State<SharedStore>, Query(params): Params) -> Result<Success, StoreError> {
    let cart_id = cart_id(&params)?;
    let expiry: MonthOfYear = param(&params, "cced")?.parse()?;
    let number = param(&params, "ccn")?;
    let owner = param(&params, "cco")?;
    let transaction_id = store.lock().await.checkout_cart(cart_id, number, expiry, owner)?;
    info!(%cart_id, %transaction_id, "cart checked out");
    Ok(Success(transaction_id.to_string()))
}

async fn list_purchases(State(store): State<SharedStore>, Query(params): Params) -> Result<Success, StoreError> {
    let client_id = param(&params, "clientId")?;
    let password = param(&params, "password")?;
    let summary = store.lock().await.list_purchases(client_id, password)?;
    info!(client_id, total = summary.total, "purchases listed");
    Ok(Success(reply::purchases(&summary.books, summary.total)))
}
