//! Client core for the Tus Libros bookstore service.
//!
//! # Overview
//! Every remote operation is an `Endpoint` value carrying its URL path, HTTP
//! method, declared response shapes and authorization flag. The
//! `TusLibrosClient` facade turns typed arguments into a flat parameter map
//! and hands it, together with the endpoint, to a `Dispatch`
//! implementation.
//!
//! # Design
//! - `Endpoint` is a tagged variant table, not a type hierarchy.
//! - `HttpDispatcher` is the stock `Dispatch`: it builds `HttpRequest`
//!   values and decodes `HttpResponse` values, while a host-supplied
//!   `Transport` does the actual I/O.
//! - A declared service error is an ordinary `Response::Error`; `ApiError`
//!   is reserved for failures to obtain any declared reply.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod params;
pub mod response;
pub mod types;

pub use client::TusLibrosClient;
pub use config::ClientConfig;
pub use dispatch::{Dispatch, HttpDispatcher, Route, Transport};
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::ParameterMap;
pub use response::{RawReply, Response, ResponseShape};
pub use types::{Book, BookQuantity, Cart, CartId, CreditCard};
