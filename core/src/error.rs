//! Error types for the Tus Libros client.
//!
//! # Design
//! A declared error shape (`Response::Error`) is a normal reply from the
//! service and never shows up here. `ApiError` covers only the cases where
//! the dispatcher could not produce any declared shape at all.

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Errors returned by `HttpDispatcher` and `Transport` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The route requires a session but no token was configured.
    #[error("{0} requires a session token")]
    MissingSession(&'static str),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The reply discriminator matches none of the endpoint's shapes.
    #[error("endpoint {endpoint} does not declare a response with code {code:?}")]
    UndeclaredShape { endpoint: Endpoint, code: String },

    /// The payload does not fit the shape its discriminator selected.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The parameters could not be encoded into a request.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
