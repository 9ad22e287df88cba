//! The generic call-dispatch contract and its HTTP implementation.
//!
//! # Design
//! `Dispatch` is the single seam the facade talks to: an endpoint plus a
//! parameter map in, one of the endpoint's declared response shapes out.
//! `HttpDispatcher` implements it over a host-supplied `Transport`, so the
//! crate builds requests and decodes replies but never opens a socket.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::ParameterMap;
use crate::response::{RawReply, Response, ResponseShape};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Turns an endpoint and its parameters into one of the endpoint's
/// declared responses.
#[async_trait]
pub trait Dispatch: Send + Sync {
    type Error: Send;

    async fn call_endpoint(&self, endpoint: Endpoint, params: ParameterMap) -> Result<Response, Self::Error>;
}

/// Executes a plain-data HTTP request. Implemented by the host.
///
/// Non-2xx statuses must come back as `Ok` responses so the dispatcher can
/// interpret them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Where and how a call is sent: the transport-facing half of an `Endpoint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub method: HttpMethod,
    pub requires_auth: bool,
}

impl From<Endpoint> for Route {
    fn from(endpoint: Endpoint) -> Self {
        Self {
            path: endpoint.url_path(),
            method: endpoint.http_method(),
            requires_auth: endpoint.requires_auth(),
        }
    }
}

/// `Dispatch` over HTTP using the service's `<code>|<payload>` replies.
#[derive(Debug, Clone)]
pub struct HttpDispatcher<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> HttpDispatcher<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn build_request(&self, endpoint: Endpoint, params: &ParameterMap) -> Result<HttpRequest, ApiError> {
        self.assemble(Route::from(endpoint), params)
    }

    /// Attach the session when the route needs one, then encode `params`
    /// into the query string or a form body depending on the method.
    pub fn assemble(&self, route: Route, params: &ParameterMap) -> Result<HttpRequest, ApiError> {
        let mut headers = Vec::new();
        if route.requires_auth {
            let token = self
                .config
                .session_token()
                .ok_or(ApiError::MissingSession(route.path))?;
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        let raw = format!("{}/{}", self.config.base_url(), route.path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::Serialization(format!("{raw}: {e}")))?;

        let body = if route.method.carries_query() {
            if !params.is_empty() {
                url.query_pairs_mut().extend_pairs(params.iter());
            }
            None
        } else {
            headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter())
                .finish();
            Some(encoded)
        };

        Ok(HttpRequest {
            method: route.method,
            url: url.into(),
            headers,
            body,
        })
    }

    pub fn decode_response(&self, endpoint: Endpoint, response: HttpResponse) -> Result<Response, ApiError> {
        if response.status != 200 {
            return Err(ApiError::HttpError {
                status: response.status,
                body: response.body,
            });
        }
        let raw = RawReply::parse(&response.body);
        let shape = ResponseShape::select(endpoint.response_shapes(), raw.code).ok_or_else(|| {
            ApiError::UndeclaredShape {
                endpoint,
                code: raw.code.to_string(),
            }
        })?;
        shape.decode(raw.payload)
    }

    /// Build the request for `route` and hand it to the transport.
    async fn exchange(&self, route: Route, params: &ParameterMap) -> Result<HttpResponse, ApiError> {
        let request = self.assemble(route, params)?;
        debug!(path = route.path, method = %request.method, url = %request.url, "dispatching request");
        self.transport.execute(request).await
    }
}

#[async_trait]
impl<T: Transport> Dispatch for HttpDispatcher<T> {
    type Error = ApiError;

    async fn call_endpoint(&self, endpoint: Endpoint, params: ParameterMap) -> Result<Response, ApiError> {
        let response = self.exchange(Route::from(endpoint), &params).await?;
        let decoded = self.decode_response(endpoint, response);
        match &decoded {
            Ok(reply) => debug!(%endpoint, shape = ?reply.shape(), "decoded reply"),
            Err(error) => warn!(%endpoint, %error, "reply could not be decoded"),
        }
        decoded
    }
}
