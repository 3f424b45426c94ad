//! Request builder, dispatcher and response classifier for the IGDB API.
//!
//! # Design
//! `IgdbClient` holds the configuration and a [`Transport`]; it carries no
//! mutable state between calls. Every operation goes through the same three
//! steps: `build_request` turns an endpoint path plus options into an
//! `HttpRequest` (all option validation happens here), `execute` hands it to
//! the transport, and one of the `parse_*` methods classifies the response.
//! Resource-specific behaviour lives in [`Service`](crate::service::Service).

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{Query, QueryOption};
use crate::service::{Resource, Service};
use crate::transport::Transport;
use crate::types::{Count, Platform, PulseGroup, TestDummy};

/// Blocking client for the IGDB API.
#[derive(Debug, Clone)]
pub struct IgdbClient<T> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "ureq-client")]
impl IgdbClient<crate::transport::UreqTransport> {
    /// Create a client that talks HTTP through `ureq`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = crate::transport::UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T> IgdbClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build a GET request for `path` (relative to the root URL).
    ///
    /// Options are validated here, so an invalid option never reaches the
    /// transport.
    pub fn build_request(
        &self,
        path: &str,
        options: &[QueryOption],
    ) -> Result<HttpRequest, ApiError> {
        let query = Query::from_options(options)?;

        let mut url = format!("{}{path}", self.config.root_url());
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }

        Ok(HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![
                ("user-key".to_string(), self.config.api_key().to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body: None,
        })
    }

    /// Decode a list of records. An empty array is `NoResults`.
    pub fn parse_records<R: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<R>, ApiError> {
        check_status(&response)?;
        let records: Vec<R> = decode(&response.body)?;
        if records.is_empty() {
            return Err(ApiError::NoResults);
        }
        Ok(records)
    }

    /// Decode a `{"count": n}` envelope. An empty array is `NoResults`.
    pub fn parse_count(&self, response: HttpResponse) -> Result<u64, ApiError> {
        check_status(&response)?;
        if is_empty_array(&response.body) {
            return Err(ApiError::NoResults);
        }
        let count: Count = decode(&response.body)?;
        Ok(count.count)
    }

    /// Decode a field-name list. An empty array is a valid, empty answer.
    pub fn parse_fields(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }
}

impl<T: Transport> IgdbClient<T> {
    pub fn platforms(&self) -> Service<'_, Platform, T> {
        self.service()
    }

    pub fn pulse_groups(&self) -> Service<'_, PulseGroup, T> {
        self.service()
    }

    pub fn test_dummies(&self) -> Service<'_, TestDummy, T> {
        self.service()
    }

    /// Service handle for any [`Resource`].
    pub fn service<R: Resource>(&self) -> Service<'_, R, T> {
        Service::new(self)
    }

    /// Send `request` through the transport.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            "sending IGDB request"
        );
        let response = self.transport.send(request)?;
        if !response.is_success() {
            tracing::warn!(
                status = response.status,
                url = %request.url,
                "IGDB request failed"
            );
        }
        Ok(response)
    }

    pub(crate) fn fetch_records<R: DeserializeOwned>(
        &self,
        request: &HttpRequest,
    ) -> Result<Vec<R>, ApiError> {
        let response = self.execute(request)?;
        let records = self.parse_records(response)?;
        tracing::debug!(records = records.len(), url = %request.url, "decoded IGDB records");
        Ok(records)
    }

    pub(crate) fn fetch_count(&self, request: &HttpRequest) -> Result<u64, ApiError> {
        self.parse_count(self.execute(request)?)
    }

    pub(crate) fn fetch_fields(&self, request: &HttpRequest) -> Result<Vec<String>, ApiError> {
        self.parse_fields(self.execute(request)?)
    }
}

fn decode<D: DeserializeOwned>(body: &str) -> Result<D, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::InvalidJson(e.to_string()))
}

fn is_empty_array(body: &str) -> bool {
    serde_json::from_str::<Vec<IgnoredAny>>(body).is_ok_and(|items| items.is_empty())
}

/// Error body IGDB sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerError {
    title: String,
    cause: String,
}

/// Map non-success status codes to `ApiError::Http`, pulling the message out
/// of IGDB's error JSON when the body has one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        message: server_message(&response.body),
    })
}

fn server_message(body: &str) -> String {
    let first = serde_json::from_str::<Vec<ServerError>>(body)
        .ok()
        .and_then(|errors| errors.into_iter().next())
        .or_else(|| serde_json::from_str::<ServerError>(body).ok());

    match first {
        Some(err) if !err.title.is_empty() && !err.cause.is_empty() => {
            format!("{}: {}", err.title, err.cause)
        }
        Some(err) if !err.title.is_empty() => err.title,
        _ => body.trim().to_string(),
    }
}
