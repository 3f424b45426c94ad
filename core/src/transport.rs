//! Pluggable blocking transport.
//!
//! The client never performs I/O itself; it hands a built [`HttpRequest`] to a
//! `Transport` and classifies whatever comes back.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx responses as `Ok` so that status
/// handling stays in the client. `Err` is reserved for failures that produced
/// no response at all.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

#[cfg(feature = "ureq-client")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq-client")]
mod ureq_transport {
    use std::time::Duration;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// A [`Transport`] backed by a blocking [`ureq`] agent.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(timeout: Duration) -> Self {
            let agent = ureq::Agent::config_builder()
                .timeout_global(Some(timeout))
                // Status codes are classified by the client.
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let mut builder = match request.method {
                HttpMethod::Get => self.agent.get(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let mut response = builder.call().map_err(map_ureq_error)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(map_ureq_error)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn map_ureq_error(err: ureq::Error) -> ApiError {
        match err {
            ureq::Error::Timeout(_) => ApiError::Transport("request timed out".to_string()),
            ureq::Error::HostNotFound => ApiError::Transport("host not found".to_string()),
            other => ApiError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::HttpMethod;

    struct Recorder {
        seen: RefCell<Vec<String>>,
    }

    impl Transport for Recorder {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.url.clone());
            Ok(HttpResponse::ok("[]"))
        }
    }

    fn send_via<T: Transport>(transport: T, request: &HttpRequest) {
        transport.send(request).unwrap();
    }

    #[test]
    fn reference_forwards_to_inner_transport() {
        let recorder = Recorder {
            seen: RefCell::new(Vec::new()),
        };
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/platforms/".to_string(),
            headers: Vec::new(),
            body: None,
        };
        send_via(&recorder, &request);
        assert_eq!(*recorder.seen.borrow(), vec!["http://localhost/platforms/"]);
    }
}
