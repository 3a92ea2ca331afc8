//! HTTP transport seam for the UCSC client.

use super::{UcscError, UcscResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;

/// Raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking GET transport.
///
/// Implementations return `Ok` for every response that reached the server,
/// whatever its status; only transport failures are errors.
pub trait HttpTransport {
    fn get(&self, url: &str) -> UcscResult<TransportResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str) -> UcscResult<TransportResponse> {
        (**self).get(url)
    }
}

/// `reqwest` blocking transport.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client sending `Accept: application/json`.
    ///
    /// `timeout = None` keeps the reqwest default.
    pub fn new(timeout: Option<Duration>) -> UcscResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("genaxis/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(UcscError::Client)?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> UcscResult<TransportResponse> {
        let to_transport_error = |err: reqwest::Error| UcscError::Transport {
            url: url.to_string(),
            source: Box::new(err),
        };

        let response = self.client.get(url).send().map_err(to_transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(to_transport_error)?;
        Ok(TransportResponse { status, body })
    }
}
