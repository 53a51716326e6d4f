//! Response header capability.

use std::collections::HashMap;

use http::header::{HeaderMap, HeaderName, HeaderValue};

/// Header access a middleware needs from the response it decorates.
///
/// Header names are matched case-insensitively by every implementation.
pub trait ResponseHeaders {
    /// Set a header, replacing any existing value.
    fn set_header(&mut self, name: &str, value: &str);

    /// Get a header value.
    fn get_header(&self, name: &str) -> Option<&str>;

    /// Remove a header if present.
    fn remove_header(&mut self, name: &str);
}

impl<T: ResponseHeaders + ?Sized> ResponseHeaders for &mut T {
    fn set_header(&mut self, name: &str, value: &str) {
        (**self).set_header(name, value);
    }

    fn get_header(&self, name: &str) -> Option<&str> {
        (**self).get_header(name)
    }

    fn remove_header(&mut self, name: &str) {
        (**self).remove_header(name);
    }
}

/// An in-memory HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

impl Response {
    /// Create an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Set a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.remove_header(&name);
        self.headers.insert(name, value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ResponseHeaders for Response {
    fn set_header(&mut self, name: &str, value: &str) {
        self.remove_header(name);
        self.headers.insert(name.to_string(), value.to_string());
    }

    fn get_header(&self, name: &str) -> Option<&str> {
        self.header(name)
    }

    fn remove_header(&mut self, name: &str) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
    }
}

impl ResponseHeaders for HeaderMap {
    fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.insert(name, value);
            }
            _ => tracing::warn!(header = name, "skipping header that is not valid HTTP text"),
        }
    }

    fn get_header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    fn remove_header(&mut self, name: &str) {
        self.remove(name);
    }
}

impl<B> ResponseHeaders for http::Response<B> {
    fn set_header(&mut self, name: &str, value: &str) {
        self.headers_mut().set_header(name, value);
    }

    fn get_header(&self, name: &str) -> Option<&str> {
        self.headers().get_header(name)
    }

    fn remove_header(&mut self, name: &str) {
        self.headers_mut().remove_header(name);
    }
}
