//! HTTP Response types
//!
//! Every body goes through [`Response::write_string`]: the text is encoded
//! as UTF-8 once and the response carries an explicit content length.

use smallvec::SmallVec;

/// Body of the fallback response for unknown paths
pub const NOT_FOUND_BODY: &str = "URL Not Found!";

/// HTTP Status Code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const NOT_FOUND: StatusCode = StatusCode(404);

    /// Get the numeric code
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Get the reason phrase
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            404 => "Not Found",
            _ => "Unknown",
        }
    }

    /// Check if this is a success status (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// HTTP Response
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: StatusCode,
    /// Response headers (stack-allocated for small header counts)
    pub headers: SmallVec<[(String, String); 4]>,
    /// Response body
    pub body: bytes::Bytes,
}

impl Response {
    /// Create a new response
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: SmallVec::new(),
            body: bytes::Bytes::new(),
        }
    }

    /// Create a 200 OK response without a body
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Create a 200 response carrying `body` as UTF-8 text
    pub fn text(body: impl AsRef<str>) -> Self {
        let mut res = Self::ok();
        res.write_string(body);
        res
    }

    /// Create a JSON response
    pub fn json(body: impl AsRef<str>) -> Self {
        let mut res = ResponseBuilder::new(StatusCode::OK)
            .header("content-type", "application/json")
            .build();
        res.write_string(body);
        res
    }

    /// Create an HTML response
    pub fn html(body: impl AsRef<str>) -> Self {
        let mut res = ResponseBuilder::new(StatusCode::OK)
            .header("content-type", "text/html; charset=utf-8")
            .build();
        res.write_string(body);
        res
    }

    /// Create the 404 response for unknown paths
    pub fn not_found() -> Self {
        let mut res = Self::new(StatusCode::NOT_FOUND);
        res.write_string(NOT_FOUND_BODY);
        res
    }

    /// Replace the body with the UTF-8 bytes of `text`
    pub fn write_string(&mut self, text: impl AsRef<str>) {
        self.body = bytes::Bytes::copy_from_slice(text.as_ref().as_bytes());
    }

    /// Length of the body in bytes, sent as `content-length`
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get content-type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get body as string (if UTF-8)
    pub fn body_string(&self) -> Option<String> {
        std::str::from_utf8(&self.body).ok().map(|s| s.to_string())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

/// Builder for constructing responses
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    /// Create a new builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            response: Response::new(status),
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.headers.push((name.into(), value.into()));
        self
    }

    /// Build the response
    pub fn build(self) -> Response {
        self.response
    }
}
