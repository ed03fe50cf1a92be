use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, StatusCode, Uri};

// ---------------------------------------------------------------------------
// HttpRequest
// ---------------------------------------------------------------------------

/// An outgoing request: method, target and header fields.
///
/// Plugins take a request by value and hand back a new one; nothing holds a
/// request while another party edits it.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl HttpRequest {
    /// Create a request with no header fields.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(uri: Uri) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Replace all header fields.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set `name` to `value`, replacing any existing values for `name`.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns `true` if at least one value is present for `name`.
    pub fn has_header(&self, name: &HeaderName) -> bool {
        self.headers.contains_key(name)
    }
}

impl std::fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

// ---------------------------------------------------------------------------
// StatusKind
// ---------------------------------------------------------------------------

/// Coarse classification of a response status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// 1xx
    Informational,
    /// 2xx
    Successful,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// Anything outside 100..=599.
    Invalid,
}

impl StatusKind {
    pub fn of(status: StatusCode) -> Self {
        match status.as_u16() {
            100..=199 => Self::Informational,
            200..=299 => Self::Successful,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Invalid,
        }
    }

    /// Informational, successful and redirection statuses count as success.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::Informational | Self::Successful | Self::Redirection
        )
    }
}

// ---------------------------------------------------------------------------
// HttpResponse
// ---------------------------------------------------------------------------

/// Status and header fields of a response. The payload travels next to it.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
        }
    }

    pub fn kind(&self) -> StatusKind {
        StatusKind::of(self.status)
    }
}

impl std::fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)
    }
}
