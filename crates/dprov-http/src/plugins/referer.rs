use hyper::header::{HeaderValue, REFERER};
use hyper::Uri;

use crate::plugin::RequestPlugin;
use crate::request::HttpRequest;

/// Adds a `Referer` header derived from the request target.
///
/// The value is the target with its query removed. Requests that already
/// carry a `Referer` are returned untouched, as are requests whose derived
/// value would be empty.
///
/// ```rust
/// use dprov_http::{HttpRequest, RefererPlugin, RequestPlugin};
/// use hyper::header::REFERER;
/// use hyper::Uri;
///
/// let request = HttpRequest::get(Uri::from_static("https://example.com/quotes?page=2"));
/// let prepared = RefererPlugin.prepare(request);
/// assert_eq!(prepared.headers()[REFERER], "https://example.com/quotes");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RefererPlugin;

impl RequestPlugin for RefererPlugin {
    fn name(&self) -> &str {
        "referer"
    }

    fn prepare(&self, request: HttpRequest) -> HttpRequest {
        if request.has_header(&REFERER) {
            return request;
        }

        let referer = without_query(request.uri());
        if referer.is_empty() {
            return request;
        }

        match HeaderValue::from_str(&referer) {
            Ok(value) => request.with_header(REFERER, value),
            Err(_) => request,
        }
    }
}

/// Render `uri` without its query component.
fn without_query(uri: &Uri) -> String {
    let mut out = String::new();
    if let Some(scheme) = uri.scheme_str() {
        out.push_str(scheme);
        out.push_str("://");
    }
    if let Some(authority) = uri.authority() {
        out.push_str(authority.as_str());
    }
    if let Some(path_and_query) = uri.path_and_query() {
        out.push_str(path_and_query.path());
    }
    out
}
