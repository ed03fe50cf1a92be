use hyper::header::{HeaderName, HeaderValue};

use crate::plugin::RequestPlugin;
use crate::request::HttpRequest;

/// Sets a fixed header field unless the request already carries it.
#[derive(Clone, Debug)]
pub struct HeaderPlugin {
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderPlugin {
    pub fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }
}

impl RequestPlugin for HeaderPlugin {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn prepare(&self, request: HttpRequest) -> HttpRequest {
        if request.has_header(&self.name) {
            return request;
        }
        request.with_header(self.name.clone(), self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use hyper::header::USER_AGENT;
    use hyper::Uri;

    use super::*;

    #[test]
    fn injects_missing_header() {
        let plugin = HeaderPlugin::new(USER_AGENT, HeaderValue::from_static("dprov/0.1"));
        let prepared = plugin.prepare(HttpRequest::get(Uri::from_static("/x")));
        assert_eq!(prepared.headers()[USER_AGENT], "dprov/0.1");
        assert_eq!(plugin.name(), "user-agent");
    }

    #[test]
    fn keeps_caller_value() {
        let plugin = HeaderPlugin::new(USER_AGENT, HeaderValue::from_static("dprov/0.1"));
        let request = HttpRequest::get(Uri::from_static("/x"))
            .with_header(USER_AGENT, HeaderValue::from_static("caller"));
        assert_eq!(plugin.prepare(request.clone()), request);
    }
}
