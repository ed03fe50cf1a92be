use async_trait::async_trait;
use dprov_core::{DataProvider, ParamDataProvider};
use hyper::{HeaderMap, Method, Uri};

use crate::request::HttpRequest;

/// Produces the request for a parameterless fetch.
pub trait RequestSource: Send + Sync {
    fn request(&self) -> HttpRequest;
}

/// A fixed target, method and header set.
#[derive(Clone, Debug)]
pub struct BaseRequestSource {
    pub uri: Uri,
    pub method: Method,
    pub headers: HeaderMap,
}

impl BaseRequestSource {
    /// A `GET` of `uri` with no extra headers.
    pub fn new(uri: Uri) -> Self {
        Self {
            uri,
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl RequestSource for BaseRequestSource {
    fn request(&self) -> HttpRequest {
        HttpRequest::new(self.method.clone(), self.uri.clone()).with_headers(self.headers.clone())
    }
}

/// Turns a request-taking provider into a [`DataProvider`] by asking a
/// [`RequestSource`] for the request on every fetch.
pub struct SourcedProvider<S, P> {
    source: S,
    provider: P,
}

impl<S, P> SourcedProvider<S, P>
where
    S: RequestSource,
    P: ParamDataProvider<Params = HttpRequest>,
{
    pub fn new(source: S, provider: P) -> Self {
        Self { source, provider }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<S, P> DataProvider for SourcedProvider<S, P>
where
    S: RequestSource,
    P: ParamDataProvider<Params = HttpRequest>,
{
    type Output = P::Output;
    type Error = P::Error;

    async fn fetch(&self) -> Result<P::Output, P::Error> {
        self.provider.fetch(self.source.request()).await
    }
}
