use async_trait::async_trait;
use bytes::Bytes;
use reqwest::redirect;
use tracing::trace;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::request::{HttpRequest, HttpResponse};

/// Sends a prepared request and returns the raw payload with the response.
///
/// A transport reports failures to complete the exchange as
/// [`TransportError`]. Any status code the server sends back, error statuses
/// included, is a successful send; classification happens one layer up.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<(Bytes, HttpResponse), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<(Bytes, HttpResponse), TransportError> {
        (**self).send(request).await
    }
}

/// [`Transport`] over a `reqwest::Client`.
///
/// Redirects are not followed, so 3xx responses reach the caller as-is.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client from `config`.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<(Bytes, HttpResponse), TransportError> {
        let url = reqwest::Url::parse(&request.uri().to_string())
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {e}", request.uri())))?;

        let response = self
            .client
            .request(request.method().clone(), url)
            .headers(request.headers().clone())
            .send()
            .await?;

        let head = HttpResponse {
            status: response.status(),
            headers: response.headers().clone(),
        };
        let body = response.bytes().await?;
        trace!(status = %head.status, len = body.len(), "transport exchange complete");
        Ok((body, head))
    }
}
