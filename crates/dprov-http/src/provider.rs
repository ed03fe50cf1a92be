use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dprov_core::ParamDataProvider;
use tracing::{debug, error, info, info_span, Instrument};

use crate::error::{ProviderError, ProviderResult};
use crate::payload::log_payload;
use crate::plugin::PluginPipeline;
use crate::request::{HttpRequest, HttpResponse};
use crate::signpost::{IntervalGuard, Signposter};
use crate::transport::Transport;

/// Name of the interval opened around every dispatch.
pub const FETCH_INTERVAL: &str = "fetch request";

/// Event emitted inside [`FETCH_INTERVAL`] once a response head arrives.
pub const RESPONSE_EVENT: &str = "response received";

/// Payload and response head returned by [`HttpProvider`].
pub type FetchOutput = (Bytes, HttpResponse);

/// Network fetch provider.
///
/// Each fetch:
///
/// 1. folds the request through the plugin pipeline;
/// 2. sends it through the transport;
/// 3. succeeds for informational, successful and redirection statuses and
///    fails with [`ProviderError::HttpStatus`] otherwise.
///
/// Transport failures surface as [`ProviderError::Transport`]. A single
/// attempt is made per call.
pub struct HttpProvider<T> {
    transport: T,
    pipeline: PluginPipeline,
    signposter: Option<Arc<dyn Signposter>>,
}

impl<T: Transport> HttpProvider<T> {
    /// A provider with an empty plugin pipeline.
    pub fn new(transport: T) -> Self {
        Self::with_pipeline(transport, PluginPipeline::new())
    }

    pub fn with_pipeline(transport: T, pipeline: PluginPipeline) -> Self {
        Self {
            transport,
            pipeline,
            signposter: None,
        }
    }

    /// Bracket every dispatch with a [`FETCH_INTERVAL`] interval.
    pub fn with_signposter(mut self, signposter: Arc<dyn Signposter>) -> Self {
        self.signposter = Some(signposter);
        self
    }

    pub fn pipeline(&self) -> &PluginPipeline {
        &self.pipeline
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn dispatch(&self, request: HttpRequest) -> ProviderResult<FetchOutput> {
        let interval = self
            .signposter
            .as_ref()
            .map(|signposter| IntervalGuard::begin(signposter, FETCH_INTERVAL));

        info!(request = %request, "sending request");
        debug!(headers = ?request.headers(), "request headers");

        let (body, response) = self.transport.send(request).await.map_err(|e| {
            error!(error = %e, "transport failed");
            ProviderError::Transport(e)
        })?;

        if let Some(interval) = &interval {
            interval.event(RESPONSE_EVENT);
        }
        info!(status = %response.status, len = body.len(), "response received");
        log_payload(&body);

        if !response.kind().is_success() {
            let err = ProviderError::HttpStatus {
                status: response.status,
                body,
            };
            error!(error = %err, "request rejected");
            return Err(err);
        }

        Ok((body, response))
    }
}

#[async_trait]
impl<T: Transport> ParamDataProvider for HttpProvider<T> {
    type Params = HttpRequest;
    type Output = FetchOutput;
    type Error = ProviderError;

    async fn fetch(&self, request: HttpRequest) -> ProviderResult<FetchOutput> {
        let request = self.pipeline.apply(request);
        let span = info_span!("fetch", method = %request.method(), uri = %request.uri());
        self.dispatch(request).instrument(span).await
    }
}

impl<T> std::fmt::Debug for HttpProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("pipeline", &self.pipeline)
            .field("signposted", &self.signposter.is_some())
            .finish()
    }
}
