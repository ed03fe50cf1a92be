//! Network fetching for dprov.
//!
//! [`HttpProvider`] is a [`ParamDataProvider`](dprov_core::ParamDataProvider)
//! that takes an [`HttpRequest`], runs it through a [`PluginPipeline`], sends
//! it with an injected [`Transport`] and classifies the response status.
//!
//! # Pipeline
//!
//! Plugins are pure `HttpRequest -> HttpRequest` stages applied in order.
//! The built-in [`RefererPlugin`] adds a `Referer` derived from the target
//! with its query stripped; [`HeaderPlugin`] sets a fixed header.
//!
//! # Transports
//!
//! - [`ReqwestTransport`] -- `reqwest::Client` with redirects disabled
//!
//! # Design Rules
//!
//! 1. One attempt per fetch; retries belong to the caller.
//! 2. Transport failures and error statuses are distinct error variants.
//! 3. Logging and signposting never change a fetch's outcome.
//! 4. Dropping a fetch future cancels the exchange and closes its interval.

pub mod config;
pub mod error;
pub mod payload;
pub mod plugin;
pub mod plugins;
pub mod provider;
pub mod request;
pub mod signpost;
pub mod source;
pub mod transport;

pub use config::TransportConfig;
pub use error::{ProviderError, ProviderResult, TransportError};
pub use plugin::{PluginPipeline, RequestPlugin};
pub use plugins::{HeaderPlugin, RefererPlugin};
pub use provider::{FetchOutput, HttpProvider, FETCH_INTERVAL, RESPONSE_EVENT};
pub use request::{HttpRequest, HttpResponse, StatusKind};
pub use signpost::{IntervalId, Signposter, TracingSignposter};
pub use source::{BaseRequestSource, RequestSource, SourcedProvider};
pub use transport::{ReqwestTransport, Transport};
