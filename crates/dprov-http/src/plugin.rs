use tracing::trace;

use crate::plugins::RefererPlugin;
use crate::request::HttpRequest;

// ---------------------------------------------------------------------------
// RequestPlugin trait
// ---------------------------------------------------------------------------

/// A single request-preparation stage.
///
/// Plugins run in pipeline order right before dispatch. A plugin is a pure
/// function of the request it receives: no I/O, no internal state. It must be
/// idempotent, so running it on its own output changes nothing. A plugin
/// that injects a header leaves the request alone if the header is present.
///
/// The trait is object-safe and `Send + Sync` so plugins can be stored in a
/// `Vec<Box<dyn RequestPlugin>>`.
pub trait RequestPlugin: Send + Sync {
    /// Human-readable name of this plugin (e.g. "referer").
    fn name(&self) -> &str;

    /// Return the request to send in place of `request`.
    fn prepare(&self, request: HttpRequest) -> HttpRequest;
}

// ---------------------------------------------------------------------------
// PluginPipeline
// ---------------------------------------------------------------------------

/// An ordered list of [`RequestPlugin`]s.
///
/// Order is significant: each plugin sees the output of the one before it,
/// so for plugins `[a, b]` the transport receives `b(a(request))`.
#[derive(Default)]
pub struct PluginPipeline {
    plugins: Vec<Box<dyn RequestPlugin>>,
}

impl PluginPipeline {
    /// An empty pipeline; requests pass through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pipeline with the built-in plugins: Referer.
    pub fn with_default_plugins() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_plugin(Box::new(RefererPlugin));
        pipeline
    }

    /// Append a plugin to the end of the pipeline.
    pub fn add_plugin(&mut self, plugin: Box<dyn RequestPlugin>) {
        self.plugins.push(plugin);
    }

    /// Builder form of [`Self::add_plugin`].
    pub fn with_plugin(mut self, plugin: impl RequestPlugin + 'static) -> Self {
        self.add_plugin(Box::new(plugin));
        self
    }

    /// Number of plugins in the pipeline.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if the pipeline has no plugins.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Plugin names in execution order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Fold `request` through every plugin, left to right.
    pub fn apply(&self, request: HttpRequest) -> HttpRequest {
        self.plugins.iter().fold(request, |request, plugin| {
            trace!(plugin = plugin.name(), "preparing request");
            plugin.prepare(request)
        })
    }
}

impl std::fmt::Debug for PluginPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginPipeline")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
