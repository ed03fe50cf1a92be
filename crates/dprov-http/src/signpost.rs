use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Identifies one open interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalId(pub u64);

/// Receives begin/end markers around timed operations.
///
/// Purely observational: nothing a signposter does can change the outcome of
/// the operation it brackets.
pub trait Signposter: Send + Sync {
    /// Open an interval named `name`.
    fn begin_interval(&self, name: &'static str) -> IntervalId;

    /// Record a point event inside an open interval.
    fn emit_event(&self, name: &'static str, id: IntervalId);

    /// Close an interval opened by [`Self::begin_interval`].
    fn end_interval(&self, name: &'static str, id: IntervalId, elapsed: Duration);
}

/// Emits intervals as `tracing` debug events.
#[derive(Debug, Default)]
pub struct TracingSignposter {
    next_id: AtomicU64,
}

impl TracingSignposter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Signposter for TracingSignposter {
    fn begin_interval(&self, name: &'static str) -> IntervalId {
        let id = IntervalId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(interval = name, id = id.0, "begin interval");
        id
    }

    fn emit_event(&self, name: &'static str, id: IntervalId) {
        debug!(event = name, id = id.0, "signpost event");
    }

    fn end_interval(&self, name: &'static str, id: IntervalId, elapsed: Duration) {
        debug!(interval = name, id = id.0, elapsed_ms = elapsed.as_millis() as u64, "end interval");
    }
}

/// An open interval, closed when dropped.
///
/// Holding the guard across an `.await` ties the interval to the future: it
/// closes on return, on `?`, and when the future is dropped mid-flight.
pub(crate) struct IntervalGuard {
    signposter: Arc<dyn Signposter>,
    name: &'static str,
    id: IntervalId,
    started: Instant,
}

impl IntervalGuard {
    pub(crate) fn begin(signposter: &Arc<dyn Signposter>, name: &'static str) -> Self {
        let id = signposter.begin_interval(name);
        Self {
            signposter: Arc::clone(signposter),
            name,
            id,
            started: Instant::now(),
        }
    }

    /// Record `name` as a point event inside this interval.
    pub(crate) fn event(&self, name: &'static str) {
        self.signposter.emit_event(name, self.id);
    }
}

impl Drop for IntervalGuard {
    fn drop(&mut self) {
        self.signposter
            .end_interval(self.name, self.id, self.started.elapsed());
    }
}
