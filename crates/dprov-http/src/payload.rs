//! Debug rendering of response payloads.

use std::borrow::Cow;

use tracing::debug;

/// Payloads longer than this are truncated in debug logs.
pub const MAX_LOGGED_PAYLOAD: usize = 2048;

/// Lossy UTF-8 preview of at most [`MAX_LOGGED_PAYLOAD`] bytes.
///
/// Returns the preview and whether anything was cut off.
pub fn preview(data: &[u8]) -> (Cow<'_, str>, bool) {
    if data.len() <= MAX_LOGGED_PAYLOAD {
        (String::from_utf8_lossy(data), false)
    } else {
        (String::from_utf8_lossy(&data[..MAX_LOGGED_PAYLOAD]), true)
    }
}

/// Log `data` at debug level, truncated to [`MAX_LOGGED_PAYLOAD`] bytes.
pub(crate) fn log_payload(data: &[u8]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let (text, truncated) = preview(data);
    debug!(payload = %text, "response payload");
    if truncated {
        debug!(
            limit = MAX_LOGGED_PAYLOAD,
            size = data.len(),
            "payload truncated in log"
        );
    }
}
