//! Built-in request plugins.

pub mod header;
pub mod referer;

pub use header::HeaderPlugin;
pub use referer::RefererPlugin;
