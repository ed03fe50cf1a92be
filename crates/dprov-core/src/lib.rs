//! Fetch contracts for dprov.
//!
//! Callers depend on "a thing that can be fetched" and never on the backend
//! that produces the value. Two shapes exist:
//!
//! - [`DataProvider`] -- produces a value with no input
//! - [`ParamDataProvider`] -- produces a value from a caller-supplied input
//!
//! Every implementation commits to exactly one error type through its
//! associated `Error`, so callers can branch on the cause without downcasting.
//!
//! # Transformers
//!
//! [`DataProviderExt::map`] and [`ParamDataProviderExt::map`] wrap a provider
//! and convert its successful output. Errors pass through untouched.

pub mod map;
pub mod provider;

pub use map::{DataProviderExt, MapDataProvider, MapParamDataProvider, ParamDataProviderExt};
pub use provider::{DataProvider, ParamDataProvider};
