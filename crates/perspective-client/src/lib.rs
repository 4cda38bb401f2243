//! Client for the remote perspective API.
//!
//! [`PerspectiveApi`] is the boundary the reconciliation core talks to;
//! [`HttpClient`] is the blocking HTTP implementation. Neither retries nor
//! rolls back: a failed call leaves remote state as it was and the caller
//! re-drives the whole pass.
//!
//! The remote answers a lookup of an unknown perspective with a well-formed
//! "Empty" schema rather than a 404. That sentinel is detected here and
//! surfaced as [`Error::NotFound`]; callers never inspect fields for it.

mod api;
mod error;
mod http;

pub use api::PerspectiveApi;
pub use error::{Error, Result};
pub use http::{ClientSettings, HttpClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
