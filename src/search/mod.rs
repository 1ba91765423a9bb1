//! Remote search access.
//!
//! - **[`client`]**: the [`client::SearchBackend`] seam and its HTTP implementation.
//! - **[`tracker`]**: request ids so only the latest response is applied.

pub mod client;
pub mod tracker;
