//! Client module - transports for the reservation API.
//!
//! [`BookingApi`] is the seam the wizard drivers talk to. Two transports
//! implement it: [`NetworkHttpClient`] over reqwest and, with the
//! `in-process` feature, [`OneshotHttpClient`] calling an axum Router
//! directly.

mod api;
pub mod http;
#[cfg(feature = "in-process")]
pub mod http_oneshot;

pub use api::BookingApi;
pub use http::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use http_oneshot::OneshotHttpClient;
