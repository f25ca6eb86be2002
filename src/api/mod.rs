//! HTTP client for the Aura Hub API.

mod client;

pub use client::{ApiClient, ApiError};
