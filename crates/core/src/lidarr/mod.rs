//! Lidarr API client.
//!
//! This module provides a `LidarrApi` trait covering the calls the hook makes
//! against Lidarr's v1 REST API, and a reqwest-backed implementation.

mod client;
mod poll;
mod types;

pub use client::LidarrClient;
pub use poll::{PollResult, RetryPolicy};
pub use types::*;
