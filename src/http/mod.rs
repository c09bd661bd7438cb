//! HTTP client module for metric ingestion
//!
//! Provides the HTTP transport used to push samples to the backend.

mod client;

pub use client::{HttpClient, HttpError, HttpResponse, DEFAULT_TIMEOUT_SECS};
