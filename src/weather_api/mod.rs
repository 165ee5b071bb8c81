//! Access to the weatherapi.com history endpoint.

pub mod client;
pub mod error;
pub mod extractor;
pub mod fetcher;
