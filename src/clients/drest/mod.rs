//! Dynamic REST client and resource registry.
//!
//! - [`DrestClient`]: the entry point; owns the HTTP client and registry
//! - [`ResourceRegistry`]: case-insensitive cache of [`Resource`](crate::rest::Resource) handles

mod client;
mod registry;

pub use client::DrestClient;
pub use registry::ResourceRegistry;
