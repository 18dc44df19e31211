//! HTTP client for the actor-definition version registry.
//!
//! [`HttpVersionRegistry`] implements [`rollout_core::VersionRegistry`] on top of the registry's JSON API.
//! It issues exactly one request per fetch and never retries; retry policy belongs to the orchestrator.
mod config;
pub use config::RegistryConfig;

mod errors;
pub use errors::HttpRegistryError;

mod client;
pub use client::HttpVersionRegistry;
