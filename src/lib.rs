//! # Speech Tone Broker
//!
//! Web server that hands out speech-to-text streaming tokens and forwards
//! tone analysis requests to the tone analyzer service.
//!
//! Modules:
//! - `config` — settings file, upstream credentials read from the environment
//! - `sources` — IAM and legacy (username/password) token managers
//! - `broker` — the single "get token" operation over the selected manager
//! - `tone` — tone analysis forwarding
//! - `server` — axum routes and application state

pub mod config;
pub mod sources;
pub mod broker;
pub mod tone;
pub mod errors;
pub mod observability;
pub mod server;
pub mod utils;
#[cfg(test)]
mod tests;

pub use crate::broker::token_broker::{TokenBroker, TokenResponse};
pub use crate::config::credentials::{Credentials, UpstreamConfig};
pub use crate::tone::forwarder::ToneForwarder;
