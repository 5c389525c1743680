//! # MediMeet HTTP Client
//!
//! Talks to the MediMeet backend over HTTP and implements
//! [`medimeet_core::gateway::ApiGateway`] on top of it.

/// Environment-driven client settings
pub mod config;
/// reqwest-backed gateway
pub mod http;
/// Session persistence on disk
pub mod session_file;
mod wire;

pub use config::ClientConfig;
pub use http::HttpGateway;
pub use session_file::FileSessionStore;
