//! Rave Transport Proxy
//!
//! Stateless `POST /api/chat` handler that reshapes inbound JSON or
//! multipart requests, forwards them to the automation webhook and
//! relays the reply or a structured error.

mod config;
mod error;
mod handler;
mod server;

pub use config::{normalize_webhook_url, ProxyConfig, DEFAULT_BIND_ADDR, DEFAULT_BODY_LIMIT};
pub use error::ProxyError;
pub use server::{router, serve};

pub type Result<T> = std::result::Result<T, ProxyError>;
