//! FaaS protocol module
//!
//! This module provides the core functionality for talking to a FaaS
//! control plane, including authentication, HTTP transport, and the
//! resource API surface.
//!
//! # Module Structure
//!
//! - [`auth`] - Account endpoints that run before a token exists
//! - [`api`] - Main client for the authenticated resource API
//! - [`http`] - HTTP transport for REST calls
//!
//! # Example
//!
//! ```ignore
//! use faas_protocol::FaasClient;
//!
//! async fn example() -> faas_protocol::Result<()> {
//!     let client = FaasClient::new("token", "http://localhost:9000")?;
//!     let deployments = client.inspect().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod http;
