//! Client SDK for a self-hosted FaaS control plane
//!
//! This crate covers the full deployment lifecycle against a FaaS plane:
//! authenticate, upload a package or register a repository, create the
//! deployment, poll until it is live, and invoke its functions. All remote
//! state belongs to the server; the client holds only its token and base URL
//! binding.
//!
//! # Module Structure
//!
//! - [`protocol`] - Transport, authentication, and the resource API
//! - [`invoke`] - Calling deployed functions through the gateway routes
//! - [`poll`] - Retry loops for readiness and deployment visibility
//! - [`deployment`] - Wire types reported by the plane
//! - [`language`] - Static language and runner catalogs
//! - [`config`] - Persistent base URL and token storage
//! - [`error`] - The crate-wide error type
//!
//! # Example
//!
//! ```no_run
//! use faas_protocol::{FaasClient, ResourceType, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> faas_protocol::Result<()> {
//!     let base_url = "http://localhost:9000";
//!     let token = faas_protocol::login("user@example.com", "hunter2", base_url).await?;
//!     let client = FaasClient::new(token, base_url)?;
//!
//!     faas_protocol::wait_for_readiness(&client, RetryPolicy::readiness()).await?;
//!
//!     let created = client
//!         .deploy("greeter", &[], "free", ResourceType::Package, None, None)
//!         .await?;
//!     let deployment = faas_protocol::wait_for_deployment(
//!         &client,
//!         &created.suffix,
//!         RetryPolicy::deployment(),
//!     )
//!     .await?;
//!
//!     let greeting = client
//!         .call(&deployment.prefix, &deployment.suffix, None, "greet", None)
//!         .await?;
//!     println!("{greeting}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod deployment;
pub mod error;
pub mod invoke;
pub mod language;
pub mod poll;
pub mod protocol;

pub use config::Config;
pub use deployment::{
    Argument, Create, DeployStatus, Deployment, Func, Handle, LanguageId, LogType,
    PackageManifest, ReturnValue, Scope, Signature, SubscriptionDeploy, SubscriptionMap, ValueId,
    ValueType,
};
pub use error::{Error, Result};
pub use invoke::InvokeMode;
pub use language::{detect_runners, runner_display_name, LanguageInfo, RunnerId, RunnerInfo};
pub use poll::{wait_for, wait_for_deployment, wait_for_readiness, RetryPolicy};
pub use protocol::api::{
    count_subscriptions, AddResponse, Branches, FaasClient, ResourceType, DEFAULT_VERSION,
};
pub use protocol::auth::{login, signup};
