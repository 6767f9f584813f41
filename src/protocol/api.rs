//! FaaS resource client
//!
//! Main client for the authenticated control-plane API, combining the token
//! binding and HTTP transport. Every method is a single request/response
//! exchange; retries live in [`crate::poll`].

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use super::http::HttpTransport;
use crate::config::Config;
use crate::deployment::{
    Create, Deployment, LogType, PackageManifest, SubscriptionDeploy, SubscriptionMap,
};
use crate::error::{Error, Result};

/// Version segment used when callers pass `None`
pub const DEFAULT_VERSION: &str = "v1";

/// Content type of uploaded package blobs
const PACKAGE_CONTENT_TYPE: &str = "application/x-zip-compressed";

/// What a deployment is created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Package,
    Repository,
}

/// Response of the repository add endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddResponse {
    pub id: String,
}

/// Response of the repository branch listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branches {
    pub branches: Vec<String>,
}

#[derive(Deserialize)]
struct Files {
    files: Vec<String>,
}

/// Ensure the base URL ends with a slash so joins append instead of replace
pub(crate) fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Main FaaS client
///
/// Holds an immutable token and base URL binding; cloning is cheap and every
/// clone talks to the same plane independently.
#[derive(Clone)]
pub struct FaasClient {
    transport: HttpTransport,
    base_url: Url,
    token: String,
}

impl FaasClient {
    /// Create a new client bound to a token and base URL
    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new()?,
            base_url: normalize_base_url(base_url)?,
            token: token.into(),
        })
    }

    /// Create a client from the effective configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.effective_token(), &config.effective_base_url())
    }

    /// Rebind the client to a new token, e.g. after [`refresh`](Self::refresh)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Base URL the client is bound to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL relative to the base
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub(crate) fn auth_token(&self) -> Option<&str> {
        Some(&self.token)
    }

    // =========================================================================
    // Account endpoints
    // =========================================================================

    /// Get a fresh token for the current account
    pub async fn refresh(&self) -> Result<String> {
        let url = self.endpoint("api/account/refresh-token")?;
        self.transport.get_text(url, self.auth_token()).await
    }

    /// Whether the current token is still accepted
    pub async fn validate(&self) -> Result<bool> {
        let url = self.endpoint("validate")?;
        self.transport.get(url, self.auth_token()).await
    }

    /// Whether the current account may create deployments
    pub async fn deploy_enabled(&self) -> Result<bool> {
        let url = self.endpoint("api/account/deploy-enabled")?;
        self.transport.get(url, self.auth_token()).await
    }

    // =========================================================================
    // Billing endpoints
    // =========================================================================

    /// Count of active subscriptions by identifier
    pub async fn list_subscriptions(&self) -> Result<SubscriptionMap> {
        let url = self.endpoint("api/billing/list-subscriptions")?;
        let ids: Vec<String> = self.transport.get(url, self.auth_token()).await?;
        Ok(count_subscriptions(ids))
    }

    /// Which subscription backs which deployment
    pub async fn list_subscriptions_deploys(&self) -> Result<Vec<SubscriptionDeploy>> {
        let url = self.endpoint("api/billing/list-subscriptions-deploys")?;
        self.transport.get(url, self.auth_token()).await
    }

    // =========================================================================
    // Deployment endpoints
    // =========================================================================

    /// List all deployments visible to the account
    pub async fn inspect(&self) -> Result<Vec<Deployment>> {
        let url = self.endpoint("api/inspect")?;
        self.transport.get(url, self.auth_token()).await
    }

    /// Find one deployment by suffix.
    /// A miss is a plain [`Error::NotFound`]; this method never retries.
    pub async fn inspect_by_name(&self, suffix: &str) -> Result<Deployment> {
        let deployments = self.inspect().await?;
        deployments
            .into_iter()
            .find(|d| d.suffix == suffix)
            .ok_or_else(|| Error::NotFound {
                suffix: suffix.to_string(),
            })
    }

    /// Probe whether the plane answers requests at all.
    /// Succeeds only on HTTP 200; any other completed status is an error.
    pub async fn readiness(&self) -> Result<()> {
        let url = self.endpoint("readiness")?;
        let status = self.transport.get_status(url, self.auth_token()).await?;

        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(Error::http_status(status, String::new()))
        }
    }

    /// Upload a package blob with its manifests; returns the upload id
    pub async fn upload(
        &self,
        name: &str,
        blob: Vec<u8>,
        jsons: &[PackageManifest],
        runners: &[String],
    ) -> Result<String> {
        let url = self.endpoint("api/package/create")?;

        let raw = Part::bytes(blob)
            .file_name("blob")
            .mime_str(PACKAGE_CONTENT_TYPE)?;
        let form = Form::new()
            .text("id", name.to_string())
            .text("type", PACKAGE_CONTENT_TYPE)
            .text("jsons", serde_json::to_string(jsons)?)
            .text("runners", serde_json::to_string(runners)?)
            .part("raw", raw);

        self.transport
            .post_multipart(url, self.auth_token(), form)
            .await
    }

    /// Register a repository for deployment; returns its id
    pub async fn add(
        &self,
        url: &str,
        branch: &str,
        jsons: &[PackageManifest],
    ) -> Result<AddResponse> {
        let endpoint = self.endpoint("api/repository/add")?;
        let body = serde_json::json!({
            "url": url,
            "branch": branch,
            "jsons": jsons,
        });
        self.transport.post(endpoint, self.auth_token(), &body).await
    }

    /// List the branches of a registered repository
    pub async fn branch_list(&self, url: &str) -> Result<Branches> {
        let endpoint = self.endpoint("api/repository/branchlist")?;
        let body = serde_json::json!({ "url": url });
        self.transport.post(endpoint, self.auth_token(), &body).await
    }

    /// List the files on one branch of a registered repository
    pub async fn file_list(&self, url: &str, branch: &str) -> Result<Vec<String>> {
        let endpoint = self.endpoint("api/repository/filelist")?;
        let body = serde_json::json!({
            "url": url,
            "branch": branch,
        });
        let files: Files = self.transport.post(endpoint, self.auth_token(), &body).await?;
        Ok(files.files)
    }

    /// Create a deployment from an uploaded resource.
    /// `release` defaults to the current millisecond timestamp in hex,
    /// `version` to [`DEFAULT_VERSION`].
    pub async fn deploy(
        &self,
        name: &str,
        env: &[String],
        plan: &str,
        resource_type: ResourceType,
        release: Option<String>,
        version: Option<String>,
    ) -> Result<Create> {
        let url = self.endpoint("api/deploy/create")?;
        let body = serde_json::json!({
            "resourceType": resource_type,
            "suffix": name,
            "release": release.unwrap_or_else(default_release),
            "env": env,
            "plan": plan,
            "version": version.as_deref().unwrap_or(DEFAULT_VERSION),
        });
        self.transport.post(url, self.auth_token(), &body).await
    }

    /// Tear down a deployment; returns the server's confirmation text
    pub async fn deploy_delete(
        &self,
        prefix: &str,
        suffix: &str,
        version: Option<&str>,
    ) -> Result<String> {
        let url = self.endpoint("api/deploy/delete")?;
        let body = serde_json::json!({
            "prefix": prefix,
            "suffix": suffix,
            "version": version.unwrap_or(DEFAULT_VERSION),
        });
        self.transport.post_text(url, self.auth_token(), &body).await
    }

    /// Fetch one container's log stream for a deployment
    pub async fn logs(
        &self,
        container: &str,
        log_type: LogType,
        suffix: &str,
        prefix: &str,
        version: Option<&str>,
    ) -> Result<String> {
        let url = self.endpoint("api/deploy/logs")?;
        let body = serde_json::json!({
            "container": container,
            "type": log_type,
            "suffix": suffix,
            "prefix": prefix,
            "version": version.unwrap_or(DEFAULT_VERSION),
        });
        self.transport.post_text(url, self.auth_token(), &body).await
    }
}

/// Reduce the server's flat subscription id list into a count by id
pub fn count_subscriptions(ids: Vec<String>) -> SubscriptionMap {
    let mut subscriptions = SubscriptionMap::new();
    for id in ids {
        *subscriptions.entry(id).or_insert(0) += 1;
    }
    subscriptions
}

/// Hex form of the current millisecond timestamp, the default release tag
fn default_release() -> String {
    format!("{:x}", Utc::now().timestamp_millis())
}
