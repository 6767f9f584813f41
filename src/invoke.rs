//! Function invocation
//!
//! Calls deployed functions through the gateway routes the plane exposes for
//! each deployment. Invocation is transport-wise identical to the resource
//! API but tolerant in what it accepts back: deployed functions may answer
//! with JSON, plain text, or nothing at all.

use serde_json::Value;

use crate::error::Result;
use crate::protocol::api::{FaasClient, DEFAULT_VERSION};

/// Which gateway route to dispatch through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeMode {
    /// Synchronous route; the response is the return value
    Call,
    /// Long-running route; the server parks the request until the function
    /// resolves
    Await,
}

impl InvokeMode {
    fn as_segment(&self) -> &'static str {
        match self {
            InvokeMode::Call => "call",
            InvokeMode::Await => "await",
        }
    }
}

/// Build the gateway path for one function, percent-encoding every
/// caller-supplied segment
pub fn invoke_path(
    mode: InvokeMode,
    prefix: &str,
    suffix: &str,
    version: Option<&str>,
    name: &str,
) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        urlencoding::encode(prefix),
        urlencoding::encode(suffix),
        urlencoding::encode(version.unwrap_or(DEFAULT_VERSION)),
        mode.as_segment(),
        urlencoding::encode(name),
    )
}

impl FaasClient {
    /// Invoke a deployed function.
    ///
    /// `args = None` issues a bare GET; `Some(args)` POSTs the JSON array,
    /// so `Some(&[])` still sends `[]` and reaches the function with zero
    /// arguments. The response body maps to [`Value::Null`] when empty, a
    /// parsed [`Value`] when it is JSON, and [`Value::String`] otherwise.
    pub async fn invoke(
        &self,
        mode: InvokeMode,
        prefix: &str,
        suffix: &str,
        version: Option<&str>,
        name: &str,
        args: Option<&[Value]>,
    ) -> Result<Value> {
        let path = invoke_path(mode, prefix, suffix, version, name);
        let url = self.endpoint(&path)?;

        let body = match args {
            None => self.transport().get_text(url, self.auth_token()).await?,
            Some(args) => {
                self.transport()
                    .post_text(url, self.auth_token(), args)
                    .await?
            }
        };

        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => Value::String(body),
        })
    }

    /// Invoke through the synchronous route
    pub async fn call(
        &self,
        prefix: &str,
        suffix: &str,
        version: Option<&str>,
        name: &str,
        args: Option<&[Value]>,
    ) -> Result<Value> {
        self.invoke(InvokeMode::Call, prefix, suffix, version, name, args)
            .await
    }

    /// Invoke through the long-running route
    pub async fn await_call(
        &self,
        prefix: &str,
        suffix: &str,
        version: Option<&str>,
        name: &str,
        args: Option<&[Value]>,
    ) -> Result<Value> {
        self.invoke(InvokeMode::Await, prefix, suffix, version, name, args)
            .await
    }
}
