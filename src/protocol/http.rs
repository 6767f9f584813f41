//! HTTP transport for FaaS REST calls

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let sanitized: String = body
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(MAX_LOG_BODY_LENGTH)
        .collect();

    if sanitized.len() < body.len() {
        format!("{}... [truncated, {} bytes total]", sanitized, body.len())
    } else {
        sanitized
    }
}

/// Attach the FaaS auth header to a request when a token is present.
/// The scheme is the literal `jwt`, not `Bearer`.
fn with_auth(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) if !token.is_empty() => {
            request.header(AUTHORIZATION, format!("jwt {token}"))
        }
        _ => request,
    }
}

/// HTTP client wrapper for FaaS API calls
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("faas-protocol/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// The underlying reqwest client, for callers that compose their own
    /// requests before handing them to [`execute`](Self::execute)
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Send a request and normalize the outcome: connection failures map to
    /// a connect-flagged error, non-2xx statuses to an API error with the
    /// body preserved.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, String)> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::http_status(status, body));
        }

        Ok((status, body))
    }

    /// Make a GET request and decode the JSON response
    pub async fn get<T: DeserializeOwned>(&self, url: Url, token: Option<&str>) -> Result<T> {
        tracing::debug!("GET {}", url);

        let request = with_auth(self.client.get(url), token);
        let (status, body) = self.execute(request).await?;

        decode_json(status, &body)
    }

    /// Make a GET request and return the raw response body
    pub async fn get_text(&self, url: Url, token: Option<&str>) -> Result<String> {
        tracing::debug!("GET {}", url);

        let request = with_auth(self.client.get(url), token);
        let (_, body) = self.execute(request).await?;

        Ok(body)
    }

    /// Make a GET request and return only the response status.
    /// Non-2xx statuses are returned as-is, not mapped to errors.
    pub async fn get_status(&self, url: Url, token: Option<&str>) -> Result<StatusCode> {
        tracing::debug!("GET {}", url);

        let request = with_auth(self.client.get(url), token);
        let response = request.send().await?;

        Ok(response.status())
    }

    /// Make a POST request with a JSON body and decode the JSON response
    pub async fn post<T, B>(&self, url: Url, token: Option<&str>, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!("POST {}", url);

        let request = with_auth(self.client.post(url), token).json(body);
        let (status, body) = self.execute(request).await?;

        decode_json(status, &body)
    }

    /// Make a POST request with a JSON body and return the raw response body
    pub async fn post_text<B>(&self, url: Url, token: Option<&str>, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!("POST {}", url);

        let request = with_auth(self.client.post(url), token).json(body);
        let (_, body) = self.execute(request).await?;

        Ok(body)
    }

    /// Make a multipart POST request and return the raw response body
    pub async fn post_multipart(
        &self,
        url: Url,
        token: Option<&str>,
        form: Form,
    ) -> Result<String> {
        tracing::debug!("POST {} (multipart)", url);

        let request = with_auth(self.client.post(url), token).multipart(form);
        let (_, body) = self.execute(request).await?;

        Ok(body)
    }
}

/// Decode a JSON response body, keeping the status and raw body in the error
fn decode_json<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::decode(status, body.to_string(), &e))
}
