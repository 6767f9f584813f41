//! Account authentication
//!
//! Login and signup run before any token exists, so they live outside
//! [`FaasClient`](super::api::FaasClient) as free functions. Both return the
//! token text the server answers with.

use reqwest::header::{ACCEPT, ORIGIN};
use serde::Serialize;
use url::Url;

use super::api::normalize_base_url;
use super::http::HttpTransport;
use crate::error::Result;

/// Placeholder the server accepts in place of a solved captcha.
/// Local planes skip captcha validation entirely, so it is omitted there.
const RECAPTCHA_EMPTY: &str = "empty";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "g-recaptcha-response", skip_serializing_if = "Option::is_none")]
    recaptcha: Option<&'a str>,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    alias: &'a str,
    #[serde(rename = "g-recaptcha-response", skip_serializing_if = "Option::is_none")]
    recaptcha: Option<&'a str>,
}

/// Whether the base URL points at a local plane
fn is_local(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => true,
    }
}

async fn submit<B: Serialize>(url: Url, base: &Url, body: &B) -> Result<String> {
    let transport = HttpTransport::new()?;

    tracing::debug!("POST {}", url);

    let request = transport
        .client()
        .post(url)
        .header(ACCEPT, "application/json, text/plain, */*")
        .header(ORIGIN, base.origin().ascii_serialization())
        .json(body);

    let (_, body) = transport.execute(request).await?;
    Ok(body)
}

/// Log into an existing account; returns the auth token
pub async fn login(email: &str, password: &str, base_url: &str) -> Result<String> {
    let base = normalize_base_url(base_url)?;
    let url = base.join("login")?;

    let request = LoginRequest {
        email,
        password,
        recaptcha: (!is_local(&base)).then_some(RECAPTCHA_EMPTY),
    };

    submit(url, &base, &request).await
}

/// Create an account; returns the auth token
pub async fn signup(email: &str, password: &str, alias: &str, base_url: &str) -> Result<String> {
    let base = normalize_base_url(base_url)?;
    let url = base.join("signup")?;

    let request = SignupRequest {
        email,
        password,
        alias,
        recaptcha: (!is_local(&base)).then_some(RECAPTCHA_EMPTY),
    };

    submit(url, &base, &request).await
}
