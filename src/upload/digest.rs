//! Digest-authenticated HTTP exchange
//!
//! A request is first sent as-is. When the server answers `401` with a
//! `WWW-Authenticate: Digest ...` challenge, the challenge is answered and the
//! request is sent again with an `Authorization` header. Any other response
//! is handed back untouched.

use digest_auth::AuthContext;
use reqwest::header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Client, Request, Response, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

/// Failure of a single authenticated exchange
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid digest challenge: {0}")]
    Challenge(#[from] digest_auth::Error),

    #[error("invalid authorization header: {0}")]
    Header(#[from] InvalidHeaderValue),

    #[error("request body cannot be replayed")]
    NotReplayable,
}

/// HTTP client that answers digest challenges with fixed credentials
///
/// Challenge answers are computed for POST, the only method this crate sends.
#[derive(Debug, Clone)]
pub struct DigestClient {
    client: Client,
    username: String,
    password: String,
}

impl DigestClient {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            username: username.into(),
            password: password.into(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Send `request`, answering a digest challenge if the server issues one.
    ///
    /// `request` is only cloned, so the caller can send it again later with
    /// identical headers and body.
    pub async fn send(&self, request: &Request) -> Result<Response, ExchangeError> {
        let first = request.try_clone().ok_or(ExchangeError::NotReplayable)?;
        let response = self.client.execute(first).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let challenge = match response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
        {
            Some(v) if is_digest_challenge(v) => v.to_string(),
            _ => return Ok(response),
        };
        drain(response).await;

        let authorization = self.answer(&challenge, request)?;
        let mut authed = request.try_clone().ok_or(ExchangeError::NotReplayable)?;
        authed
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_str(&authorization)?);

        debug!("Answered digest challenge for {}", request.url());
        Ok(self.client.execute(authed).await?)
    }

    fn answer(&self, challenge: &str, request: &Request) -> Result<String, ExchangeError> {
        let mut prompt = digest_auth::parse(challenge)?;
        let body = request.body().and_then(|b| b.as_bytes());
        let context = AuthContext::new_post(
            self.username.as_str(),
            self.password.as_str(),
            request_uri(request.url()),
            body,
        );
        Ok(prompt.respond(&context)?.to_header_string())
    }
}

/// Read and discard a response body so the connection can be reused
pub(crate) async fn drain(response: Response) {
    if let Err(e) = response.bytes().await {
        debug!("Failed to drain response body: {}", e);
    }
}

/// Check whether a `WWW-Authenticate` value is a digest challenge
fn is_digest_challenge(value: &str) -> bool {
    value
        .split_whitespace()
        .next()
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
}

/// The request-target used in the digest `uri` field (path plus query)
fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
