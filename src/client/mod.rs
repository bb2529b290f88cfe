//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod contacts;
mod sms;
#[cfg(test)]
mod test_support;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{ApiToken, ErrorCode, Sms, ValidationError};

pub use contacts::{ContactsFeature, GroupsFeature};
pub use sms::SmsFeature;

/// Environment variable holding the API token for [`SmsapiClientBuilder::from_env`].
pub const TOKEN_ENV: &str = "SMSAPI_TOKEN";
/// Optional environment variable overriding the API base URL.
pub const URI_ENV: &str = "SMSAPI_URI";

pub type BoxError = Box<dyn StdError + Send + Sync>;
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone)]
/// One call to the SMSAPI HTTP API, ready to be put on the wire.
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub bearer_token: ApiToken,
    /// Sent as `application/x-www-form-urlencoded`; empty means no body.
    pub form: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs the HTTP request/response cycle.
///
/// The default implementation wraps `reqwest`. Implement this to route calls through your own
/// HTTP stack; implementations must be safe to share between concurrent calls.
pub trait HttpTransport: Send + Sync {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method.as_reqwest(), request.url)
                .bearer_auth(request.bearer_token.as_str());
            if !request.form.is_empty() {
                builder = builder.form(&request.form);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// SMSAPI deployment to talk to.
pub enum Service {
    /// `https://api.smsapi.pl/`
    #[default]
    Pl,
    /// `https://api.smsapi.com/`
    Com,
}

impl Service {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Pl => "https://api.smsapi.pl/",
            Self::Com => "https://api.smsapi.com/",
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsapiClient`] and its features.
///
/// Nothing is retried or swallowed: every failure of a call surfaces here.
pub enum SmsapiError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-successful HTTP status without a recognizable error payload.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// SMSAPI rejected the call; code and message are kept verbatim.
    #[error("API error {code}: {message:?}")]
    Api {
        http_status: u16,
        code: ErrorCode,
        message: Option<String>,
    },

    /// The gateway accepted fewer messages than requested.
    ///
    /// Batches are all-or-nothing: whatever was accepted is returned here rather than as a
    /// successful result.
    #[error("incomplete batch: {} of {expected} messages accepted", .accepted.len())]
    IncompleteBatch {
        expected: usize,
        accepted: Vec<Sms>,
        invalid_numbers: Vec<String>,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] BoxError),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// One of the domain constructors or pre-flight checks rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Clone)]
/// Builder for [`SmsapiClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent, or transport.
pub struct SmsapiClientBuilder {
    token: ApiToken,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SmsapiClientBuilder {
    /// Create a builder targeting [`Service::Pl`].
    pub fn new(token: ApiToken) -> Self {
        Self {
            token,
            base_url: Service::default().base_url().to_owned(),
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Configure from `SMSAPI_TOKEN` (required) and `SMSAPI_URI` (optional).
    pub fn from_env() -> Result<Self, SmsapiError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SmsapiError> {
        let token = lookup(TOKEN_ENV).ok_or_else(|| {
            SmsapiError::Config(format!("{TOKEN_ENV} environment variable is required"))
        })?;
        let mut builder = Self::new(ApiToken::new(token)?);
        if let Some(uri) = lookup(URI_ENV).filter(|uri| !uri.trim().is_empty()) {
            builder = builder.base_url(uri);
        }
        Ok(builder)
    }

    /// Target one of the public SMSAPI deployments.
    pub fn service(mut self, service: Service) -> Self {
        self.base_url = service.base_url().to_owned();
        self
    }

    /// Override the API base URL (e.g. a proxy or a local fake).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom [`HttpTransport`] instead of the built-in reqwest one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`SmsapiClient`].
    pub fn build(self) -> Result<SmsapiClient, SmsapiError> {
        let base_url = parse_base_url(&self.base_url)?;

        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| SmsapiError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        Ok(SmsapiClient {
            token: self.token,
            base_url,
            http,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, SmsapiError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| SmsapiError::Config(format!("invalid base URL {raw:?}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(SmsapiError::Config(format!(
            "base URL must be an http(s) URL: {raw:?}"
        )));
    }
    Ok(url)
}

#[derive(Clone)]
/// High-level SMSAPI client.
///
/// Cheap to clone and safe to share; every feature call is one independent HTTP request.
/// Features borrow the client:
///
/// - [`SmsapiClient::sms`] for sending and scheduling messages,
/// - [`SmsapiClient::contacts`] for the contacts database and its groups.
pub struct SmsapiClient {
    token: ApiToken,
    base_url: Url,
    http: Arc<dyn HttpTransport>,
}

impl SmsapiClient {
    /// Create a client for [`Service::Pl`] with the default transport.
    ///
    /// For more customization, use [`SmsapiClient::builder`].
    pub fn new(token: ApiToken) -> Result<Self, SmsapiError> {
        SmsapiClientBuilder::new(token).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(token: ApiToken) -> SmsapiClientBuilder {
        SmsapiClientBuilder::new(token)
    }

    pub fn sms(&self) -> SmsFeature<'_> {
        SmsFeature::new(self)
    }

    pub fn contacts(&self) -> ContactsFeature<'_> {
        ContactsFeature::new(self)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // The base URL is checked to be an http(s) base in `parse_base_url`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issue one request and return the body of a successful response.
    ///
    /// An error payload wins over the HTTP status: SMSAPI reports some failures with `200 OK`.
    async fn execute(
        &self,
        operation: &'static str,
        method: HttpMethod,
        url: Url,
        form: Vec<(String, String)>,
    ) -> Result<String, SmsapiError> {
        tracing::debug!(operation, method = ?method, path = url.path(), "dispatching SMSAPI request");

        let response = self
            .http
            .send(HttpRequest {
                method,
                url,
                bearer_token: self.token.clone(),
                form,
            })
            .await
            .map_err(SmsapiError::Transport)?;

        if let Some(payload) = crate::transport::decode_api_error(&response.body) {
            tracing::warn!(
                operation,
                http_status = response.status,
                code = payload.code.as_str(),
                "SMSAPI rejected request"
            );
            return Err(SmsapiError::Api {
                http_status: response.status,
                code: payload.code,
                message: payload.message,
            });
        }

        if !(200..=299).contains(&response.status) {
            tracing::warn!(operation, http_status = response.status, "unexpected HTTP status");
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(SmsapiError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response.body)
    }
}

fn parse_error(err: crate::transport::TransportError) -> SmsapiError {
    SmsapiError::Parse(Box::new(err))
}
