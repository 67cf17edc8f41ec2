//! Client layer: one authenticated session against the Spider gateway.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{BearerToken, Password, SendMail, SendSms, SenderAddress, Username};
use crate::transport::{self, EscapePolicy, RecipientFormat, TransportError};

const LOGIN_PATH: &str = "api/v1/login";
const SEND_MAIL_PATH: &str = "api/v1/sendmail";
const SEND_SMS_PATH: &str = "api/v1/sendsms";

/// Per-request timeout applied unless overridden on the builder.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: serde_json::Value,
        bearer: Option<&'a str>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: serde_json::Value,
        bearer: Option<&'a str>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut request = self.client.post(url).json(&body);
            if let Some(token) = bearer {
                request = request.bearer_auth(token);
            }
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Why a login attempt did not produce a usable session.
pub enum AuthError {
    /// The login HTTP call itself failed (DNS, TLS, timeout).
    #[error("login request failed: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The gateway rejected the credentials or errored out.
    #[error("login returned HTTP status {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The login response body was not the expected JSON document.
    #[error("login response could not be parsed: {0}")]
    Parse(#[source] serde_json::Error),

    /// The login response parsed but carried no usable access token.
    #[error("login response carries no access token")]
    MissingToken,
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SpiderClient`].
///
/// Per-recipient delivery failures are not errors at this level: a non-2xx
/// status from a send endpoint is recorded in that recipient's
/// [`SendResult`] and the batch continues.
pub enum GatewayError {
    /// HTTP client / transport failure outside of login (DNS, TLS, timeouts).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Login failed; no sends were attempted.
    #[error("authentication failed: {0}")]
    Authentication(#[source] AuthError),

    /// A send was attempted before a successful [`SpiderClient::login`].
    #[error("not authenticated: call login() before sending")]
    NotAuthenticated,

    /// A request payload could not be encoded.
    #[error("wire format error: {0}")]
    Wire(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of one send attempt, in attempt order within a batch.
pub struct SendResult {
    /// The recipient this attempt targeted.
    pub recipient: String,
    /// HTTP status returned by the gateway.
    pub status: u16,
    /// Raw response body, useful for operator diagnostics.
    pub body: String,
}

impl SendResult {
    /// Whether the gateway accepted this send.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SpiderClient`].
pub struct SpiderClientBuilder {
    base_url: Url,
    username: Username,
    password: Password,
    default_sender: Option<SenderAddress>,
    from_name: Option<String>,
    recipient_format: RecipientFormat,
    escape_policy: EscapePolicy,
    timeout: Duration,
    user_agent: Option<String>,
}

impl SpiderClientBuilder {
    /// Create a builder with the default timeout and wire formats.
    pub fn new(base_url: Url, username: Username, password: Password) -> Self {
        Self {
            base_url,
            username,
            password,
            default_sender: None,
            from_name: None,
            recipient_format: RecipientFormat::default(),
            escape_policy: EscapePolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Sender address used for mail when the request does not carry one.
    pub fn default_sender(mut self, sender: SenderAddress) -> Self {
        self.default_sender = Some(sender);
        self
    }

    /// Display name for the `fromName` wire field; defaults to the sender
    /// address itself.
    pub fn from_name(mut self, from_name: impl Into<String>) -> Self {
        self.from_name = Some(from_name.into());
        self
    }

    /// Select the serialization shape of mail recipients.
    pub fn recipient_format(mut self, format: RecipientFormat) -> Self {
        self.recipient_format = format;
        self
    }

    /// Select how plain text is escaped in the generated HTML fallback.
    pub fn escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.escape_policy = policy;
        self
    }

    /// Set an HTTP client timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SpiderClient`].
    pub fn build(self) -> Result<SpiderClient, GatewayError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(Box::new(err)))?;

        let base = self.base_url.as_str().trim_end_matches('/').to_owned();
        Ok(SpiderClient {
            login_endpoint: format!("{base}/{LOGIN_PATH}"),
            send_mail_endpoint: format!("{base}/{SEND_MAIL_PATH}"),
            send_sms_endpoint: format!("{base}/{SEND_SMS_PATH}"),
            username: self.username,
            password: self.password,
            default_sender: self.default_sender,
            from_name: self.from_name,
            recipient_format: self.recipient_format,
            escape_policy: self.escape_policy,
            token: None,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

/// One session against the Spider gateway: login once, then send.
///
/// The session is invalid for sending until [`SpiderClient::login`] has
/// completed; the stored token is used until the process exits, with no
/// refresh or expiry handling.
pub struct SpiderClient {
    login_endpoint: String,
    send_mail_endpoint: String,
    send_sms_endpoint: String,
    username: Username,
    password: Password,
    default_sender: Option<SenderAddress>,
    from_name: Option<String>,
    recipient_format: RecipientFormat,
    escape_policy: EscapePolicy,
    token: Option<BearerToken>,
    http: Arc<dyn HttpTransport>,
}

impl SpiderClient {
    /// Start building a client.
    pub fn builder(base_url: Url, username: Username, password: Password) -> SpiderClientBuilder {
        SpiderClientBuilder::new(base_url, username, password)
    }

    /// Sender address configured for mail sends, if any.
    pub fn default_sender(&self) -> Option<&SenderAddress> {
        self.default_sender.as_ref()
    }

    /// Whether [`SpiderClient::login`] has completed on this session.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Authenticate against `{base_url}/api/v1/login` and store the bearer
    /// token for the rest of the session.
    ///
    /// Fails with [`GatewayError::Authentication`] when the HTTP call errors,
    /// the gateway returns a non-2xx status, or the response body lacks a
    /// usable token.
    pub async fn login(&mut self) -> Result<(), GatewayError> {
        let body = transport::encode_login_request(&self.username, &self.password)?;

        let response = self
            .http
            .post_json(&self.login_endpoint, body, None)
            .await
            .map_err(|err| GatewayError::Authentication(AuthError::Transport(err)))?;

        if !(200..=299).contains(&response.status) {
            return Err(GatewayError::Authentication(AuthError::HttpStatus {
                status: response.status,
                body: non_empty(response.body),
            }));
        }

        let token = transport::decode_login_response(&response.body).map_err(|err| {
            GatewayError::Authentication(match err {
                TransportError::Json(err) => AuthError::Parse(err),
                TransportError::MissingToken => AuthError::MissingToken,
            })
        })?;

        tracing::debug!("login succeeded, bearer token stored");
        self.token = Some(token);
        Ok(())
    }

    /// Send one mail request, fanning out to one HTTP call per recipient.
    ///
    /// Requests are issued strictly sequentially, so the returned results
    /// are in attempt order. A non-2xx status from the gateway is recorded
    /// in that recipient's [`SendResult`] and does not stop the batch.
    ///
    /// When the request carries no explicit HTML body, a fallback rendering
    /// of the plain text is generated according to the configured
    /// [`EscapePolicy`]; with the default `Raw` policy the text is not
    /// escaped, so do not pass untrusted markup expecting safety.
    pub async fn send_mail(&self, request: &SendMail) -> Result<Vec<SendResult>, GatewayError> {
        let token = self.token.as_ref().ok_or(GatewayError::NotAuthenticated)?;

        let fallback;
        let html = match request.html() {
            Some(html) => html,
            None => {
                fallback = transport::html_from_text(request.body(), self.escape_policy);
                &fallback
            }
        };
        let from_name = self
            .from_name
            .as_deref()
            .unwrap_or_else(|| request.sender().as_str());

        let mut results = Vec::with_capacity(request.recipients().len());
        for recipient in request.recipients() {
            let body = transport::encode_send_mail_request(
                request.sender(),
                from_name,
                recipient,
                self.recipient_format,
                request.subject(),
                request.body(),
                html,
            )?;

            tracing::debug!(recipient = recipient.as_str(), "posting sendmail request");
            let response = self
                .http
                .post_json(&self.send_mail_endpoint, body, Some(token.as_str()))
                .await
                .map_err(GatewayError::Transport)?;

            if !(200..=299).contains(&response.status) {
                tracing::warn!(
                    recipient = recipient.as_str(),
                    status = response.status,
                    "sendmail rejected"
                );
            }
            results.push(SendResult {
                recipient: recipient.as_str().to_owned(),
                status: response.status,
                body: response.body,
            });
        }
        Ok(results)
    }

    /// Send one SMS to a single recipient.
    ///
    /// A non-2xx gateway status is returned in the [`SendResult`] for the
    /// caller to report, not raised as an error.
    pub async fn send_sms(&self, request: &SendSms) -> Result<SendResult, GatewayError> {
        let token = self.token.as_ref().ok_or(GatewayError::NotAuthenticated)?;

        let body = transport::encode_send_sms_request(request)?;
        tracing::debug!(
            recipient = request.recipient().as_str(),
            "posting sendsms request"
        );
        let response = self
            .http
            .post_json(&self.send_sms_endpoint, body, Some(token.as_str()))
            .await
            .map_err(GatewayError::Transport)?;

        if !(200..=299).contains(&response.status) {
            tracing::warn!(
                recipient = request.recipient().as_str(),
                status = response.status,
                "sendsms rejected"
            );
        }
        Ok(SendResult {
            recipient: request.recipient().as_str().to_owned(),
            status: response.status,
            body: response.body,
        })
    }
}

fn non_empty(body: String) -> Option<String> {
    if body.trim().is_empty() { None } else { Some(body) }
}
