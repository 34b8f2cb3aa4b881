use crate::castersphere_api::types::CasterSphereError;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the room service base URL
pub const ENV_URL: &str = "CASTERSPHERE_URL";
/// Environment variable holding the application identifier
pub const ENV_CLIENT_ID: &str = "CASTERSPHERE_CLIENT_ID";
/// Environment variable holding the shared HMAC secret
pub const ENV_CLIENT_SECRET: &str = "CASTERSPHERE_CLIENT_SECRET";
/// Environment variable holding the calling application's canonical URL
pub const ENV_APP_URL: &str = "APP_URL";
/// Optional: `bearer` or `basic`
pub const ENV_AUTH_SCHEME: &str = "CASTERSPHERE_AUTH_SCHEME";
/// Optional: `json` or `passthrough`
pub const ENV_RESPONSE_MODE: &str = "CASTERSPHERE_RESPONSE_MODE";
/// Optional: `plain` or `signed`
pub const ENV_MESSAGE_MODE: &str = "CASTERSPHERE_MESSAGE_MODE";

/// Scheme used in the `Authorization` header
///
/// The room service accepts exactly one of these per deployment. Sending the
/// other one fails authentication without a useful error, so a client only
/// ever uses the scheme it was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `Authorization: Basic <token>` (token is sent as-is, not base64 user:pass)
    Basic,
}

impl AuthScheme {
    /// Header prefix, without the trailing space
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Basic => "Basic",
        }
    }

    /// Build the `Authorization` header value for a token
    pub fn header_value(&self, token: &str) -> String {
        format!("{} {}", self.as_str(), token)
    }

    /// Extract the token from an `Authorization` header value
    ///
    /// The scheme prefix is case sensitive and must match this scheme.
    pub fn extract_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, CasterSphereError> {
        let prefix = format!("{} ", self.as_str());
        let token = auth_header.strip_prefix(prefix.as_str()).ok_or_else(|| {
            CasterSphereError::TokenVerification(format!(
                "Authorization header must start with '{}'",
                prefix
            ))
        })?;

        let token = token.trim();
        if token.is_empty() {
            return Err(CasterSphereError::TokenVerification(
                "Missing token in Authorization header".to_string(),
            ));
        }

        Ok(token)
    }
}

impl FromStr for AuthScheme {
    type Err = CasterSphereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "basic" => Ok(AuthScheme::Basic),
            other => Err(CasterSphereError::Config(format!(
                "Unknown auth scheme '{}', expected 'bearer' or 'basic'",
                other
            ))),
        }
    }
}

/// How room service responses are handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Parse the body as JSON and re-wrap it with the original status
    #[default]
    Json,
    /// Hand back status and raw body bytes untouched
    Passthrough,
}

impl FromStr for ResponseMode {
    type Err = CasterSphereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseMode::Json),
            "passthrough" | "raw" => Ok(ResponseMode::Passthrough),
            other => Err(CasterSphereError::Config(format!(
                "Unknown response mode '{}', expected 'json' or 'passthrough'",
                other
            ))),
        }
    }
}

/// What goes into the `hashed_msg` field of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageMode {
    /// The message string verbatim
    #[default]
    Plain,
    /// The message wrapped in an `{iss, message}` envelope and HS256-signed
    SignedEnvelope,
}

impl FromStr for MessageMode {
    type Err = CasterSphereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(MessageMode::Plain),
            "signed" | "signed_envelope" | "envelope" => Ok(MessageMode::SignedEnvelope),
            other => Err(CasterSphereError::Config(format!(
                "Unknown message mode '{}', expected 'plain' or 'signed'",
                other
            ))),
        }
    }
}

/// Room service client configuration
///
/// Validated once by [`ClientConfigBuilder::build`] or
/// [`ClientConfig::from_env`] and read-only afterwards. The shared secret is
/// a [`SecretString`] so `{:?}` never prints it.
pub struct ClientConfig {
    base_url: String,
    app_id: String,
    shared_secret: SecretString,
    app_issuer_url: String,
    auth_scheme: AuthScheme,
    response_mode: ResponseMode,
    message_mode: MessageMode,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("shared_secret", &"[REDACTED]")
            .field("app_issuer_url", &self.app_issuer_url)
            .field("auth_scheme", &self.auth_scheme)
            .field("response_mode", &self.response_mode)
            .field("message_mode", &self.message_mode)
            .finish()
    }
}

impl ClientConfig {
    /// Start building a configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from the process environment
    ///
    /// Required: `CASTERSPHERE_URL`, `CASTERSPHERE_CLIENT_ID`,
    /// `CASTERSPHERE_CLIENT_SECRET`, `APP_URL`. Optional:
    /// `CASTERSPHERE_AUTH_SCHEME`, `CASTERSPHERE_RESPONSE_MODE`,
    /// `CASTERSPHERE_MESSAGE_MODE`.
    pub fn from_env() -> Result<Self, CasterSphereError> {
        let mut builder = ClientConfig::builder()
            .with_base_url(required_env(ENV_URL)?)
            .with_app_id(required_env(ENV_CLIENT_ID)?)
            .with_shared_secret(required_env(ENV_CLIENT_SECRET)?)
            .with_app_issuer_url(required_env(ENV_APP_URL)?);

        if let Some(value) = optional_env(ENV_AUTH_SCHEME) {
            builder = builder.with_auth_scheme(value.parse()?);
        }
        if let Some(value) = optional_env(ENV_RESPONSE_MODE) {
            builder = builder.with_response_mode(value.parse()?);
        }
        if let Some(value) = optional_env(ENV_MESSAGE_MODE) {
            builder = builder.with_message_mode(value.parse()?);
        }

        tracing::debug!("Loaded CasterSphere configuration from environment");
        builder.build()
    }

    /// Room service base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Application identifier sent in the `app-id` header
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Canonical URL of the calling application, used as `iss`
    pub fn app_issuer_url(&self) -> &str {
        &self.app_issuer_url
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth_scheme
    }

    pub fn response_mode(&self) -> ResponseMode {
        self.response_mode
    }

    pub fn message_mode(&self) -> MessageMode {
        self.message_mode
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.shared_secret.expose_secret().as_bytes()
    }

    /// Join the base URL and an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn required_env(name: &str) -> Result<String, CasterSphereError> {
    optional_env(name).ok_or_else(|| {
        CasterSphereError::Config(format!("Environment variable {} is not set", name))
    })
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    app_id: Option<String>,
    shared_secret: Option<SecretString>,
    app_issuer_url: Option<String>,
    auth_scheme: AuthScheme,
    response_mode: ResponseMode,
    message_mode: MessageMode,
}

impl ClientConfigBuilder {
    /// Set the room service base URL (builder pattern)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the application identifier (builder pattern)
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the shared HMAC secret (builder pattern)
    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Set the issuer URL placed in every token (builder pattern)
    pub fn with_app_issuer_url(mut self, url: impl Into<String>) -> Self {
        self.app_issuer_url = Some(url.into());
        self
    }

    /// Set the `Authorization` scheme (builder pattern)
    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Set the response normalization mode (builder pattern)
    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.response_mode = mode;
        self
    }

    /// Set the `hashed_msg` policy (builder pattern)
    pub fn with_message_mode(mut self, mode: MessageMode) -> Self {
        self.message_mode = mode;
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<ClientConfig, CasterSphereError> {
        let base_url = self
            .base_url
            .ok_or_else(|| CasterSphereError::Config("Base URL is required".to_string()))?;
        validate_http_url("Base URL", &base_url)?;

        let app_id = self
            .app_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CasterSphereError::Config("App id is required".to_string()))?;

        let shared_secret = self
            .shared_secret
            .filter(|s| !s.expose_secret().is_empty())
            .ok_or_else(|| CasterSphereError::Config("Shared secret is required".to_string()))?;

        let app_issuer_url = self.app_issuer_url.ok_or_else(|| {
            CasterSphereError::Config("App issuer URL is required".to_string())
        })?;
        if app_issuer_url.trim().is_empty() {
            return Err(CasterSphereError::Config(
                "App issuer URL must not be empty".to_string(),
            ));
        }

        Ok(ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id,
            shared_secret,
            app_issuer_url,
            auth_scheme: self.auth_scheme,
            response_mode: self.response_mode,
            message_mode: self.message_mode,
        })
    }
}

fn validate_http_url(label: &str, value: &str) -> Result<(), CasterSphereError> {
    let parsed = url::Url::parse(value).map_err(|e| {
        CasterSphereError::Config(format!("{} '{}' is not a valid URL: {}", label, value, e))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CasterSphereError::Config(format!(
            "{} must use http or https, got '{}'",
            label, other
        ))),
    }
}
