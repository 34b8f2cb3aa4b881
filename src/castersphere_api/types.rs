use serde::{Deserialize, Serialize};
use std::fmt;

/// CasterSphere SDK error type
///
/// Represents everything that can go wrong between building a client and
/// receiving a normalized room service response. Non-2xx HTTP statuses are
/// deliberately absent: they come back as a [`RoomOperationResult`] so the
/// caller can branch on the remote service's own error semantics.
///
/// [`RoomOperationResult`]: crate::castersphere_api::resources::RoomOperationResult
#[derive(Debug)]
pub enum CasterSphereError {
    /// Missing or invalid configuration (secret, base URL, app id, issuer URL)
    Config(String),
    /// Token or message envelope signing failed
    Signing(String),
    /// Network or connection failure while talking to the room service
    Transport(TransportError),
    /// Response body was not valid JSON while JSON normalization was configured
    ResponseDecode {
        /// HTTP status of the response that failed to decode
        status: u16,
        /// Parser error message
        message: String,
        /// Raw response body, kept for diagnostics
        body: Vec<u8>,
    },
    /// A token could not be verified with the shared secret
    TokenVerification(String),
}

impl fmt::Display for CasterSphereError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CasterSphereError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CasterSphereError::Signing(msg) => write!(f, "Token signing failed: {}", msg),
            CasterSphereError::Transport(err) => write!(f, "Transport error: {}", err),
            CasterSphereError::ResponseDecode {
                status, message, ..
            } => write!(
                f,
                "Failed to decode HTTP {} response body: {}",
                status, message
            ),
            CasterSphereError::TokenVerification(msg) => {
                write!(f, "Token verification failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for CasterSphereError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CasterSphereError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for CasterSphereError {
    fn from(err: TransportError) -> Self {
        CasterSphereError::Transport(err)
    }
}

impl CasterSphereError {
    /// Raw body attached to a decode failure, if any
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            CasterSphereError::ResponseDecode { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Transport-level errors
///
/// Raised when no HTTP response was obtained at all. Retrying is left to the
/// caller or to the transport it plugged in.
#[derive(Debug)]
pub enum TransportError {
    /// Could not connect to the room service
    Connect(String),
    /// Request timed out
    Timeout,
    /// Any other network error (reading the body, redirects, ...)
    Network(String),
    /// Request building failed before anything was sent
    Request(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Timeout => write!(f, "Request timeout"),
            TransportError::Network(msg) => write!(f, "Network error: {}", msg),
            TransportError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::Request(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// The identity a request is made on behalf of
///
/// Supplied by the host application's own authentication layer; this SDK
/// never logs anyone in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque user identifier, sent as `sender_id`
    pub id: String,
    /// User email, sent as `username`
    pub email: String,
}

impl Principal {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}
