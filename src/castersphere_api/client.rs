use crate::castersphere_api::config::{ClientConfig, MessageMode, ResponseMode};
use crate::castersphere_api::jwt::TokenIssuer;
use crate::castersphere_api::resources::{
    MessageRequest, ResponseBody, RoomOperationResult, RoomRequest,
};
use crate::castersphere_api::session::PrincipalProvider;
use crate::castersphere_api::transport::{
    HttpMethod, HttpTransport, OutboundRequest, RawResponse, ReqwestTransport,
};
use crate::castersphere_api::types::{CasterSphereError, TransportError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Header carrying the application identifier
pub const APP_ID_HEADER: &str = "app-id";

pub const ROOMS_PATH: &str = "/rooms";
pub const CREATE_ROOM_PATH: &str = "/create-room";
pub const JOIN_PATH: &str = "/join";
pub const LEAVE_PATH: &str = "/leave";
pub const MESSAGE_PATH: &str = "/message";

/// HTTP client for the CasterSphere room service
///
/// Every call mints a fresh token for whatever principal the provider
/// returns at that moment, attaches it with the configured auth scheme along
/// with the `app-id` header, and normalizes the response with the configured
/// [`ResponseMode`]. Cheap to clone; clones share configuration and
/// transport.
#[derive(Clone)]
pub struct RoomServiceClient {
    config: Arc<ClientConfig>,
    issuer: TokenIssuer,
    principals: Arc<dyn PrincipalProvider>,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for RoomServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomServiceClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RoomServiceClient {
    /// Create a client that sends requests with `reqwest`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use castersphere_sdk::{ClientConfig, Principal, RoomServiceClient};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ClientConfig::builder()
    ///     .with_base_url("https://rooms.example.com")
    ///     .with_app_id("app-123")
    ///     .with_shared_secret("shared-secret")
    ///     .with_app_issuer_url("https://app.example.com")
    ///     .build()?;
    ///
    /// let client = RoomServiceClient::new(config, Principal::new("42", "ada@example.com"));
    /// let rooms = client.list_rooms().await?;
    /// println!("HTTP {}: {:?}", rooms.status, rooms.as_json());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig, principals: impl PrincipalProvider + 'static) -> Self {
        Self::with_transport(config, principals, ReqwestTransport::new())
    }

    /// Create a client with a custom transport
    pub fn with_transport(
        config: ClientConfig,
        principals: impl PrincipalProvider + 'static,
        transport: impl HttpTransport + 'static,
    ) -> Self {
        tracing::info!(
            "Creating RoomServiceClient: base_url={}, auth_scheme={}, response_mode={:?}, message_mode={:?}",
            config.base_url(),
            config.auth_scheme().as_str(),
            config.response_mode(),
            config.message_mode()
        );

        let config = Arc::new(config);
        Self {
            issuer: TokenIssuer::new(Arc::clone(&config)),
            config,
            principals: Arc::new(principals),
            transport: Arc::new(transport),
        }
    }

    /// Create a `reqwest`-backed client from environment configuration
    pub fn from_env(principals: impl PrincipalProvider + 'static) -> Result<Self, CasterSphereError> {
        Ok(Self::new(ClientConfig::from_env()?, principals))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token issuer sharing this client's configuration
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// List rooms (`GET /rooms`)
    pub async fn list_rooms(&self) -> Result<RoomOperationResult, CasterSphereError> {
        self.execute(HttpMethod::Get, ROOMS_PATH, None).await
    }

    /// Create a room (`POST /create-room`)
    pub async fn create_room(
        &self,
        room: impl Into<String>,
    ) -> Result<RoomOperationResult, CasterSphereError> {
        let body = to_body(&RoomRequest { room: room.into() })?;
        self.execute(HttpMethod::Post, CREATE_ROOM_PATH, Some(body))
            .await
    }

    /// Join a room (`POST /join`)
    pub async fn join_room(
        &self,
        room: impl Into<String>,
    ) -> Result<RoomOperationResult, CasterSphereError> {
        let body = to_body(&RoomRequest { room: room.into() })?;
        self.execute(HttpMethod::Post, JOIN_PATH, Some(body)).await
    }

    /// Leave a room (`POST /leave`)
    pub async fn leave_room(
        &self,
        room: impl Into<String>,
    ) -> Result<RoomOperationResult, CasterSphereError> {
        let body = to_body(&RoomRequest { room: room.into() })?;
        self.execute(HttpMethod::Post, LEAVE_PATH, Some(body)).await
    }

    /// Send a message to a room (`POST /message`)
    ///
    /// With [`MessageMode::SignedEnvelope`] the message is wrapped in an
    /// `{iss, message}` envelope and signed before it goes into `hashed_msg`;
    /// otherwise it is sent verbatim. `persist` asks the room service to
    /// store the message.
    pub async fn send_message(
        &self,
        room: impl Into<String>,
        message: &str,
        persist: bool,
    ) -> Result<RoomOperationResult, CasterSphereError> {
        let hashed_msg = match self.config.message_mode() {
            MessageMode::Plain => message.to_string(),
            MessageMode::SignedEnvelope => self.issuer.sign_message(message)?,
        };

        let body = to_body(&MessageRequest {
            room: room.into(),
            hashed_msg,
            persist,
        })?;
        self.execute(HttpMethod::Post, MESSAGE_PATH, Some(body))
            .await
    }

    /// Build the authenticated request for an endpoint
    ///
    /// Mints a new token on every call.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<OutboundRequest, CasterSphereError> {
        let principal = self.principals.current_principal();
        let token = self.issuer.issue(principal.as_ref())?;

        let mut headers = vec![
            (
                "Authorization".to_string(),
                self.config.auth_scheme().header_value(&token),
            ),
            (APP_ID_HEADER.to_string(), self.config.app_id().to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let url = self.config.endpoint(path);
        tracing::debug!(
            "Built {} request to {} (token length: {})",
            method.as_str(),
            url,
            token.len()
        );

        Ok(OutboundRequest {
            method,
            url,
            headers,
            body,
        })
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<RoomOperationResult, CasterSphereError> {
        let request = self.build_request(method, path, body)?;
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method.as_str(), path, e);
            e
        })?;

        if !(200..300).contains(&response.status) {
            tracing::warn!(
                "Room service returned HTTP {} for {} {}",
                response.status,
                method.as_str(),
                path
            );
        } else {
            tracing::debug!("Received HTTP {} for {} {}", response.status, method.as_str(), path);
        }

        normalize(self.config.response_mode(), response)
    }
}

fn to_body<T: Serialize>(payload: &T) -> Result<serde_json::Value, CasterSphereError> {
    serde_json::to_value(payload).map_err(|e| {
        CasterSphereError::Transport(TransportError::Request(format!(
            "Failed to serialize request body: {}",
            e
        )))
    })
}

/// Turn a raw response into a [`RoomOperationResult`]
///
/// In JSON mode an empty body becomes `null`; anything else must parse.
pub fn normalize(
    mode: ResponseMode,
    response: RawResponse,
) -> Result<RoomOperationResult, CasterSphereError> {
    let RawResponse { status, body } = response;

    let body = match mode {
        ResponseMode::Passthrough => ResponseBody::Raw(body),
        ResponseMode::Json if body.iter().all(u8::is_ascii_whitespace) => {
            ResponseBody::Json(serde_json::Value::Null)
        }
        ResponseMode::Json => match serde_json::from_slice(&body) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                tracing::error!("Failed to parse HTTP {} response as JSON: {}", status, e);
                return Err(CasterSphereError::ResponseDecode {
                    status,
                    message: e.to_string(),
                    body,
                });
            }
        },
    };

    Ok(RoomOperationResult { status, body })
}
