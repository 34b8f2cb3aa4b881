/// CasterSphere room service integration module
///
/// This module provides token issuance, configuration and the HTTP client
/// for the CasterSphere room service.
///
/// ## Request Flow
///
/// 1. Caller invokes a `RoomServiceClient` operation
/// 2. Client reads the current principal from its `PrincipalProvider`
/// 3. `TokenIssuer` signs `{platform, iss, username, sender_id}` with HS256
/// 4. Client attaches `Authorization` and `app-id` headers and sends the request
/// 5. Response is normalized (JSON re-wrap or raw passthrough) with its status intact
pub mod client;
pub mod config;
pub mod jwt;
pub mod resources;
pub mod session;
pub mod transport;
pub mod types;

pub use client::RoomServiceClient;
pub use config::{AuthScheme, ClientConfig, ClientConfigBuilder, MessageMode, ResponseMode};
pub use jwt::{MessageEnvelope, TokenClaims, TokenIssuer};
pub use resources::*;
pub use session::{Anonymous, PrincipalProvider};
pub use transport::{HttpMethod, HttpTransport, OutboundRequest, RawResponse, ReqwestTransport};
pub use types::{CasterSphereError, Principal, TransportError};
