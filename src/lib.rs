//! CasterSphere SDK
//!
//! A Rust client for the CasterSphere real-time room service.
//!
//! This SDK provides:
//! - HS256 token issuance for the calling principal, minted fresh for every request
//! - Room service client: list, create, join and leave rooms, send messages
//! - Optional signed message envelopes for the `hashed_msg` field
//! - Pluggable HTTP transport and principal provider
//!
//! # Example
//!
//! ```no_run
//! use castersphere_sdk::{ClientConfig, Principal, RoomServiceClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let client = RoomServiceClient::new(config, Principal::new("42", "ada@example.com"));
//!
//! client.join_room("lobby").await?;
//! let sent = client.send_message("lobby", "hello", true).await?;
//! if !sent.is_success() {
//!     eprintln!("Room service rejected the message: HTTP {}", sent.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod castersphere_api;

// Re-export commonly used types and functions
pub use castersphere_api::{
    client::RoomServiceClient,
    config::{AuthScheme, ClientConfig, ClientConfigBuilder, MessageMode, ResponseMode},
    jwt::{MessageEnvelope, TokenClaims, TokenIssuer},
    resources::{MessageRequest, ResponseBody, RoomOperationResult, RoomRequest},
    session::{Anonymous, PrincipalProvider},
    transport::{HttpMethod, HttpTransport, OutboundRequest, RawResponse, ReqwestTransport},
    types::{CasterSphereError, Principal, TransportError},
};
