//! Room service request and response types

use crate::castersphere_api::types::CasterSphereError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Body of `/create-room`, `/join` and `/leave`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRequest {
    pub room: String,
}

/// Body of `/message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub room: String,
    /// Message verbatim, or a signed envelope, depending on the client's message mode
    pub hashed_msg: String,
    /// Ask the room service to store the message
    pub persist: bool,
}

/// Normalized response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON
    Json(serde_json::Value),
    /// Body exactly as received
    Raw(Vec<u8>),
}

/// Result of any room service operation
///
/// Carries the remote status code as-is, including 4xx/5xx.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOperationResult {
    pub status: u16,
    pub body: ResponseBody,
}

impl RoomOperationResult {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// JSON body, when the response was normalized as JSON
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    /// Raw body bytes, when the response was passed through
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            ResponseBody::Raw(bytes) => Some(bytes),
            ResponseBody::Json(_) => None,
        }
    }

    /// Decode the body into a typed value
    ///
    /// Works for both body kinds; raw bodies are parsed on demand.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CasterSphereError> {
        let decoded = match &self.body {
            ResponseBody::Json(value) => serde_json::from_value(value.clone()),
            ResponseBody::Raw(bytes) => serde_json::from_slice(bytes),
        };

        decoded.map_err(|e| CasterSphereError::ResponseDecode {
            status: self.status,
            message: e.to_string(),
            body: match &self.body {
                ResponseBody::Raw(bytes) => bytes.clone(),
                ResponseBody::Json(value) => value.to_string().into_bytes(),
            },
        })
    }
}
