//! Gateway error types

use robot_core::DomainError;
use robot_service::ServiceError;
use thiserror::Error;

use crate::protocol::CloseCode;

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// WebSocket transport failed
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// REST transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// REST client setup failed
    #[error("REST error: {0}")]
    Rest(#[from] crate::rest::RestError),

    /// A payload could not be decoded
    #[error("Invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server broke the session handshake
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No heartbeat ACK arrived before the next heartbeat was due
    #[error("Heartbeat not acknowledged")]
    HeartbeatTimeout,

    /// The server closed the socket
    #[error("Connection closed ({code}): {reason}")]
    Closed { code: u16, reason: String },

    /// Domain error (from the platform adapter)
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Service error (from event handlers)
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl GatewayError {
    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// The session cannot succeed without a settings change (bad token, bad intents)
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Closed { code, .. } => {
                CloseCode::from_u16(*code).is_some_and(|close| !close.should_reconnect())
            }
            _ => false,
        }
    }
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;
