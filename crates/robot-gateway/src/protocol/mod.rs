//! Gateway protocol definitions
//!
//! Op codes, the message envelope, handshake payloads, intents and close
//! codes of the platform's websocket gateway.

mod close_codes;
mod intents;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use intents::Intents;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
