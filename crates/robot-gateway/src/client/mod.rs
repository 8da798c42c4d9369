//! Gateway client

mod session;

pub use session::{GatewaySession, SessionEnd};
