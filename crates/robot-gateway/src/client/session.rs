//! One gateway session
//!
//! Connects, identifies, keeps the heartbeat going and feeds dispatch events
//! to the [`EventDispatcher`] until the server ends the session or the
//! socket fails.

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use crate::dispatch::EventDispatcher;
use crate::error::{GatewayError, GatewayResult};
use crate::events::decode_dispatch;
use crate::protocol::{GatewayMessage, HelloPayload, IdentifyPayload, Intents, OpCode};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Wait before identifying again after an invalid session
const INVALID_SESSION_DELAY: Duration = Duration::from_secs(5);

/// Why a session ended without a transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server asked for a reconnect
    Reconnect,
    /// The server invalidated the session
    InvalidSession { resumable: bool },
}

impl SessionEnd {
    /// How long to wait before connecting again
    pub fn reconnect_delay(self) -> Duration {
        match self {
            Self::Reconnect => Duration::ZERO,
            Self::InvalidSession { .. } => INVALID_SESSION_DELAY,
        }
    }
}

/// A gateway session bound to a dispatcher
pub struct GatewaySession<'a> {
    url: &'a str,
    token: &'a str,
    dispatcher: &'a EventDispatcher,
    sequence: Option<u64>,
    heartbeat_acked: bool,
}

impl<'a> GatewaySession<'a> {
    pub fn new(url: &'a str, token: &'a str, dispatcher: &'a EventDispatcher) -> Self {
        Self {
            url,
            token,
            dispatcher,
            sequence: None,
            heartbeat_acked: true,
        }
    }

    /// Run the session to its end
    pub async fn run(mut self) -> GatewayResult<SessionEnd> {
        let (socket, _) = connect_async(self.url).await?;
        info!(url = %self.url, "Gateway connected");

        let (mut sink, mut stream) = socket.split();

        let hello = Self::wait_for_hello(&mut stream).await?;
        debug!(interval_ms = hello.heartbeat_interval, "Hello received");

        let identify = GatewayMessage::identify(&IdentifyPayload::new(self.token, Intents::bot()))?;
        Self::send(&mut sink, &identify).await?;

        let mut heartbeat = interval(Duration::from_millis(hello.heartbeat_interval));
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    // No ACK since the last beat means the connection is a zombie
                    if !self.heartbeat_acked {
                        warn!("Heartbeat not acknowledged");
                        return Err(GatewayError::HeartbeatTimeout);
                    }
                    self.heartbeat_acked = false;
                    Self::send(&mut sink, &GatewayMessage::heartbeat(self.sequence)).await?;
                }
                frame = stream.next() => {
                    let frame = match frame {
                        Some(frame) => frame?,
                        None => return Err(GatewayError::protocol("Gateway stream ended")),
                    };
                    match frame {
                        Message::Text(text) => {
                            let message = GatewayMessage::from_json(&text)?;
                            if let Some(end) = self.handle(&mut sink, message).await? {
                                let _ = sink.close().await;
                                return Ok(end);
                            }
                        }
                        Message::Close(frame) => return Err(closed(frame)),
                        Message::Ping(_) | Message::Pong(_) => trace!("Ping/pong"),
                        Message::Binary(_) | Message::Frame(_) => {
                            debug!("Ignoring binary frame");
                        }
                    }
                }
            }
        }
    }

    async fn wait_for_hello(stream: &mut SplitStream<Socket>) -> GatewayResult<HelloPayload> {
        while let Some(frame) = stream.next().await {
            match frame? {
                Message::Text(text) => {
                    let message = GatewayMessage::from_json(&text)?;
                    return message.as_hello().ok_or_else(|| {
                        GatewayError::protocol(format!("Expected Hello, got {}", message.op))
                    });
                }
                Message::Close(frame) => return Err(closed(frame)),
                _ => {}
            }
        }
        Err(GatewayError::protocol("Gateway closed before Hello"))
    }

    /// Handle a server message; `Some` ends the session
    async fn handle(
        &mut self,
        sink: &mut SplitSink<Socket, Message>,
        message: GatewayMessage,
    ) -> GatewayResult<Option<SessionEnd>> {
        match message.op {
            OpCode::Dispatch => {
                if message.s.is_some() {
                    self.sequence = message.s;
                }
                let Some(name) = message.t.as_deref() else {
                    return Err(GatewayError::protocol("Dispatch without event name"));
                };
                match decode_dispatch(name, message.d) {
                    Ok(Some(event)) => {
                        let dispatcher = self.dispatcher.clone();
                        tokio::spawn(async move { dispatcher.dispatch(event).await });
                    }
                    Ok(None) => trace!(event = name, "Unhandled event"),
                    Err(e) => warn!(event = name, error = %e, "Could not decode event"),
                }
            }
            OpCode::Heartbeat => {
                Self::send(sink, &GatewayMessage::heartbeat(self.sequence)).await?;
            }
            OpCode::HeartbeatAck => self.heartbeat_acked = true,
            OpCode::Reconnect => {
                info!("Server requested a reconnect");
                return Ok(Some(SessionEnd::Reconnect));
            }
            OpCode::InvalidSession => {
                let resumable = message.as_invalid_session().unwrap_or(false);
                warn!(resumable, "Session invalidated");
                return Ok(Some(SessionEnd::InvalidSession { resumable }));
            }
            op => debug!(op = %op, "Unexpected op code"),
        }
        Ok(None)
    }

    async fn send(
        sink: &mut SplitSink<Socket, Message>,
        message: &GatewayMessage,
    ) -> GatewayResult<()> {
        trace!(op = %message.op, "Sending");
        sink.send(Message::Text(message.to_json()?)).await?;
        Ok(())
    }
}

fn closed(frame: Option<CloseFrame<'static>>) -> GatewayError {
    match frame {
        Some(frame) => GatewayError::Closed {
            code: frame.code.into(),
            reason: frame.reason.into_owned(),
        },
        None => GatewayError::Closed {
            code: 1000,
            reason: String::new(),
        },
    }
}
