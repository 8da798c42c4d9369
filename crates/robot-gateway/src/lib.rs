//! # robot-gateway
//!
//! Gateway client, REST platform adapter, GPIO relay and event dispatch for
//! the house robot.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod protocol;
pub mod relay;
pub mod rest;

pub use dispatch::{DispatchState, EventDispatcher};
pub use error::{GatewayError, GatewayResult};

use std::sync::Arc;

use robot_common::AppConfig;
use robot_core::Relay;
use robot_service::ServiceContextBuilder;
use tokio::time::sleep;
use tracing::{error, info};

use crate::client::GatewaySession;
use crate::relay::{NoopRelay, SysfsRelay};
use crate::rest::{RestClient, RestPlatform};

/// Build the dispatcher with the production adapters
///
/// The relay is only driven in production; development uses [`NoopRelay`].
pub fn create_dispatcher(config: AppConfig) -> GatewayResult<EventDispatcher> {
    let settings = &config.settings;
    let client = RestClient::new(&settings.discord_token, &settings.connection.api_base_url)?;

    let relay: Arc<dyn Relay> = if config.env.is_production() {
        Arc::new(SysfsRelay::new())
    } else {
        Arc::new(NoopRelay)
    };

    let ctx = ServiceContextBuilder::new()
        .platform(Arc::new(RestPlatform::new(client)))
        .relay(relay)
        .config(Arc::new(config))
        .build()?;

    Ok(EventDispatcher::new(ctx))
}

/// Run the bot until Ctrl-C or a fatal close code
///
/// Transport failures are retried after the configured delay.
pub async fn run(config: AppConfig) -> GatewayResult<()> {
    let connection = config.settings.connection.clone();
    let token = config.settings.discord_token.clone();
    let dispatcher = create_dispatcher(config)?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let session = GatewaySession::new(&connection.gateway_url, &token, &dispatcher);

        let delay = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
            result = session.run() => match result {
                Ok(end) => {
                    info!(?end, "Gateway session ended");
                    end.reconnect_delay()
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Gateway refused the session");
                    return Err(e);
                }
                Err(e) => {
                    error!(error = %e, "Connection failed.");
                    info!("Retrying in {} seconds...", connection.retry_delay_secs);
                    connection.retry_delay()
                }
            },
        };

        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
            () = sleep(delay) => {}
        }
    }
}
