use crate::config::LinkConfig;
use crate::connection::event::{ConnectionEvent, ConnectionId, ConnectionState, ConnectionStatus};
use crate::connection::handle::ConnectionHandle;
use crate::connection::link::OutboundLink;
use crate::error::transport::TransportError;

use common::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, trace, warn};
use tokio::net::TcpStream;
use tokio::spawn as TokioSpawn;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep as TokioSleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

const EVENT_CHANNEL_CAPACITY: usize = 256;

type ControllerStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub retry_interval: Duration,
    pub outbound_capacity: usize,
}

impl From<&LinkConfig> for ConnectionSettings {
    fn from(config: &LinkConfig) -> Self {
        Self {
            retry_interval: config.retry_interval(),
            outbound_capacity: config.controller.outbound_capacity,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettings::from(&LinkConfig::default())
    }
}

/// How one served connection ended.
enum ConnectionEnd {
    Closed,
    Failed(TransportError),
    Shutdown,
    ConsumerGone,
}

pub struct ConnectionManager;

impl ConnectionManager {
    /// Spawn the connection task for `url`.
    ///
    /// The first attempt starts immediately. Events arrive on the returned
    /// receiver; dropping it stops the manager.
    pub fn start(
        url: Url,
        settings: ConnectionSettings,
    ) -> (ConnectionHandle, mpsc::Receiver<ConnectionEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(ConnectionState::default());

        let task = TokioSpawn(run_connection_loop(
            url,
            settings,
            events_tx,
            state_tx,
            shutdown_rx,
        ));
        info!("Connection manager spawned");

        (ConnectionHandle::new(shutdown_tx, state_rx, task), events_rx)
    }
}

async fn run_connection_loop(
    url: Url,
    settings: ConnectionSettings,
    events: mpsc::Sender<ConnectionEvent>,
    state: watch::Sender<ConnectionState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut retry = Constant::new(settings.retry_interval);
    let mut last_id: ConnectionId = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        last_id += 1;
        let id = last_id;
        let attempt = state.borrow().retry_count + 1;

        state.send_modify(|current| {
            current.status = ConnectionStatus::Connecting;
            current.connection_id = Some(id);
        });
        if events
            .send(ConnectionEvent::Connecting { id, attempt })
            .await
            .is_err()
        {
            break;
        }
        debug!("Connecting to {url} (connection {id}, attempt {attempt})");

        let connected = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            result = connect_async(url.as_str()) => result,
        };

        let end = match connected {
            Ok((stream, _response)) => {
                info!("Connected to {url} (connection {id})");
                retry.reset();
                state.send_modify(|current| {
                    current.status = ConnectionStatus::Open;
                    current.retry_count = 0;
                });
                serve_connection(id, stream, settings, &events, &mut shutdown).await
            }
            Err(e) => ConnectionEnd::Failed(TransportError::Connect {
                message: format!("Failed to connect to {url}: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }),
        };

        let (status, event) = match end {
            ConnectionEnd::Shutdown | ConnectionEnd::ConsumerGone => break,
            ConnectionEnd::Closed => {
                info!("Connection {id} closed by controller");
                (ConnectionStatus::Closed, ConnectionEvent::Closed { id })
            }
            ConnectionEnd::Failed(error) => {
                warn!("Connection {id} failed: {error}");
                (ConnectionStatus::Failed, ConnectionEvent::Errored { id, error })
            }
        };

        state.send_modify(|current| {
            current.status = status;
            current.retry_count = current.retry_count.saturating_add(1);
        });
        if events.send(event).await.is_err() {
            break;
        }

        let delay = retry.next_backoff().unwrap_or(settings.retry_interval);
        debug!("Retrying in {} ms", delay.as_millis());

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = TokioSleep(delay) => {}
        }
    }

    state.send_modify(|current| {
        current.status = ConnectionStatus::Closed;
    });
    info!("Connection loop exited after {last_id} attempts");
}

async fn serve_connection(
    id: ConnectionId,
    stream: ControllerStream,
    settings: ConnectionSettings,
    events: &mpsc::Sender<ConnectionEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> ConnectionEnd {
    let (mut writer, mut reader) = stream.split();
    let (frames_tx, mut frames_rx) = mpsc::channel::<Vec<u8>>(settings.outbound_capacity);

    // Held for the lifetime of the connection so the outbound queue stays open
    // even after every handed-out link is dropped.
    let _frames_keepalive = frames_tx.clone();

    let link = OutboundLink::new(id, frames_tx);
    if events
        .send(ConnectionEvent::Opened { id, link })
        .await
        .is_err()
    {
        return ConnectionEnd::ConsumerGone;
    }

    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => {
                if let Err(e) = writer.send(Message::Close(None)).await {
                    debug!("Close frame not delivered on connection {id}: {e}");
                }
                return ConnectionEnd::Shutdown;
            }

            Some(bytes) = frames_rx.recv() => {
                trace!("Writing {} bytes on connection {id}", bytes.len());
                if let Err(e) = writer.send(Message::Binary(bytes.into())).await {
                    return ConnectionEnd::Failed(e.into());
                }
            }

            inbound = reader.next() => match inbound {
                Some(Ok(Message::Binary(data))) => {
                    let received = ConnectionEvent::Received {
                        id,
                        payload: data.to_vec(),
                    };
                    if events.send(received).await.is_err() {
                        return ConnectionEnd::ConsumerGone;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return ConnectionEnd::Closed,
                Some(Ok(other)) => {
                    trace!("Ignoring non-binary message on connection {id}: {other:?}");
                }
                Some(Err(e)) => return ConnectionEnd::Failed(e.into()),
            },
        }
    }
}
