//! Device Link
//!
//! Owns the connection lifecycle for one KB1 and the raw per-record
//! read/write primitives. I/O is issued strictly sequentially - the
//! underlying link tolerates only one outstanding GATT operation at a
//! time. The one asynchronous, caller-uninitiated state change is the
//! out-of-band disconnect notification; in-flight operations observe
//! it through the state watch and fail instead of hanging.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::settings::SettingsKind;
use crate::error::LinkError;
use crate::infrastructure::bluetooth::codec;
use crate::infrastructure::bluetooth::transport::{GattTransport, TransportEvent};

/// Connection lifecycle states.
///
/// `Connecting` is mandatory between the other two; there is no direct
/// `Disconnected` -> `Connected` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Tunables for connection and characteristic I/O.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Budget for discovery, connection, and characteristic resolution.
    pub connect_timeout: Duration,
    /// Budget for a single characteristic read or write.
    pub operation_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            operation_timeout: Duration::from_secs(5),
        }
    }
}

/// Stateful connection object mediating all record I/O.
///
/// One instance manages at most one connection at a time; construct a
/// fresh link (or reconnect the same one) per device session.
pub struct DeviceLink<T: GattTransport> {
    transport: T,
    config: LinkConfig,
    state: Arc<watch::Sender<LinkState>>,
    monitor: Option<JoinHandle<()>>,
}

impl<T: GattTransport> DeviceLink<T> {
    pub fn new(transport: T, config: LinkConfig) -> Self {
        let (state, _) = watch::channel(LinkState::Disconnected);
        Self {
            transport,
            config,
            state: Arc::new(state),
            monitor: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    /// Whether record I/O is currently possible.
    pub fn is_connected(&self) -> bool {
        self.state() == LinkState::Connected
    }

    /// Observe lifecycle transitions, including out-of-band disconnects.
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.state.subscribe()
    }

    /// Discover a device, connect, and resolve the settings
    /// characteristics.
    ///
    /// Valid from `Disconnected` only. Any internal step failure
    /// restores `Disconnected` and surfaces as a single error; the
    /// recovery action (retry the whole connect) is the same no matter
    /// which step failed.
    pub async fn connect(&mut self) -> Result<(), LinkError> {
        if self.state() != LinkState::Disconnected {
            return Err(LinkError::ConnectFailed("link is already active".into()));
        }
        self.state.send_replace(LinkState::Connecting);
        info!("connecting to device...");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        match timeout(self.config.connect_timeout, self.transport.open(events_tx)).await {
            Ok(Ok(())) => {
                self.state.send_replace(LinkState::Connected);
                self.monitor = Some(spawn_monitor(events_rx, Arc::clone(&self.state)));
                info!("device link connected");
                Ok(())
            }
            Ok(Err(err)) => {
                self.transport.close().await;
                self.state.send_replace(LinkState::Disconnected);
                warn!("connect failed: {err}");
                Err(err)
            }
            Err(_) => {
                self.transport.close().await;
                self.state.send_replace(LinkState::Disconnected);
                warn!("connect timed out");
                Err(LinkError::ConnectFailed("timed out".into()))
            }
        }
    }

    /// Tear down the connection. No-op when already disconnected.
    pub async fn disconnect(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.abort();
        }
        self.transport.close().await;
        if self.state.send_replace(LinkState::Disconnected) != LinkState::Disconnected {
            info!("device link disconnected");
        }
    }

    /// Read the raw record for `kind`. Valid only while `Connected`.
    pub async fn read_record(&mut self, kind: SettingsKind) -> Result<Vec<u8>, LinkError> {
        self.ensure_connected()?;
        let mut state_rx = self.state.subscribe();
        let op = self.transport.read(kind);
        tokio::select! {
            res = timeout(self.config.operation_timeout, op) => match res {
                Ok(result) => result,
                Err(_) => Err(LinkError::Transport {
                    kind,
                    reason: "operation timed out".into(),
                }),
            },
            _ = state_rx.wait_for(|s| *s == LinkState::Disconnected) => Err(LinkError::NotConnected),
        }
    }

    /// Write the raw record for `kind`. Valid only while `Connected`;
    /// `value` must be exactly `expected_size(kind)` bytes.
    pub async fn write_record(&mut self, kind: SettingsKind, value: &[u8]) -> Result<(), LinkError> {
        self.ensure_connected()?;
        let expected = codec::expected_size(kind);
        if value.len() != expected {
            return Err(LinkError::InvalidArgument {
                expected,
                actual: value.len(),
            });
        }
        let mut state_rx = self.state.subscribe();
        let op = self.transport.write(kind, value);
        tokio::select! {
            res = timeout(self.config.operation_timeout, op) => match res {
                Ok(result) => result,
                Err(_) => Err(LinkError::Transport {
                    kind,
                    reason: "operation timed out".into(),
                }),
            },
            _ = state_rx.wait_for(|s| *s == LinkState::Disconnected) => Err(LinkError::NotConnected),
        }
    }

    fn ensure_connected(&self) -> Result<(), LinkError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(LinkError::NotConnected)
        }
    }
}

impl<T: GattTransport> Drop for DeviceLink<T> {
    fn drop(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.abort();
        }
    }
}

/// Forwards out-of-band disconnect notifications into the state watch,
/// so the transition is observed even while no operation is in flight.
fn spawn_monitor(
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
    state: Arc<watch::Sender<LinkState>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::Disconnected => {
                    warn!("device dropped the connection");
                    state.send_replace(LinkState::Disconnected);
                    break;
                }
            }
        }
    })
}
