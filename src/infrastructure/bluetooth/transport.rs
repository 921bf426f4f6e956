//! Transport Seam
//!
//! The boundary between the device link state machine and the platform
//! GATT stack. The Windows implementation lives in
//! [`super::winrt`]; tests drive the link with a scripted
//! implementation instead.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::settings::SettingsKind;
use crate::error::LinkError;

/// Out-of-band notifications from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// The device dropped the connection (powered off, out of range).
    Disconnected,
}

/// Raw GATT operations against one KB1 device.
///
/// Implementations resolve and own the characteristic handles for the
/// lifetime of one connection: `open` leaves the transport ready for
/// record I/O against every registry characteristic, and `close` drops
/// every connection-scoped handle. At most one operation is in flight
/// at a time; the link issues them strictly sequentially.
#[async_trait]
pub trait GattTransport: Send {
    /// Discover a device, connect, and resolve every registry
    /// characteristic. `events` outlives this call and carries
    /// out-of-band disconnect notifications for the connection it
    /// established.
    async fn open(
        &mut self,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<(), LinkError>;

    /// Read the raw record bytes for `kind`.
    async fn read(&mut self, kind: SettingsKind) -> Result<Vec<u8>, LinkError>;

    /// Write raw record bytes for `kind`. Callers pass exactly
    /// `expected_size(kind)` bytes.
    async fn write(&mut self, kind: SettingsKind, value: &[u8]) -> Result<(), LinkError>;

    /// Tear down the connection and drop resolved handles. Safe to
    /// call in any state.
    async fn close(&mut self);
}
