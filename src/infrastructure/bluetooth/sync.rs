//! Settings Synchronizer
//!
//! The facade the presentation layer talks to. Owns the device link
//! and performs bulk operations across every settings record: reads
//! are best-effort per record, writes are all-or-nothing per call.

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::settings::{Settings, SettingsKind};
use crate::error::LinkError;
use crate::infrastructure::bluetooth::codec;
use crate::infrastructure::bluetooth::link::{DeviceLink, LinkState};
use crate::infrastructure::bluetooth::transport::GattTransport;

/// A bulk write aborted at `kind`; later records were not attempted.
#[derive(Debug, Error)]
#[error("failed to write {kind}: {source}")]
pub struct WriteFailure {
    pub kind: SettingsKind,
    #[source]
    pub source: LinkError,
}

pub struct SettingsSync<T: GattTransport> {
    link: DeviceLink<T>,
}

impl<T: GattTransport> SettingsSync<T> {
    pub fn new(link: DeviceLink<T>) -> Self {
        Self { link }
    }

    pub async fn connect(&mut self) -> Result<(), LinkError> {
        self.link.connect().await
    }

    pub async fn disconnect(&mut self) {
        self.link.disconnect().await;
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Observe link lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.link.subscribe()
    }

    /// Read every known record into a fresh [`Settings`] aggregate.
    ///
    /// A failed read leaves that field absent and the batch continues:
    /// one flaky characteristic must not abort the whole sync. The
    /// aggregate is returned after all kinds were attempted, however
    /// many succeeded.
    pub async fn read_all(&mut self) -> Settings {
        let mut settings = Settings::default();
        for kind in SettingsKind::ALL {
            match self.link.read_record(kind).await {
                Ok(bytes) => {
                    if let Err(err) = store_record(&mut settings, kind, &bytes) {
                        warn!("discarding {kind} record: {err}");
                    }
                }
                Err(err) => warn!("skipping {kind}: {err}"),
            }
        }
        settings
    }

    /// Write every record present in `settings` back to the device.
    ///
    /// Absent kinds are skipped, not written. The first failing write
    /// aborts the batch - a partially applied configuration can leave
    /// the controller in an inconsistent operating state - and the
    /// error names the record that failed.
    pub async fn write_all(&mut self, settings: &Settings) -> Result<(), WriteFailure> {
        for kind in SettingsKind::ALL {
            let Some(value) = encode_record(settings, kind) else {
                continue;
            };
            self.link
                .write_record(kind, &value)
                .await
                .map_err(|source| WriteFailure { kind, source })?;
        }
        info!("settings written");
        Ok(())
    }
}

fn store_record(
    settings: &mut Settings,
    kind: SettingsKind,
    bytes: &[u8],
) -> Result<(), LinkError> {
    match kind {
        SettingsKind::Lever1 => settings.lever1 = Some(codec::decode_lever(bytes)?),
        SettingsKind::Lever2 => settings.lever2 = Some(codec::decode_lever(bytes)?),
        SettingsKind::LeverPush1 => settings.lever_push1 = Some(codec::decode_lever_push(bytes)?),
        SettingsKind::LeverPush2 => settings.lever_push2 = Some(codec::decode_lever_push(bytes)?),
        SettingsKind::Touch => settings.touch = Some(codec::decode_touch(bytes)?),
        SettingsKind::Scale => settings.scale = Some(codec::decode_scale(bytes)?),
    }
    Ok(())
}

/// Encode the record for `kind`, or `None` when the aggregate does not
/// carry it. Each kind encodes from its own field.
fn encode_record(settings: &Settings, kind: SettingsKind) -> Option<Vec<u8>> {
    match kind {
        SettingsKind::Lever1 => settings.lever1.as_ref().map(codec::encode_lever),
        SettingsKind::Lever2 => settings.lever2.as_ref().map(codec::encode_lever),
        SettingsKind::LeverPush1 => settings.lever_push1.as_ref().map(codec::encode_lever_push),
        SettingsKind::LeverPush2 => settings.lever_push2.as_ref().map(codec::encode_lever_push),
        SettingsKind::Touch => settings.touch.as_ref().map(codec::encode_touch),
        SettingsKind::Scale => settings.scale.as_ref().map(codec::encode_scale),
    }
}
