//! Core configuration library for the KB1 MIDI controller.
//!
//! The KB1 exposes its settings (two levers, two push-levers, a touch
//! pad, and a scale quantizer) as six fixed-layout binary records,
//! each addressable at its own BLE GATT characteristic. This crate is
//! the device-link and codec core a host application builds its UI on:
//! the connect/disconnect lifecycle, best-effort bulk reads,
//! all-or-nothing bulk writes, and the little-endian record codec.
//!
//! Reads are best-effort per record - a flaky characteristic leaves
//! its field absent and the rest of the aggregate intact. Writes are
//! all-or-nothing per call: the first failure aborts the batch and
//! names the record that failed, since a partially applied
//! configuration can leave the controller in an inconsistent state.
//!
//! # Example
//!
//! ```no_run
//! use kb1_configurator::{DeviceLink, GattTransport, LinkConfig, SettingsSync};
//!
//! async fn configure<T: GattTransport>(transport: T) -> Result<(), kb1_configurator::LinkError> {
//!     let mut sync = SettingsSync::new(DeviceLink::new(transport, LinkConfig::default()));
//!     sync.connect().await?;
//!
//!     let mut settings = sync.read_all().await;
//!     if let Some(scale) = settings.scale.as_mut() {
//!         scale.root_note = 9;
//!     }
//!     if let Err(failure) = sync.write_all(&settings).await {
//!         println!("write aborted at {}", failure.kind);
//!     }
//!
//!     sync.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! On Windows, [`infrastructure::bluetooth::winrt::WinRtTransport`]
//! provides the [`GattTransport`] implementation.

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::settings::{
    InterpolationType, LeverFunctionMode, LeverPushFunctionMode, LeverPushSettings, LeverSettings,
    ScaleSettings, ScaleType, Settings, SettingsKind, TouchFunctionMode, TouchSettings, ValueMode,
};
pub use error::LinkError;
pub use infrastructure::bluetooth::{
    DeviceLink, GattTransport, LinkConfig, LinkState, SettingsSync, TransportEvent, WriteFailure,
};
pub use infrastructure::logging::{init_logger, LogConfig, LoggingGuard};
