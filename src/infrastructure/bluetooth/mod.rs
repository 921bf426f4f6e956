//! Bluetooth Module
//!
//! BLE communication with the KB1 controller.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       SettingsSync                        │
//! │    (bulk read/write facade - public API for the host)     │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │
//!                            ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  DeviceLink  │   │    Codec     │   │   Registry   │
//! │              │   │              │   │              │
//! │ - lifecycle  │   │ - record     │   │ - UUIDs      │
//! │   states     │   │   layouts    │   │ - iteration  │
//! │ - record I/O │   │ - LE fields  │   │   order      │
//! └──────┬───────┘   └──────────────┘   └──────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │ GattTransport│  (trait; WinRT implementation on Windows)
//! └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`registry`] - characteristic UUIDs and the record iteration order
//! - [`codec`] - fixed-layout record encode/decode
//! - [`transport`] - the seam to the platform GATT stack
//! - [`link`] - connection lifecycle state machine and record I/O
//! - [`sync`] - bulk settings read/write facade

pub mod codec;
pub mod link;
pub mod registry;
pub mod sync;
pub mod transport;
#[cfg(windows)]
pub mod winrt;

#[cfg(test)]
pub(crate) mod mock;

pub use link::{DeviceLink, LinkConfig, LinkState};
pub use sync::{SettingsSync, WriteFailure};
pub use transport::{GattTransport, TransportEvent};
