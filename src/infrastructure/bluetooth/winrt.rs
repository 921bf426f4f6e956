//! Windows GATT Transport
//!
//! Drives the WinRT Bluetooth stack: advertisement-based discovery,
//! GATT connection, characteristic resolution against the registry,
//! and record reads/writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::info;
use windows::core::GUID;
use windows::Devices::Bluetooth::Advertisement::{
    BluetoothLEAdvertisementReceivedEventArgs, BluetoothLEAdvertisementWatcher,
    BluetoothLEScanningMode,
};
use windows::Devices::Bluetooth::GenericAttributeProfile::{
    GattCharacteristic, GattCommunicationStatus,
};
use windows::Devices::Bluetooth::{
    BluetoothCacheMode, BluetoothConnectionStatus, BluetoothLEDevice,
};
use windows::Foundation::TypedEventHandler;
use windows::Storage::Streams::{DataReader, DataWriter};

use crate::domain::settings::SettingsKind;
use crate::error::LinkError;
use crate::infrastructure::bluetooth::registry;
use crate::infrastructure::bluetooth::transport::{GattTransport, TransportEvent};

/// Connection-scoped state: the device plus one resolved handle per
/// registry characteristic. Dropped as a unit on every disconnect path.
struct GattConnection {
    device: BluetoothLEDevice,
    status_token: i64,
    characteristics: HashMap<SettingsKind, GattCharacteristic>,
}

/// WinRT-backed [`GattTransport`].
pub struct WinRtTransport {
    discovery_timeout: Duration,
    connection: Arc<Mutex<Option<GattConnection>>>,
}

impl WinRtTransport {
    pub fn new() -> Self {
        Self::with_discovery_timeout(Duration::from_secs(10))
    }

    pub fn with_discovery_timeout(discovery_timeout: Duration) -> Self {
        Self {
            discovery_timeout,
            connection: Arc::new(Mutex::new(None)),
        }
    }

    /// Scan for the first advertisement carrying the settings service.
    ///
    /// `Ok(None)` means the discovery window elapsed without a match.
    async fn discover(&self) -> anyhow::Result<Option<u64>> {
        let service_uuid = parse_uuid(registry::SERVICE_UUID)?;
        let watcher = BluetoothLEAdvertisementWatcher::new()?;
        watcher.SetScanningMode(BluetoothLEScanningMode::Active)?;

        let (found_tx, found_rx) = oneshot::channel();
        let found_tx = Arc::new(Mutex::new(Some(found_tx)));

        let handler = TypedEventHandler::new(
            move |_: windows::core::Ref<BluetoothLEAdvertisementWatcher>,
                  args: windows::core::Ref<BluetoothLEAdvertisementReceivedEventArgs>| {
                if let Some(args) = args.as_ref() {
                    let advertisement = args.Advertisement()?;
                    let service_uuids = advertisement.ServiceUuids()?;
                    for i in 0..service_uuids.Size()? {
                        if service_uuids.GetAt(i)? == service_uuid {
                            if let Ok(mut slot) = found_tx.lock() {
                                if let Some(tx) = slot.take() {
                                    let _ = tx.send(args.BluetoothAddress()?);
                                }
                            }
                            break;
                        }
                    }
                }
                Ok(())
            },
        );
        watcher.Received(&handler)?;
        watcher.Start()?;
        info!("scanning for {}...", registry::DEVICE_NAME);

        let address = match timeout(self.discovery_timeout, found_rx).await {
            Ok(Ok(address)) => Some(address),
            _ => None,
        };
        watcher.Stop()?;
        Ok(address)
    }

    /// Connect to the device and resolve every registry characteristic.
    async fn establish(
        &self,
        address: u64,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> anyhow::Result<()> {
        let device = BluetoothLEDevice::FromBluetoothAddressAsync(address)?.await?;
        info!("device connected: {:?}", device.Name()?);

        let service_uuid = parse_uuid(registry::SERVICE_UUID)?;
        let services_result = device.GetGattServicesForUuidAsync(service_uuid)?.await?;
        if services_result.Status()? != GattCommunicationStatus::Success {
            anyhow::bail!("failed to get GATT services: {:?}", services_result.Status()?);
        }
        let services = services_result.Services()?;
        if services.Size()? == 0 {
            anyhow::bail!("settings service not found");
        }
        let service = services.GetAt(0)?;

        let access_status = service.RequestAccessAsync()?.await?;
        info!("service access status: {:?}", access_status);

        let chars_result = service.GetCharacteristicsAsync()?.await?;
        if chars_result.Status()? != GattCommunicationStatus::Success {
            anyhow::bail!("failed to get characteristics");
        }
        let characteristics = chars_result.Characteristics()?;

        let mut handles = HashMap::new();
        for i in 0..characteristics.Size()? {
            let characteristic = characteristics.GetAt(i)?;
            let uuid = characteristic.Uuid()?;
            for kind in SettingsKind::ALL {
                if uuid == parse_uuid(registry::uuid_for(kind))? {
                    handles.insert(kind, characteristic.clone());
                }
            }
        }
        for kind in SettingsKind::ALL {
            if !handles.contains_key(&kind) {
                anyhow::bail!("characteristic for {kind} not resolved");
            }
        }
        info!("resolved {} settings characteristics", handles.len());

        // The handler fires on the WinRT thread pool; it clears the
        // connection-scoped handles itself so a stale transport cannot
        // reach the device, then notifies the link.
        let connection = Arc::clone(&self.connection);
        let status_token = device.ConnectionStatusChanged(&TypedEventHandler::new(
            move |dev: windows::core::Ref<BluetoothLEDevice>, _| {
                if let Some(dev) = dev.as_ref() {
                    if let Ok(status) = dev.ConnectionStatus() {
                        if status == BluetoothConnectionStatus::Disconnected {
                            if let Ok(mut slot) = connection.lock() {
                                slot.take();
                            }
                            let _ = events.send(TransportEvent::Disconnected);
                        }
                    }
                }
                Ok(())
            },
        ))?;

        if let Ok(mut slot) = self.connection.lock() {
            *slot = Some(GattConnection {
                device,
                status_token,
                characteristics: handles,
            });
        }
        Ok(())
    }

    fn characteristic_for(&self, kind: SettingsKind) -> Result<GattCharacteristic, LinkError> {
        self.connection
            .lock()
            .ok()
            .and_then(|slot| {
                slot.as_ref()
                    .and_then(|conn| conn.characteristics.get(&kind).cloned())
            })
            .ok_or(LinkError::NotConnected)
    }
}

impl Default for WinRtTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GattTransport for WinRtTransport {
    async fn open(
        &mut self,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<(), LinkError> {
        self.close().await;
        let address = match self.discover().await {
            Ok(Some(address)) => address,
            Ok(None) => return Err(LinkError::DiscoveryFailed),
            Err(err) => return Err(LinkError::ConnectFailed(err.to_string())),
        };
        self.establish(address, events)
            .await
            .map_err(|err| LinkError::ConnectFailed(err.to_string()))
    }

    async fn read(&mut self, kind: SettingsKind) -> Result<Vec<u8>, LinkError> {
        let characteristic = self.characteristic_for(kind)?;
        read_value(&characteristic)
            .await
            .map_err(|err| LinkError::Transport {
                kind,
                reason: err.to_string(),
            })
    }

    async fn write(&mut self, kind: SettingsKind, value: &[u8]) -> Result<(), LinkError> {
        let characteristic = self.characteristic_for(kind)?;
        write_value(&characteristic, value)
            .await
            .map_err(|err| LinkError::Transport {
                kind,
                reason: err.to_string(),
            })
    }

    async fn close(&mut self) {
        let connection = self.connection.lock().ok().and_then(|mut slot| slot.take());
        if let Some(connection) = connection {
            let _ = connection
                .device
                .RemoveConnectionStatusChanged(connection.status_token);
            let _ = connection.device.Close();
            info!("GATT connection closed");
        }
    }
}

/// Settings reads must bypass the OS attribute cache - the firmware
/// updates records in place.
async fn read_value(characteristic: &GattCharacteristic) -> anyhow::Result<Vec<u8>> {
    let result = characteristic
        .ReadValueWithCacheModeAsync(BluetoothCacheMode::Uncached)?
        .await?;
    if result.Status()? != GattCommunicationStatus::Success {
        anyhow::bail!("read returned status {:?}", result.Status()?);
    }
    let buffer = result.Value()?;
    let reader = DataReader::FromBuffer(&buffer)?;
    let length = reader.UnconsumedBufferLength()? as usize;
    let mut bytes = vec![0u8; length];
    reader.ReadBytes(&mut bytes)?;
    Ok(bytes)
}

async fn write_value(characteristic: &GattCharacteristic, value: &[u8]) -> anyhow::Result<()> {
    let writer = DataWriter::new()?;
    writer.WriteBytes(value)?;
    let buffer = writer.DetachBuffer()?;
    let status = characteristic.WriteValueAsync(&buffer)?.await?;
    if status != GattCommunicationStatus::Success {
        anyhow::bail!("write returned status {status:?}");
    }
    Ok(())
}

/// Parse a UUID string into a Windows GUID.
fn parse_uuid(uuid: &str) -> anyhow::Result<GUID> {
    let hex = uuid.replace('-', "");
    if hex.len() != 32 {
        anyhow::bail!("invalid UUID: {uuid}");
    }

    let data1 = u32::from_str_radix(&hex[0..8], 16)?;
    let data2 = u16::from_str_radix(&hex[8..12], 16)?;
    let data3 = u16::from_str_radix(&hex[12..16], 16)?;

    let mut data4 = [0u8; 8];
    for (i, byte) in data4.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[16 + i * 2..18 + i * 2], 16)?;
    }

    Ok(GUID {
        data1,
        data2,
        data3,
        data4,
    })
}
