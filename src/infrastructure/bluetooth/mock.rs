//! Scripted transport for exercising the link and synchronizer
//! without hardware.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::settings::SettingsKind;
use crate::error::LinkError;
use crate::infrastructure::bluetooth::codec;
use crate::infrastructure::bluetooth::transport::{GattTransport, TransportEvent};

#[derive(Default)]
struct MockState {
    open_error: Option<LinkError>,
    records: HashMap<SettingsKind, Vec<u8>>,
    failing_reads: HashSet<SettingsKind>,
    failing_writes: HashSet<SettingsKind>,
    hanging_reads: HashSet<SettingsKind>,
    reads: Vec<SettingsKind>,
    writes: Vec<(SettingsKind, Vec<u8>)>,
    events: Option<mpsc::UnboundedSender<TransportEvent>>,
}

pub(crate) struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

/// Scripting/inspection side of a [`MockTransport`].
#[derive(Clone)]
pub(crate) struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

pub(crate) fn pair() -> (MockTransport, MockHandle) {
    let state = Arc::new(Mutex::new(MockState::default()));
    (
        MockTransport {
            state: Arc::clone(&state),
        },
        MockHandle { state },
    )
}

impl MockHandle {
    pub fn fail_open(&self, err: LinkError) {
        self.state.lock().unwrap().open_error = Some(err);
    }

    /// Script the bytes a read of `kind` returns. Unscripted kinds
    /// read as all zeroes of the expected size.
    pub fn set_record(&self, kind: SettingsKind, bytes: Vec<u8>) {
        self.state.lock().unwrap().records.insert(kind, bytes);
    }

    pub fn fail_reads(&self, kind: SettingsKind) {
        self.state.lock().unwrap().failing_reads.insert(kind);
    }

    pub fn fail_writes(&self, kind: SettingsKind) {
        self.state.lock().unwrap().failing_writes.insert(kind);
    }

    /// Make reads of `kind` never resolve.
    pub fn hang_reads(&self, kind: SettingsKind) {
        self.state.lock().unwrap().hanging_reads.insert(kind);
    }

    /// Inject an out-of-band disconnect notification.
    pub fn drop_connection(&self) {
        if let Some(events) = &self.state.lock().unwrap().events {
            let _ = events.send(TransportEvent::Disconnected);
        }
    }

    /// Kinds the transport was asked to read, in order.
    pub fn reads_attempted(&self) -> Vec<SettingsKind> {
        self.state.lock().unwrap().reads.clone()
    }

    /// Writes the transport was asked to perform, in order,
    /// including the one that failed.
    pub fn writes(&self) -> Vec<(SettingsKind, Vec<u8>)> {
        self.state.lock().unwrap().writes.clone()
    }
}

#[async_trait]
impl GattTransport for MockTransport {
    async fn open(
        &mut self,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<(), LinkError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.open_error.take() {
            return Err(err);
        }
        state.events = Some(events);
        Ok(())
    }

    async fn read(&mut self, kind: SettingsKind) -> Result<Vec<u8>, LinkError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            state.reads.push(kind);
            if state.failing_reads.contains(&kind) {
                return Err(LinkError::Transport {
                    kind,
                    reason: "simulated read failure".into(),
                });
            }
            state.hanging_reads.contains(&kind)
        };
        if hang {
            std::future::pending::<()>().await;
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| vec![0; codec::expected_size(kind)]))
    }

    async fn write(&mut self, kind: SettingsKind, value: &[u8]) -> Result<(), LinkError> {
        let mut state = self.state.lock().unwrap();
        state.writes.push((kind, value.to_vec()));
        if state.failing_writes.contains(&kind) {
            return Err(LinkError::Transport {
                kind,
                reason: "simulated write failure".into(),
            });
        }
        Ok(())
    }

    async fn close(&mut self) {
        self.state.lock().unwrap().events = None;
    }
}
