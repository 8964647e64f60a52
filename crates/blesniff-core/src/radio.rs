//! Radio driver abstraction.
//!
//! The [`Radio`] trait decouples the sniffer from the underlying Bluetooth
//! stack: the driver's callback-style event delivery is re-expressed as a
//! bounded channel of [`Advertisement`] values consumed by a single
//! controller task. [`BtleplugRadio`] is the hardware backend; tests use
//! [`MockRadio`](crate::mock::MockRadio).

use std::sync::Arc;

use async_trait::async_trait;
use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, PeripheralId};
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::advertisement::Advertisement;
use crate::error::{Error, Result};

/// Capacity of the advertisement channel. The driver's forwarder awaits when
/// the controller falls behind, letting the platform's own queuing absorb
/// bursts.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A scan-only Bluetooth radio.
///
/// `start_scan` begins an asynchronous scan and returns the channel on which
/// advertisements are delivered, in driver order, until the scan ends or
/// `stop_scan` is called. The channel closing signals that the driver's scan
/// has terminated.
#[async_trait]
pub trait Radio: Send + Sync {
    /// Begin scanning for advertisements.
    async fn start_scan(&self) -> Result<mpsc::Receiver<Advertisement>>;

    /// Stop an active scan.
    async fn stop_scan(&self) -> Result<()>;
}

#[async_trait]
impl<R: Radio + ?Sized> Radio for Arc<R> {
    async fn start_scan(&self) -> Result<mpsc::Receiver<Advertisement>> {
        (**self).start_scan().await
    }

    async fn stop_scan(&self) -> Result<()> {
        (**self).stop_scan().await
    }
}

/// Radio backend over btleplug.
///
/// The adapter handle is constructed explicitly and owned here for the
/// process lifetime; nothing else touches it.
#[derive(Clone)]
pub struct BtleplugRadio {
    adapter: Adapter,
}

impl BtleplugRadio {
    /// Acquire the first available Bluetooth adapter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoAdapter`] if the system has no adapter, or
    /// [`Error::Adapter`] if the Bluetooth stack could not be reached
    /// (hardware absent, permission denied).
    pub async fn new() -> Result<Self> {
        let manager = Manager::new().await.map_err(Error::Adapter)?;
        let adapters = manager.adapters().await.map_err(Error::Adapter)?;
        let adapter = adapters.into_iter().next().ok_or(Error::NoAdapter)?;
        if let Ok(info) = adapter.adapter_info().await {
            debug!("using bluetooth adapter: {}", info);
        }
        Ok(Self { adapter })
    }

    /// Use a specific adapter instead of the first one found.
    pub fn with_adapter(adapter: Adapter) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl Radio for BtleplugRadio {
    async fn start_scan(&self) -> Result<mpsc::Receiver<Advertisement>> {
        // Subscribe before starting the scan so no early event is missed.
        let mut events = self.adapter.events().await.map_err(Error::Scan)?;
        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(Error::Scan)?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let adapter = self.adapter.clone();

        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let Some(id) = advertisement_source(&event) else {
                    continue;
                };
                let adv = match fetch_advertisement(&adapter, id).await {
                    Ok(Some(adv)) => adv,
                    Ok(None) => continue,
                    Err(e) => {
                        trace!("skipping peripheral {:?}: {}", id, e);
                        continue;
                    }
                };
                // Receiver dropped means the controller is done with us.
                if tx.send(adv).await.is_err() {
                    break;
                }
            }
            debug!("advertisement event stream ended");
        });

        Ok(rx)
    }

    async fn stop_scan(&self) -> Result<()> {
        self.adapter.stop_scan().await.map_err(Error::Stop)
    }
}

/// Peripheral an event carries advertisement data for, if any.
fn advertisement_source(event: &CentralEvent) -> Option<&PeripheralId> {
    match event {
        CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => Some(id),
        CentralEvent::ManufacturerDataAdvertisement { id, .. }
        | CentralEvent::ServiceDataAdvertisement { id, .. }
        | CentralEvent::ServicesAdvertisement { id, .. } => Some(id),
        _ => None,
    }
}

/// Resolve a peripheral ID to its current advertised properties.
async fn fetch_advertisement(
    adapter: &Adapter,
    id: &PeripheralId,
) -> std::result::Result<Option<Advertisement>, btleplug::Error> {
    let peripheral = adapter.peripheral(id).await?;
    let properties = peripheral.properties().await?;
    Ok(properties.map(Advertisement::from_properties))
}
