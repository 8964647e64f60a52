//! Advertisement data model.
//!
//! One [`Advertisement`] is produced per radio event, handed to the reporter,
//! and discarded. Nothing here is persisted.

use btleplug::api::PeripheralProperties;
use uuid::Uuid;

/// One manufacturer-specific data entry from an advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerData {
    /// Bluetooth SIG assigned company identifier.
    pub company_id: u16,
    /// Vendor-specific payload.
    pub data: Vec<u8>,
}

/// One service data entry from an advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceData {
    /// UUID of the advertised service.
    pub uuid: Uuid,
    /// Service-specific payload.
    pub data: Vec<u8>,
}

/// One observed BLE advertisement event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Device address as delivered by the driver, typically colon-separated
    /// hex octets (all zeros on macOS, where addresses are hidden).
    pub address: String,
    /// Signal strength in dBm. 0 means no reading was available.
    pub rssi: i16,
    /// Advertised local name, if any.
    pub local_name: Option<String>,
    /// Manufacturer data entries, sorted by company identifier.
    pub manufacturer_data: Vec<ManufacturerData>,
    /// Service data entries, sorted by service UUID.
    pub service_data: Vec<ServiceData>,
    /// Raw advertisement PDU bytes. Empty when the platform driver does not
    /// expose them (btleplug never does).
    pub raw_data: Vec<u8>,
}

impl Advertisement {
    /// Build an advertisement from btleplug peripheral properties.
    ///
    /// btleplug hands manufacturer and service data over as hash maps; the
    /// entries are sorted by key here so report output is deterministic.
    pub fn from_properties(properties: PeripheralProperties) -> Self {
        let mut manufacturer_data: Vec<ManufacturerData> = properties
            .manufacturer_data
            .into_iter()
            .map(|(company_id, data)| ManufacturerData { company_id, data })
            .collect();
        manufacturer_data.sort_by_key(|entry| entry.company_id);

        let mut service_data: Vec<ServiceData> = properties
            .service_data
            .into_iter()
            .map(|(uuid, data)| ServiceData { uuid, data })
            .collect();
        service_data.sort_by_key(|entry| entry.uuid);

        Self {
            address: properties.address.to_string(),
            rssi: properties.rssi.unwrap_or(0),
            local_name: properties.local_name,
            manufacturer_data,
            service_data,
            // The platform APIs only expose parsed fields, not the raw PDU.
            raw_data: Vec::new(),
        }
    }
}
