//! Advertisement report rendering.
//!
//! Each report is a fixed-order multi-line block: timestamped header,
//! address, RSSI, estimated distance, then name, manufacturer data, service
//! data and raw bytes, each of which is omitted when empty. A trailing blank
//! line separates reports.

use std::io::{self, Write};

use time::OffsetDateTime;

use crate::advertisement::Advertisement;
use crate::distance::estimate_distance;
use crate::error::Result;

/// Render one advertisement into its report text.
///
/// Pure function of the advertisement and timestamp, so output is
/// byte-deterministic and testable without capturing a clock.
pub fn render(adv: &Advertisement, timestamp: OffsetDateTime) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== [{:02}:{:02}:{:02}.{:03}] ===\n",
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
        timestamp.millisecond()
    ));
    out.push_str(&format!("Address: {}\n", adv.address));
    out.push_str(&format!("RSSI: {} dBm\n", adv.rssi));
    out.push_str(&format!(
        "Estimated Distance: {:.2}m\n",
        estimate_distance(adv.rssi)
    ));

    if let Some(name) = adv.local_name.as_deref()
        && !name.is_empty()
    {
        out.push_str(&format!("Local Name: {}\n", name));
    }

    if !adv.manufacturer_data.is_empty() {
        out.push_str("Manufacturer Data:\n");
        for entry in &adv.manufacturer_data {
            out.push_str(&format!("  Company ID: 0x{:04x}\n", entry.company_id));
            out.push_str(&format!("  Data: {}\n", hex::encode(&entry.data)));
        }
    }

    if !adv.service_data.is_empty() {
        out.push_str("Service Data:\n");
        for entry in &adv.service_data {
            out.push_str(&format!("  Service UUID: {}\n", entry.uuid));
            out.push_str(&format!("  Data: {}\n", hex::encode(&entry.data)));
        }
    }

    if !adv.raw_data.is_empty() {
        out.push_str(&format!(
            "Raw Advertisement Data: {}\n",
            hex::encode(&adv.raw_data)
        ));
    }

    out.push('\n');
    out
}

/// Writes advertisement reports to an output sink.
///
/// Each report is written whole in a single call, so a report that has
/// started rendering is never cut short by cancellation.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    writer: W,
}

impl Reporter<io::Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    /// Create a reporter over an arbitrary writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Render `adv` with the current UTC time and write it out.
    pub fn report(&mut self, adv: &Advertisement) -> Result<()> {
        let rendered = render(adv, OffsetDateTime::now_utc());
        self.writer.write_all(rendered.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the reporter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
