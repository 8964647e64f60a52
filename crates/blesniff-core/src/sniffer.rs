//! Scanner controller.
//!
//! Owns the radio handle and the address filter, routes each delivered
//! advertisement through the filter and reporter, and resolves the race
//! between driver-initiated scan termination and user-initiated cancellation.

use std::io::Write;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filter::AddressFilter;
use crate::radio::{BtleplugRadio, Radio};
use crate::report::Reporter;

/// Drives a scan-only radio and reports matching advertisements.
///
/// Lifecycle: idle on construction, scanning once [`run`](Sniffer::run) is
/// called, terminal when `run` returns. Exactly one of two resolutions
/// occurs: the driver's scan terminates on its own (an error), or a
/// cancellation is observed and the scan is stopped cleanly.
#[derive(Debug)]
pub struct Sniffer<R> {
    radio: R,
    filter: AddressFilter,
}

impl Sniffer<BtleplugRadio> {
    /// Create a sniffer over the first available Bluetooth adapter.
    ///
    /// # Errors
    ///
    /// Fails if no adapter is present or the Bluetooth stack cannot be
    /// enabled.
    pub async fn new(filter: AddressFilter) -> Result<Self> {
        Ok(Self::with_radio(BtleplugRadio::new().await?, filter))
    }
}

impl<R: Radio> Sniffer<R> {
    /// Create a sniffer over a specific radio.
    pub fn with_radio(radio: R, filter: AddressFilter) -> Self {
        Self { radio, filter }
    }

    /// The configured address filter.
    pub fn filter(&self) -> &AddressFilter {
        &self.filter
    }

    /// Scan until cancelled or the driver's scan terminates.
    ///
    /// Every delivered advertisement is checked against the cancellation
    /// token first: anything arriving after cancellation has been requested
    /// is silently dropped. Surviving advertisements are matched against the
    /// address filter and, on a match, reported in arrival order. A report
    /// that has begun is always written whole.
    ///
    /// # Errors
    ///
    /// - [`Error::Scan`] if the scan cannot be started.
    /// - [`Error::ScanTerminated`] if the driver's scan ends on its own.
    /// - [`Error::Stop`] if the stop request fails during cancellation.
    /// - [`Error::Io`] if writing a report fails.
    pub async fn run<W: Write + Send>(
        &self,
        reporter: &mut Reporter<W>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut events = self.radio.start_scan().await?;
        info!("scan started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("cancellation requested, stopping scan");
                    self.radio.stop_scan().await?;
                    info!("scan stopped");
                    return Ok(());
                }
                event = events.recv() => {
                    let Some(adv) = event else {
                        // The driver ended the scan while we still wanted it.
                        return Err(Error::ScanTerminated);
                    };
                    if cancel.is_cancelled() {
                        continue;
                    }
                    if !self.filter.matches(&adv.address) {
                        continue;
                    }
                    reporter.report(&adv)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::advertisement::Advertisement;
    use crate::mock::MockRadio;

    fn advertisement(address: &str) -> Advertisement {
        Advertisement {
            address: address.to_string(),
            rssi: -60,
            local_name: None,
            manufacturer_data: Vec::new(),
            service_data: Vec::new(),
            raw_data: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_filter_passes_matches_and_drops_the_rest() {
        let radio = MockRadio::with_script(vec![
            advertisement("AA:BB:CC:DD:EE:FF"),
            advertisement("11:22:33:44:55:66"),
        ])
        .close_when_drained();
        let sniffer = Sniffer::with_radio(radio, AddressFilter::new("aa:bb"));

        let mut reporter = Reporter::new(Vec::new());
        let result = sniffer.run(&mut reporter, CancellationToken::new()).await;

        // Script drained, channel closed: the driver "terminated" the scan.
        assert!(matches!(result, Err(Error::ScanTerminated)));

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("Address: AA:BB:CC:DD:EE:FF"));
        assert!(!output.contains("11:22:33:44:55:66"));
    }

    #[tokio::test]
    async fn test_empty_filter_reports_everything() {
        let radio = MockRadio::with_script(vec![
            advertisement("AA:BB:CC:DD:EE:FF"),
            advertisement("11:22:33:44:55:66"),
        ])
        .close_when_drained();
        let sniffer = Sniffer::with_radio(radio, AddressFilter::match_all());

        let mut reporter = Reporter::new(Vec::new());
        let _ = sniffer.run(&mut reporter, CancellationToken::new()).await;

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("AA:BB:CC:DD:EE:FF"));
        assert!(output.contains("11:22:33:44:55:66"));
    }

    #[tokio::test]
    async fn test_cancellation_stops_scan_cleanly() {
        let radio = Arc::new(MockRadio::new());
        let sniffer = Sniffer::with_radio(Arc::clone(&radio), AddressFilter::match_all());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut reporter = Reporter::new(Vec::new());
        sniffer.run(&mut reporter, cancel).await.unwrap();

        assert!(radio.stop_requested());
        assert!(reporter.get_ref().is_empty());
    }

    #[tokio::test]
    async fn test_events_after_cancellation_are_dropped() {
        // Events are already queued when cancellation is requested; none of
        // them may be reported.
        let radio = Arc::new(MockRadio::with_script(vec![
            advertisement("AA:BB:CC:DD:EE:FF"),
            advertisement("11:22:33:44:55:66"),
        ]));
        let sniffer = Sniffer::with_radio(Arc::clone(&radio), AddressFilter::match_all());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut reporter = Reporter::new(Vec::new());
        sniffer.run(&mut reporter, cancel).await.unwrap();

        assert!(radio.stop_requested());
        assert!(reporter.get_ref().is_empty());
    }

    #[tokio::test]
    async fn test_live_cancellation_after_reports() {
        let radio = Arc::new(MockRadio::new());
        let tx = radio.sender().await.unwrap();
        let sniffer = Sniffer::with_radio(Arc::clone(&radio), AddressFilter::match_all());
        let cancel = CancellationToken::new();

        let run_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut reporter = Reporter::new(Vec::new());
            let result = sniffer.run(&mut reporter, run_cancel).await;
            (result, reporter.into_inner())
        });

        tx.send(advertisement("AA:BB:CC:DD:EE:FF")).await.unwrap();
        // Let the controller drain the event before cancelling.
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let (result, output) = handle.await.unwrap();
        result.unwrap();
        assert!(radio.stop_requested());

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Address: AA:BB:CC:DD:EE:FF").count(), 1);
    }

    #[tokio::test]
    async fn test_start_failure_surfaces_scan_error() {
        let radio = MockRadio::new();
        radio.set_fail_start(true);
        let sniffer = Sniffer::with_radio(radio, AddressFilter::match_all());

        let mut reporter = Reporter::new(Vec::new());
        let result = sniffer.run(&mut reporter, CancellationToken::new()).await;
        assert!(matches!(result, Err(Error::Scan(_))));
    }

    #[tokio::test]
    async fn test_stop_failure_surfaces_stop_error() {
        let radio = MockRadio::new();
        radio.set_fail_stop(true);
        let sniffer = Sniffer::with_radio(radio, AddressFilter::match_all());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut reporter = Reporter::new(Vec::new());
        let result = sniffer.run(&mut reporter, cancel).await;
        assert!(matches!(result, Err(Error::Stop(_))));
    }
}
