//! Mock radio implementation for testing.
//!
//! Provides a [`MockRadio`] that can be used for unit testing without BLE
//! hardware: scripted advertisements, live injection through a sender handle,
//! and failure injection for the start and stop paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::advertisement::Advertisement;
use crate::error::{Error, Result};
use crate::radio::Radio;

/// A mock radio for testing.
///
/// The advertisement channel is created at construction, so tests can grab a
/// [`sender`](MockRadio::sender) before the scan starts and feed events while
/// the sniffer runs.
///
/// # Example
///
/// ```
/// use blesniff_core::mock::MockRadio;
/// use blesniff_core::radio::Radio;
///
/// #[tokio::main]
/// async fn main() {
///     let radio = MockRadio::new();
///     let mut events = radio.start_scan().await.unwrap();
///     radio.stop_scan().await.unwrap();
///     assert!(radio.stop_requested());
///     assert!(events.recv().await.is_none());
/// }
/// ```
#[derive(Debug)]
pub struct MockRadio {
    receiver: Mutex<Option<mpsc::Receiver<Advertisement>>>,
    sender: Mutex<Option<mpsc::Sender<Advertisement>>>,
    scan_started: AtomicBool,
    stop_requested: AtomicBool,
    fail_start: AtomicBool,
    fail_stop: AtomicBool,
}

impl MockRadio {
    /// Create a mock radio with an open advertisement channel.
    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    /// Create a mock radio whose channel already holds `advertisements`.
    ///
    /// The channel stays open afterwards; call
    /// [`close_when_drained`](Self::close_when_drained) to have the scan
    /// terminate once the script has been delivered.
    pub fn with_script(advertisements: Vec<Advertisement>) -> Self {
        let radio = Self::with_capacity(advertisements.len() + 8);
        {
            let guard = radio
                .sender
                .try_lock()
                .expect("no other handle exists during construction");
            if let Some(tx) = guard.as_ref() {
                for adv in advertisements {
                    tx.try_send(adv)
                        .expect("scripted channel sized to fit the script");
                }
            }
        }
        radio
    }

    fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            receiver: Mutex::new(Some(rx)),
            sender: Mutex::new(Some(tx)),
            scan_started: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            fail_start: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
        }
    }

    /// Drop the sender so the advertisement channel closes once all queued
    /// events have been consumed, as if the driver's scan terminated.
    pub fn close_when_drained(mut self) -> Self {
        *self.sender.get_mut() = None;
        self
    }

    /// Make the next `start_scan` fail.
    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    /// Make the next `stop_scan` fail.
    pub fn set_fail_stop(&self, fail: bool) {
        self.fail_stop.store(fail, Ordering::SeqCst);
    }

    /// A sender for feeding advertisements live, if the channel is open.
    pub async fn sender(&self) -> Option<mpsc::Sender<Advertisement>> {
        self.sender.lock().await.clone()
    }

    /// Whether `start_scan` has been called.
    pub fn scan_started(&self) -> bool {
        self.scan_started.load(Ordering::SeqCst)
    }

    /// Whether `stop_scan` has been called.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Radio for MockRadio {
    async fn start_scan(&self) -> Result<mpsc::Receiver<Advertisement>> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Error::Scan(btleplug::Error::RuntimeError(
                "injected start failure".to_string(),
            )));
        }
        let receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or_else(|| Error::Scan(btleplug::Error::RuntimeError(
                "scan already started".to_string(),
            )))?;
        self.scan_started.store(true, Ordering::SeqCst);
        Ok(receiver)
    }

    async fn stop_scan(&self) -> Result<()> {
        self.stop_requested.store(true, Ordering::SeqCst);
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(Error::Stop(btleplug::Error::RuntimeError(
                "injected stop failure".to_string(),
            )));
        }
        // Close the channel the way a real driver ends its event stream.
        self.sender.lock().await.take();
        Ok(())
    }
}
