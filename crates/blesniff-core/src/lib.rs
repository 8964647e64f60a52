//! Core library for sniffing BLE advertisement packets.
//!
//! This crate receives a stream of Bluetooth Low Energy scan results,
//! filters them by device address, decodes the typed sub-fields of each
//! advertisement, and renders a distance-annotated textual report per event.
//!
//! # Architecture
//!
//! - [`radio`] abstracts the Bluetooth stack behind the [`Radio`] trait. The
//!   driver's event callbacks are re-expressed as a bounded channel of
//!   [`Advertisement`] values. [`BtleplugRadio`] is the hardware backend;
//!   [`MockRadio`] stands in for hardware in tests.
//! - [`Sniffer`] is the controller: it starts the scan, applies the
//!   [`AddressFilter`], hands matches to the [`Reporter`], and observes a
//!   `CancellationToken` cooperatively.
//! - [`distance`] and [`report`] are pure: the same advertisement and
//!   timestamp always render to the same bytes.
//!
//! # Quick Start
//!
//! ```no_run
//! use blesniff_core::{AddressFilter, Reporter, Sniffer};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sniffer = Sniffer::new(AddressFilter::new("aa:bb")).await?;
//!     let mut reporter = Reporter::stdout();
//!     let cancel = CancellationToken::new();
//!     // Cancel the token from a signal handler to stop cleanly.
//!     sniffer.run(&mut reporter, cancel).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Platform Notes
//!
//! On macOS the system hides device addresses, so every advertisement
//! carries `00:00:00:00:00:00`; address filtering is only meaningful on
//! Linux and Windows. No platform exposes the raw advertisement PDU through
//! btleplug, so the raw-bytes report section is omitted there.

pub mod advertisement;
pub mod distance;
pub mod error;
pub mod filter;
pub mod mock;
pub mod radio;
pub mod report;
pub mod sniffer;

pub use advertisement::{Advertisement, ManufacturerData, ServiceData};
pub use distance::estimate_distance;
pub use error::{Error, Result};
pub use filter::AddressFilter;
pub use mock::MockRadio;
pub use radio::{BtleplugRadio, Radio};
pub use report::{Reporter, render};
pub use sniffer::Sniffer;
