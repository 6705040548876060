//! AOA-HID protocol library
//!
//! This crate implements the HID extension of the Android Open Accessory 2.0
//! protocol: the vendor request codes, the report-descriptor fragmentation
//! rule, and a client that drives them over any [`ControlTransport`].
//!
//! It does not depend on a USB library. The binary crate supplies the transport.
//!
//! # Example
//!
//! ```
//! use protocol::{ControlSetup, ControlTransport, HidClient, UsbError};
//! use protocol::{MOUSE_CLICK_EVENT, MOUSE_REPORT_DESCRIPTOR};
//! use std::time::Duration;
//!
//! struct Sink(Vec<ControlSetup>);
//!
//! impl ControlTransport for Sink {
//!     fn write_control(
//!         &mut self,
//!         setup: ControlSetup,
//!         data: &[u8],
//!         _timeout: Duration,
//!     ) -> Result<usize, UsbError> {
//!         self.0.push(setup);
//!         Ok(data.len())
//!     }
//! }
//!
//! let mut client = HidClient::new(Sink(Vec::new()));
//! client.register_hid(MOUSE_REPORT_DESCRIPTOR.len() as u16).unwrap();
//! client.send_hid_descriptor(&MOUSE_REPORT_DESCRIPTOR, 64).unwrap();
//! client.send_hid_event(&MOUSE_CLICK_EVENT).unwrap();
//!
//! assert_eq!(client.transport().0.len(), 3);
//! ```

pub mod client;
pub mod descriptor;
pub mod error;
pub mod fragment;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::HidClient;
pub use descriptor::{MOUSE_CLICK_EVENT, MOUSE_REPORT_DESCRIPTOR};
pub use error::{ProtocolError, Result};
pub use fragment::{Chunk, ChunkPlan, chunk_plan};
pub use retry::RetryPolicy;
pub use transport::ControlTransport;
pub use types::{
    ACCESSORY_HID_ID, AOA_REQUEST_TYPE, AoaRequest, ControlSetup, DEFAULT_TIMEOUT, UsbError,
};
