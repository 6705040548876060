//! Common utilities for aoa-hid
//!
//! This crate provides pieces shared by the protocol tests and the host
//! binary: error handling, logging setup, USB device identities, and mock
//! transports for testing.

pub mod error;
pub mod logging;
pub mod test_utils;
pub mod usb_types;

pub use error::{Error, Result};
pub use logging::setup_logging;
pub use usb_types::DeviceIdentity;
