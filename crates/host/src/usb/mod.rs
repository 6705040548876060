//! USB subsystem
//!
//! Thin adapter between the AOA-HID protocol client and libusb (through rusb):
//! - Device enumeration and lookup by vendor/product id
//! - Opening a device as a [`protocol::ControlTransport`]
//!
//! Device references and handles are released on drop, so every exit path of
//! a session gives back exactly what it acquired.

pub mod backend;
pub mod locator;

pub use backend::{RusbBackend, UsbBackend};
pub use locator::{LocateError, find_device, list_devices};
