//! Core AOA-HID protocol types
//!
//! Request codes and control-setup encoding from the Android Open Accessory 2.0
//! HID extension: <https://source.android.com/devices/accessories/aoa2#hid-support>

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Accessory-assigned id of the virtual HID device.
///
/// Only one virtual HID device is ever registered, so the id is fixed.
pub const ACCESSORY_HID_ID: u16 = 0;

/// Timeout applied to every AOA control transfer
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// bmRequestType for every AOA HID request: host-to-device | vendor | device
pub const AOA_REQUEST_TYPE: u8 = 0x40;

/// AOA vendor requests for HID support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AoaRequest {
    /// ACCESSORY_REGISTER_HID
    RegisterHid = 54,
    /// ACCESSORY_UNREGISTER_HID
    UnregisterHid = 55,
    /// ACCESSORY_SET_HID_REPORT_DESC
    SetHidReportDesc = 56,
    /// ACCESSORY_SEND_HID_EVENT
    SendHidEvent = 57,
}

impl AoaRequest {
    /// bRequest value on the wire
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for AoaRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RegisterHid => "register HID",
            Self::UnregisterHid => "unregister HID",
            Self::SetHidReportDesc => "set HID report descriptor",
            Self::SendHidEvent => "send HID event",
        };
        f.write_str(name)
    }
}

/// Setup stage of a single AOA control transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSetup {
    pub request_type: u8,
    pub request: AoaRequest,
    pub value: u16,
    pub index: u16,
}

impl ControlSetup {
    /// Vendor OUT request addressed to the accessory HID id
    pub const fn vendor_out(request: AoaRequest, index: u16) -> Self {
        Self {
            request_type: AOA_REQUEST_TYPE,
            request,
            value: ACCESSORY_HID_ID,
            index,
        }
    }
}

/// Native USB transport errors
///
/// Mirrors the libusb error codes. Display text matches `libusb_strerror`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsbError {
    #[error("Input/Output Error")]
    Io,
    #[error("Invalid parameter")]
    InvalidParam,
    #[error("Access denied (insufficient permissions)")]
    Access,
    #[error("No such device (it may have been disconnected)")]
    NoDevice,
    #[error("Entity not found")]
    NotFound,
    #[error("Resource busy")]
    Busy,
    #[error("Operation timed out")]
    Timeout,
    #[error("Overflow")]
    Overflow,
    #[error("Pipe error")]
    Pipe,
    #[error("System call interrupted (perhaps due to signal)")]
    Interrupted,
    #[error("Insufficient memory")]
    NoMem,
    #[error("Operation not supported or unimplemented on this platform")]
    NotSupported,
    /// Anything else the transport reports
    #[error("{message}")]
    Other { message: String },
}
