//! USB backend abstraction and its rusb implementation

use common::DeviceIdentity;
use protocol::{ControlSetup, ControlTransport, UsbError};
use rusb::{Context, Device, DeviceHandle, UsbContext};
use std::time::Duration;
use tracing::debug;

/// Descriptor fields the tool needs from an attached device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSummary {
    pub bus_number: u8,
    pub device_address: u8,
    pub identity: DeviceIdentity,
    /// bMaxPacketSize0 of the default control endpoint
    pub max_packet_size_0: u8,
}

/// Device enumeration and opening
///
/// `Device` values hold a reference on the underlying USB device and release
/// it when dropped. `Transport` values own an open handle and close it when dropped.
pub trait UsbBackend {
    type Device;
    type Transport: ControlTransport;

    /// Snapshot of the currently attached devices, in enumeration order
    fn devices(&self) -> Result<Vec<Self::Device>, UsbError>;

    /// Read the device descriptor fields of `device`
    fn summary(&self, device: &Self::Device) -> Result<DeviceSummary, UsbError>;

    /// Open `device` for control transfers
    fn open(&self, device: &Self::Device) -> Result<Self::Transport, UsbError>;
}

/// libusb backend
///
/// Owns the process-wide libusb context; it is torn down when the backend drops.
pub struct RusbBackend {
    context: Context,
}

impl RusbBackend {
    /// Initialize libusb
    pub fn new() -> Result<Self, UsbError> {
        let context = Context::new().map_err(map_rusb_error)?;
        debug!("libusb context initialized");
        Ok(Self { context })
    }
}

impl UsbBackend for RusbBackend {
    type Device = Device<Context>;
    type Transport = RusbTransport;

    fn devices(&self) -> Result<Vec<Device<Context>>, UsbError> {
        // The DeviceList is freed here; each collected Device keeps its own reference.
        let list = self.context.devices().map_err(map_rusb_error)?;
        Ok(list.iter().collect())
    }

    fn summary(&self, device: &Device<Context>) -> Result<DeviceSummary, UsbError> {
        let descriptor = device.device_descriptor().map_err(map_rusb_error)?;

        Ok(DeviceSummary {
            bus_number: device.bus_number(),
            device_address: device.address(),
            identity: DeviceIdentity::new(descriptor.vendor_id(), descriptor.product_id()),
            max_packet_size_0: descriptor.max_packet_size(),
        })
    }

    fn open(&self, device: &Device<Context>) -> Result<RusbTransport, UsbError> {
        let handle = device.open().map_err(map_rusb_error)?;
        debug!(
            "Opened device on bus {:03} address {:03}",
            device.bus_number(),
            device.address()
        );
        Ok(RusbTransport { handle })
    }
}

/// Open libusb device handle used as the AOA control channel
pub struct RusbTransport {
    handle: DeviceHandle<Context>,
}

impl ControlTransport for RusbTransport {
    fn write_control(
        &mut self,
        setup: ControlSetup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, UsbError> {
        self.handle
            .write_control(
                setup.request_type,
                setup.request.code(),
                setup.value,
                setup.index,
                data,
                timeout,
            )
            .map_err(map_rusb_error)
    }
}

impl Drop for RusbTransport {
    fn drop(&mut self) {
        debug!("Closing device handle");
    }
}

/// Map rusb::Error to protocol::UsbError
pub fn map_rusb_error(err: rusb::Error) -> UsbError {
    match err {
        rusb::Error::Io => UsbError::Io,
        rusb::Error::InvalidParam => UsbError::InvalidParam,
        rusb::Error::Access => UsbError::Access,
        rusb::Error::NoDevice => UsbError::NoDevice,
        rusb::Error::NotFound => UsbError::NotFound,
        rusb::Error::Busy => UsbError::Busy,
        rusb::Error::Timeout => UsbError::Timeout,
        rusb::Error::Overflow => UsbError::Overflow,
        rusb::Error::Pipe => UsbError::Pipe,
        rusb::Error::Interrupted => UsbError::Interrupted,
        rusb::Error::NoMem => UsbError::NoMem,
        rusb::Error::NotSupported => UsbError::NotSupported,
        _ => UsbError::Other {
            message: err.to_string(),
        },
    }
}
