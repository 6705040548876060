//! Device lookup by vendor/product id

use crate::usb::backend::{DeviceSummary, UsbBackend};
use common::DeviceIdentity;
use protocol::UsbError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LocateError {
    /// The device list could not be read
    #[error("Failed to enumerate USB devices: {0}")]
    Enumeration(UsbError),

    #[error("Device {0} not found")]
    NotFound(DeviceIdentity),
}

/// A matched device together with its descriptor fields
pub struct LocatedDevice<D> {
    pub device: D,
    pub summary: DeviceSummary,
}

/// Find the first attached device with the given vendor/product id
///
/// Devices are scanned in enumeration order and the scan stops at the first
/// match. References to every other enumerated device are released before
/// returning; only the match survives.
pub fn find_device<B: UsbBackend>(
    backend: &B,
    identity: DeviceIdentity,
) -> Result<LocatedDevice<B::Device>, LocateError> {
    let devices = backend.devices().map_err(LocateError::Enumeration)?;
    debug!("Scanning {} device(s) for {}", devices.len(), identity);

    for device in devices {
        let summary = match backend.summary(&device) {
            Ok(summary) => summary,
            Err(e) => {
                debug!("Skipping device with unreadable descriptor: {}", e);
                continue;
            }
        };

        if summary.identity == identity {
            return Ok(LocatedDevice { device, summary });
        }
    }

    Err(LocateError::NotFound(identity))
}

/// Descriptor summaries of every attached device
pub fn list_devices<B: UsbBackend>(backend: &B) -> Result<Vec<DeviceSummary>, LocateError> {
    let devices = backend.devices().map_err(LocateError::Enumeration)?;

    Ok(devices
        .iter()
        .filter_map(|device| backend.summary(device).ok())
        .collect())
}
