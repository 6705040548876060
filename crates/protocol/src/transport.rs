//! Control-transfer capability consumed by the protocol client

use crate::types::{ControlSetup, UsbError};
use std::time::Duration;

/// Synchronous host-to-device control transfers on endpoint 0
///
/// Implemented by the USB adapter in the binary crate and by test mocks.
pub trait ControlTransport {
    /// Issue one OUT control transfer, returning the number of bytes written
    fn write_control(
        &mut self,
        setup: ControlSetup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, UsbError>;
}

impl<T: ControlTransport + ?Sized> ControlTransport for &mut T {
    fn write_control(
        &mut self,
        setup: ControlSetup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, UsbError> {
        (**self).write_control(setup, data, timeout)
    }
}
