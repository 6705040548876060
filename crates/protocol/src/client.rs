//! AOA-HID protocol client
//!
//! Issues the four HID vendor requests over a [`ControlTransport`]. Every
//! operation is a host-to-device vendor control transfer with `value` set to
//! [`ACCESSORY_HID_ID`](crate::ACCESSORY_HID_ID).

use crate::error::{ProtocolError, Result};
use crate::fragment::chunk_plan;
use crate::retry::RetryPolicy;
use crate::transport::ControlTransport;
use crate::types::{AoaRequest, ControlSetup, DEFAULT_TIMEOUT};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the HID functions of an accessory-mode Android device
pub struct HidClient<T> {
    transport: T,
    timeout: Duration,
}

impl<T: ControlTransport> HidClient<T> {
    /// Create a client using the default 1000 ms transfer timeout
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-transfer timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Announce a HID device whose report descriptor is `descriptor_len` bytes
    ///
    /// Must precede [`send_hid_descriptor`](Self::send_hid_descriptor).
    pub fn register_hid(&mut self, descriptor_len: u16) -> Result<()> {
        self.transfer(AoaRequest::RegisterHid, descriptor_len, &[])
    }

    /// Drop the virtual HID device registered under the accessory id
    pub fn unregister_hid(&mut self) -> Result<()> {
        self.transfer(AoaRequest::UnregisterHid, 0, &[])
    }

    /// Upload the report descriptor in chunks of at most `max_chunk_size` bytes
    ///
    /// Each chunk carries its offset in the index field. The first failing
    /// chunk aborts the upload; whatever the device already received stays there.
    pub fn send_hid_descriptor(&mut self, descriptor: &[u8], max_chunk_size: u8) -> Result<()> {
        let total_len = u16::try_from(descriptor.len()).map_err(|_| {
            ProtocolError::DescriptorTooLarge {
                len: descriptor.len(),
            }
        })?;

        let plan = chunk_plan(total_len, max_chunk_size)?;
        debug!(
            "Uploading {}-byte report descriptor in {} chunk(s) of <= {} bytes",
            total_len,
            plan.len(),
            max_chunk_size
        );

        for chunk in plan {
            self.transfer(
                AoaRequest::SetHidReportDesc,
                chunk.offset,
                &descriptor[chunk.range()],
            )?;
        }

        Ok(())
    }

    /// Send one input report in a single transfer
    pub fn send_hid_event(&mut self, event: &[u8]) -> Result<()> {
        if event.len() > u16::MAX as usize {
            return Err(ProtocolError::EventTooLarge { len: event.len() });
        }

        self.transfer(AoaRequest::SendHidEvent, 0, event)
    }

    /// Send one input report, retrying failures that mean "not ready yet"
    pub fn send_hid_event_with_retry(&mut self, event: &[u8], policy: &RetryPolicy) -> Result<()> {
        let mut retry = 0;
        loop {
            match self.send_hid_event(event) {
                Err(e)
                    if retry < policy.retries
                        && e.usb_error().is_some_and(RetryPolicy::is_retryable) =>
                {
                    let delay = policy.delay_for(retry);
                    warn!(
                        "HID event rejected ({}), retry {}/{} in {:?}",
                        e,
                        retry + 1,
                        policy.retries,
                        delay
                    );
                    std::thread::sleep(delay);
                    retry += 1;
                }
                result => return result,
            }
        }
    }

    fn transfer(&mut self, request: AoaRequest, index: u16, data: &[u8]) -> Result<()> {
        let setup = ControlSetup::vendor_out(request, index);
        debug!(
            "Control transfer: request={} ({}), value={:#x}, index={}, data_len={}",
            request.code(),
            request,
            setup.value,
            index,
            data.len()
        );

        self.transport
            .write_control(setup, data, self.timeout)
            .map(|_| ())
            .map_err(|error| {
                warn!("{} failed at index {}: {}", request, index, error);
                ProtocolError::Transfer {
                    request,
                    index,
                    error,
                }
            })
    }
}
