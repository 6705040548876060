//! Session driver
//!
//! Runs the one scripted AOA-HID interaction:
//! `Init -> Located -> Opened -> Registered -> DescriptorSent -> EventSent -> Closed`.
//!
//! The located device reference and the open handle are owned by this
//! function's stack frame, so any failure releases them on the way out in
//! reverse acquisition order.

use crate::usb::{LocateError, UsbBackend, find_device};
use common::DeviceIdentity;
use protocol::{DEFAULT_TIMEOUT, HidClient, ProtocolError, RetryPolicy, UsbError};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Delay between the last descriptor fragment and the first event.
///
/// Devices reject events sent before they finish committing a new HID
/// descriptor; 100 ms was found to be enough in practice.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Stages of a session, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Init,
    Located,
    Opened,
    Registered,
    DescriptorSent,
    EventSent,
    Closed,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Located => "located",
            Self::Opened => "opened",
            Self::Registered => "registered",
            Self::DescriptorSent => "descriptor sent",
            Self::EventSent => "event sent",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error("Failed to open device {identity}: {error}")]
    Open {
        identity: DeviceIdentity,
        error: UsbError,
    },

    /// A protocol step failed; `stage` is the last stage reached
    #[error("{error}")]
    Protocol {
        stage: SessionStage,
        error: ProtocolError,
    },
}

impl SessionError {
    /// Last stage completed before the failure
    pub fn stage(&self) -> SessionStage {
        match self {
            Self::Locate(_) => SessionStage::Init,
            Self::Open { .. } => SessionStage::Located,
            Self::Protocol { stage, .. } => *stage,
        }
    }
}

/// Tunables for one session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub timeout: Duration,
    pub settle_delay: Duration,
    pub retry: RetryPolicy,
    /// Unregister the HID device after the event was delivered
    pub unregister: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            retry: RetryPolicy::none(),
            unregister: false,
        }
    }
}

/// Register `descriptor` on the device `identity` and send it one `event`
pub fn run_session<B: UsbBackend>(
    backend: &B,
    identity: DeviceIdentity,
    descriptor: &[u8],
    event: &[u8],
    options: &SessionOptions,
) -> Result<(), SessionError> {
    let descriptor_len =
        u16::try_from(descriptor.len()).map_err(|_| SessionError::Protocol {
            stage: SessionStage::Init,
            error: ProtocolError::DescriptorTooLarge {
                len: descriptor.len(),
            },
        })?;

    let located = find_device(backend, identity)?;
    let max_packet_size_0 = located.summary.max_packet_size_0;
    info!("Device {} found. Opening...", identity);
    debug!(
        "Bus {:03} address {:03}, max packet size 0: {}",
        located.summary.bus_number, located.summary.device_address, max_packet_size_0
    );

    let transport = backend
        .open(&located.device)
        .map_err(|error| SessionError::Open { identity, error })?;
    let mut client = HidClient::new(transport).with_timeout(options.timeout);

    let mut stage = SessionStage::Opened;
    let fail = |stage: SessionStage| {
        move |error: ProtocolError| SessionError::Protocol { stage, error }
    };

    info!("Registering HID...");
    client.register_hid(descriptor_len).map_err(fail(stage))?;
    stage = SessionStage::Registered;

    info!("Sending HID descriptor...");
    client
        .send_hid_descriptor(descriptor, max_packet_size_0)
        .map_err(fail(stage))?;
    stage = SessionStage::DescriptorSent;

    std::thread::sleep(options.settle_delay);

    info!("Sending HID event...");
    client
        .send_hid_event_with_retry(event, &options.retry)
        .map_err(fail(stage))?;
    stage = SessionStage::EventSent;

    if options.unregister {
        info!("Unregistering HID...");
        client.unregister_hid().map_err(fail(stage))?;
    }

    drop(client);
    debug!("Session {}", SessionStage::Closed);
    Ok(())
}
