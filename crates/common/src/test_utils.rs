//! Test utilities for aoa-hid
//!
//! Provides a recording mock [`ControlTransport`] with scripted failures.
//!
//! # Example
//!
//! ```
//! use common::test_utils::MockTransport;
//! use protocol::{AoaRequest, HidClient, UsbError};
//!
//! let transport = MockTransport::new().fail_on_call(1, UsbError::Pipe);
//! let log = transport.log();
//!
//! let mut client = HidClient::new(transport);
//! client.register_hid(46).unwrap();
//! assert!(client.send_hid_event(&[0, 1, 2, 3]).is_err());
//!
//! assert_eq!(
//!     log.requests(),
//!     vec![AoaRequest::RegisterHid, AoaRequest::SendHidEvent]
//! );
//! ```

use protocol::{AoaRequest, ControlSetup, ControlTransport, UsbError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One control transfer seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub setup: ControlSetup,
    pub data: Vec<u8>,
    pub timeout: Duration,
}

/// Shared view of the transfers a [`MockTransport`] received
///
/// Stays readable after the transport itself has been moved or dropped.
#[derive(Debug, Clone, Default)]
pub struct TransferLog(Arc<Mutex<Vec<RecordedTransfer>>>);

impl TransferLog {
    fn push(&self, transfer: RecordedTransfer) {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(transfer);
    }

    /// Snapshot of all recorded transfers
    pub fn transfers(&self) -> Vec<RecordedTransfer> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Request codes in the order they were issued
    pub fn requests(&self) -> Vec<AoaRequest> {
        self.transfers().iter().map(|t| t.setup.request).collect()
    }

    /// Transfers for one request code
    pub fn of(&self, request: AoaRequest) -> Vec<RecordedTransfer> {
        self.transfers()
            .into_iter()
            .filter(|t| t.setup.request == request)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
enum FailRule {
    /// Fail the n-th call (0-based) overall
    Call { call: usize, error: UsbError },
    /// Fail the next `times` calls of a request code
    Request {
        request: AoaRequest,
        times: usize,
        error: UsbError,
    },
}

/// Mock control transport recording every transfer
#[derive(Debug, Default)]
pub struct MockTransport {
    log: TransferLog,
    rules: Vec<FailRule>,
    calls: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `call`-th transfer (0-based) with `error`
    pub fn fail_on_call(mut self, call: usize, error: UsbError) -> Self {
        self.rules.push(FailRule::Call { call, error });
        self
    }

    /// Fail the next `times` transfers of `request` with `error`
    pub fn fail_request(mut self, request: AoaRequest, times: usize, error: UsbError) -> Self {
        self.rules.push(FailRule::Request {
            request,
            times,
            error,
        });
        self
    }

    /// Handle on the transfer log
    pub fn log(&self) -> TransferLog {
        self.log.clone()
    }

    fn scripted_failure(&mut self, request: AoaRequest) -> Option<UsbError> {
        let call = self.calls;
        for rule in &mut self.rules {
            match rule {
                FailRule::Call { call: n, error } if *n == call => return Some(error.clone()),
                FailRule::Request {
                    request: r,
                    times,
                    error,
                } if *r == request && *times > 0 => {
                    *times -= 1;
                    return Some(error.clone());
                }
                _ => {}
            }
        }
        None
    }
}

impl ControlTransport for MockTransport {
    fn write_control(
        &mut self,
        setup: ControlSetup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, UsbError> {
        self.log.push(RecordedTransfer {
            setup,
            data: data.to_vec(),
            timeout,
        });

        let outcome = match self.scripted_failure(setup.request) {
            Some(error) => Err(error),
            None => Ok(data.len()),
        };
        self.calls += 1;
        outcome
    }
}
