//! Protocol error types

use crate::types::{AoaRequest, UsbError};
use thiserror::Error;

/// AOA-HID protocol errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A control transfer was rejected by the transport
    #[error("{request} failed (index {index}): {error}")]
    Transfer {
        request: AoaRequest,
        /// Index field of the failing transfer; the chunk offset for descriptor uploads
        index: u16,
        error: UsbError,
    },

    /// Descriptor fragmentation needs a non-zero chunk size
    #[error("Chunk size must be non-zero")]
    ZeroChunkSize,

    /// Report descriptor length does not fit the 16-bit index field
    #[error("HID report descriptor too large: {len} bytes (max: {max})", max = u16::MAX)]
    DescriptorTooLarge { len: usize },

    /// HID event length does not fit a single control transfer
    #[error("HID event too large: {len} bytes (max: {max})", max = u16::MAX)]
    EventTooLarge { len: usize },
}

impl ProtocolError {
    /// Native transport error behind a failed transfer
    pub fn usb_error(&self) -> Option<&UsbError> {
        match self {
            Self::Transfer { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Type alias for protocol results
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_display() {
        let err = ProtocolError::Transfer {
            request: AoaRequest::SetHidReportDesc,
            index: 40,
            error: UsbError::Pipe,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("set HID report descriptor"));
        assert!(msg.contains("40"));
        assert!(msg.ends_with("Pipe error"));
        assert_eq!(err.usb_error(), Some(&UsbError::Pipe));
    }

    #[test]
    fn test_descriptor_too_large_error() {
        let err = ProtocolError::DescriptorTooLarge { len: 70_000 };
        let msg = format!("{}", err);
        assert!(msg.contains("70000"));
        assert!(msg.contains("65535"));
        assert_eq!(err.usb_error(), None);
    }
}
