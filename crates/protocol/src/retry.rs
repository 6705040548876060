//! Retry policy for HID event delivery
//!
//! A device that has just received the last descriptor fragment may still be
//! committing the new HID device and reject the first event. The policy retries
//! only those "not ready yet" failures, with exponential backoff.

use crate::types::UsbError;
use std::time::Duration;

/// Bounded retry-with-backoff for ACCESSORY_SEND_HID_EVENT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    /// Delay before the first retry; doubled for each retry after that
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub const fn none() -> Self {
        Self {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub const fn new(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }

    /// Whether a failed event send may succeed if tried again
    pub fn is_retryable(error: &UsbError) -> bool {
        matches!(error, UsbError::Pipe | UsbError::Busy | UsbError::Io)
    }

    /// Delay before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.backoff.saturating_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 0);
        assert_eq!(policy, RetryPolicy::none());
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(4, Duration::from_millis(50));
        assert_eq!(policy.delay_for(0), Duration::from_millis(50));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert_eq!(policy.delay_for(64), Duration::from_secs(u32::MAX as u64));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(RetryPolicy::is_retryable(&UsbError::Pipe));
        assert!(RetryPolicy::is_retryable(&UsbError::Busy));
        assert!(RetryPolicy::is_retryable(&UsbError::Io));
        assert!(!RetryPolicy::is_retryable(&UsbError::NoDevice));
        assert!(!RetryPolicy::is_retryable(&UsbError::Timeout));
        assert!(!RetryPolicy::is_retryable(&UsbError::Access));
    }
}
