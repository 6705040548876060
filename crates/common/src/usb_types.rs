//! USB device identity and hex id parsing

use crate::{Error, Result};
use std::fmt;

/// Vendor/product id pair used to locate a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl DeviceIdentity {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }

    /// Parse a pair of hex strings such as `"18d1"` and `"0x2d00"`
    pub fn parse(vid: &str, pid: &str) -> Result<Self> {
        Ok(Self::new(parse_hex_id("vid", vid)?, parse_hex_id("pid", pid)?))
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// Parse the 16-bit USB id `name` from hex, with or without a `0x` prefix
///
/// Leading zeros are accepted; values above 0xffff are not.
pub fn parse_hex_id(name: &'static str, s: &str) -> Result<u16> {
    let invalid = || Error::InvalidId {
        name,
        value: s.to_string(),
    };
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    // from_str_radix alone would accept a leading '+'
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    u16::from_str_radix(hex, 16).map_err(|_| invalid())
}
