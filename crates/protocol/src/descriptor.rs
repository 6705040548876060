//! Built-in HID mouse report descriptor and input report

/// Report descriptor recorded from a wired mouse.
///
/// One report: an 8-bit button mask followed by three signed 8-bit axes
/// (X, Y, wheel).
pub const MOUSE_REPORT_DESCRIPTOR: [u8; 46] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x05, 0x09, //     Usage Page (Button)
    0x19, 0x01, //     Usage Minimum (1)
    0x29, 0x03, //     Usage Maximum (3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x08, //     Report Count (8)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x03, //     Report Count (3)
    0x31, 0x06, //     Reserved main item, kept as recorded
    0xC0, //   End Collection
    0xC0, // End Collection
];

/// Input report recorded from the same mouse
///
/// Layout matches [`MOUSE_REPORT_DESCRIPTOR`]; nothing checks this at runtime.
pub const MOUSE_CLICK_EVENT: [u8; 4] = [0x00, 0x02, 0xf8, 0x00];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_length() {
        assert_eq!(MOUSE_REPORT_DESCRIPTOR.len(), 46);
    }

    #[test]
    fn test_descriptor_collections_balanced() {
        let opens = MOUSE_REPORT_DESCRIPTOR
            .iter()
            .filter(|&&b| b == 0xA1)
            .count();
        let closes = MOUSE_REPORT_DESCRIPTOR
            .iter()
            .filter(|&&b| b == 0xC0)
            .count();
        assert_eq!(opens, 2);
        assert_eq!(opens, closes);
    }

    #[test]
    fn test_event_length() {
        assert_eq!(MOUSE_CLICK_EVENT.len(), 4);
    }
}
