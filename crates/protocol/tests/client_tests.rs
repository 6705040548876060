//! Integration tests for the AOA-HID protocol client
//!
//! Drives `HidClient` over a recording transport and checks the exact
//! request/value/index/data of every control transfer.

use protocol::{
    AOA_REQUEST_TYPE, AoaRequest, ControlSetup, ControlTransport, HidClient, MOUSE_CLICK_EVENT,
    MOUSE_REPORT_DESCRIPTOR, ProtocolError, RetryPolicy, UsbError,
};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Sent {
    setup: ControlSetup,
    data: Vec<u8>,
    timeout: Duration,
}

/// Records transfers; pops a scripted outcome per call (Ok when the script is empty)
#[derive(Default)]
struct RecordingTransport {
    sent: Vec<Sent>,
    script: VecDeque<Option<UsbError>>,
}

impl RecordingTransport {
    fn failing_at(call: usize, error: UsbError) -> Self {
        let mut script: VecDeque<Option<UsbError>> = (0..call).map(|_| None).collect();
        script.push_back(Some(error));
        Self {
            sent: Vec::new(),
            script,
        }
    }
}

impl ControlTransport for RecordingTransport {
    fn write_control(
        &mut self,
        setup: ControlSetup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, UsbError> {
        self.sent.push(Sent {
            setup,
            data: data.to_vec(),
            timeout,
        });
        match self.script.pop_front().flatten() {
            Some(err) => Err(err),
            None => Ok(data.len()),
        }
    }
}

mod register {
    use super::*;

    #[test]
    fn test_register_sends_descriptor_length_as_index() {
        let mut client = HidClient::new(RecordingTransport::default());
        client.register_hid(46).unwrap();

        let sent = &client.transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].setup.request_type, AOA_REQUEST_TYPE);
        assert_eq!(sent[0].setup.request, AoaRequest::RegisterHid);
        assert_eq!(sent[0].setup.value, 0);
        assert_eq!(sent[0].setup.index, 46);
        assert!(sent[0].data.is_empty());
        assert_eq!(sent[0].timeout, Duration::from_millis(1000));
    }

    #[test]
    fn test_unregister_has_no_index_or_data() {
        let mut client = HidClient::new(RecordingTransport::default());
        client.unregister_hid().unwrap();

        let sent = &client.transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].setup.request, AoaRequest::UnregisterHid);
        assert_eq!(sent[0].setup.value, 0);
        assert_eq!(sent[0].setup.index, 0);
        assert!(sent[0].data.is_empty());
    }

    #[test]
    fn test_register_failure_reports_native_error() {
        let transport = RecordingTransport::failing_at(0, UsbError::NoDevice);
        let mut client = HidClient::new(transport);

        let err = client.register_hid(46).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Transfer {
                request: AoaRequest::RegisterHid,
                index: 46,
                error: UsbError::NoDevice,
            }
        );
    }

    #[test]
    fn test_custom_timeout_is_used() {
        let mut client =
            HidClient::new(RecordingTransport::default()).with_timeout(Duration::from_millis(250));
        client.register_hid(4).unwrap();
        assert_eq!(client.transport().sent[0].timeout, Duration::from_millis(250));
    }
}

mod descriptor_upload {
    use super::*;

    #[test]
    fn test_mouse_descriptor_in_8_byte_packets() {
        let mut client = HidClient::new(RecordingTransport::default());
        client
            .send_hid_descriptor(&MOUSE_REPORT_DESCRIPTOR, 8)
            .unwrap();

        let sent = &client.transport().sent;
        let offsets: Vec<u16> = sent.iter().map(|s| s.setup.index).collect();
        let lengths: Vec<usize> = sent.iter().map(|s| s.data.len()).collect();
        assert_eq!(offsets, vec![0, 8, 16, 24, 32, 40]);
        assert_eq!(lengths, vec![8, 8, 8, 8, 8, 6]);

        for s in sent {
            assert_eq!(s.setup.request, AoaRequest::SetHidReportDesc);
            assert_eq!(s.setup.value, 0);
        }

        let reassembled: Vec<u8> = sent.iter().flat_map(|s| s.data.clone()).collect();
        assert_eq!(reassembled, MOUSE_REPORT_DESCRIPTOR);
    }

    #[test]
    fn test_single_chunk_when_packet_size_covers_descriptor() {
        let mut client = HidClient::new(RecordingTransport::default());
        client
            .send_hid_descriptor(&MOUSE_REPORT_DESCRIPTOR, 64)
            .unwrap();

        let sent = &client.transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].setup.index, 0);
        assert_eq!(sent[0].data, MOUSE_REPORT_DESCRIPTOR);
    }

    #[test]
    fn test_failure_stops_upload_at_failing_chunk() {
        let transport = RecordingTransport::failing_at(2, UsbError::Pipe);
        let mut client = HidClient::new(transport);

        let err = client
            .send_hid_descriptor(&MOUSE_REPORT_DESCRIPTOR, 8)
            .unwrap_err();

        assert_eq!(
            err,
            ProtocolError::Transfer {
                request: AoaRequest::SetHidReportDesc,
                index: 16,
                error: UsbError::Pipe,
            }
        );
        // chunks 0, 1 and the failing chunk 2; nothing after
        assert_eq!(client.transport().sent.len(), 3);
    }

    #[test]
    fn test_zero_chunk_size_sends_nothing() {
        let mut client = HidClient::new(RecordingTransport::default());
        let err = client
            .send_hid_descriptor(&MOUSE_REPORT_DESCRIPTOR, 0)
            .unwrap_err();
        assert_eq!(err, ProtocolError::ZeroChunkSize);
        assert!(client.transport().sent.is_empty());
    }

    #[test]
    fn test_oversized_descriptor_rejected() {
        let mut client = HidClient::new(RecordingTransport::default());
        let huge = vec![0u8; u16::MAX as usize + 1];
        let err = client.send_hid_descriptor(&huge, 64).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::DescriptorTooLarge {
                len: u16::MAX as usize + 1
            }
        );
        assert!(client.transport().sent.is_empty());
    }
}

mod events {
    use super::*;

    #[test]
    fn test_event_sent_whole_with_zero_value_and_index() {
        let mut client = HidClient::new(RecordingTransport::default());
        client.send_hid_event(&MOUSE_CLICK_EVENT).unwrap();

        let sent = &client.transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].setup.request, AoaRequest::SendHidEvent);
        assert_eq!(sent[0].setup.value, 0);
        assert_eq!(sent[0].setup.index, 0);
        assert_eq!(sent[0].data, MOUSE_CLICK_EVENT);
    }

    #[test]
    fn test_event_not_fragmented_by_packet_size() {
        let mut client = HidClient::new(RecordingTransport::default());
        let event = [0u8; 100];
        client.send_hid_event(&event).unwrap();
        assert_eq!(client.transport().sent.len(), 1);
        assert_eq!(client.transport().sent[0].data.len(), 100);
    }

    #[test]
    fn test_no_retry_by_default() {
        let transport = RecordingTransport::failing_at(0, UsbError::Pipe);
        let mut client = HidClient::new(transport);

        let err = client
            .send_hid_event_with_retry(&MOUSE_CLICK_EVENT, &RetryPolicy::none())
            .unwrap_err();
        assert_eq!(err.usb_error(), Some(&UsbError::Pipe));
        assert_eq!(client.transport().sent.len(), 1);
    }

    #[test]
    fn test_retry_recovers_from_not_ready() {
        let transport = RecordingTransport::failing_at(0, UsbError::Pipe);
        let mut client = HidClient::new(transport);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        client
            .send_hid_event_with_retry(&MOUSE_CLICK_EVENT, &policy)
            .unwrap();
        assert_eq!(client.transport().sent.len(), 2);
    }

    #[test]
    fn test_retry_gives_up_after_budget() {
        let mut transport = RecordingTransport::default();
        for _ in 0..10 {
            transport.script.push_back(Some(UsbError::Busy));
        }
        let mut client = HidClient::new(transport);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));

        let err = client
            .send_hid_event_with_retry(&MOUSE_CLICK_EVENT, &policy)
            .unwrap_err();
        assert_eq!(err.usb_error(), Some(&UsbError::Busy));
        assert_eq!(client.transport().sent.len(), 3);
    }

    #[test]
    fn test_fatal_error_not_retried() {
        let transport = RecordingTransport::failing_at(0, UsbError::NoDevice);
        let mut client = HidClient::new(transport);
        let policy = RetryPolicy::new(5, Duration::from_millis(1));

        let err = client
            .send_hid_event_with_retry(&MOUSE_CLICK_EVENT, &policy)
            .unwrap_err();
        assert_eq!(err.usb_error(), Some(&UsbError::NoDevice));
        assert_eq!(client.transport().sent.len(), 1);
    }
}
