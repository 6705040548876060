//! Property tests for report descriptor fragmentation

use proptest::prelude::*;
use protocol::chunk_plan;

proptest! {
    #[test]
    fn chunks_cover_descriptor_in_order(total in 0u16..=4096, max in 1u8..=255) {
        let chunks: Vec<_> = chunk_plan(total, max).unwrap().collect();

        let mut expected_offset = 0u16;
        for chunk in &chunks {
            prop_assert_eq!(chunk.offset, expected_offset);
            prop_assert_eq!(chunk.len, (max as u16).min(total - chunk.offset));
            prop_assert!(chunk.len > 0);
            expected_offset += chunk.len;
        }

        let sum: u32 = chunks.iter().map(|c| c.len as u32).sum();
        prop_assert_eq!(sum, total as u32);
    }

    #[test]
    fn single_chunk_when_packet_covers_descriptor(total in 1u16..=255, extra in 0u8..=255) {
        let max = (total as u32 + extra as u32).min(255) as u8;
        let chunks: Vec<_> = chunk_plan(total, max).unwrap().collect();
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(chunks[0].offset, 0);
        prop_assert_eq!(chunks[0].len, total);
    }

    #[test]
    fn reported_length_matches_chunk_count(total in 0u16..=4096, max in 1u8..=255) {
        let plan = chunk_plan(total, max).unwrap();
        let reported = plan.len();
        prop_assert_eq!(reported, plan.count());
    }
}
