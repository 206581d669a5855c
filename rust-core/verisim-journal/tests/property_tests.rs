// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for journal framing

use std::io::Cursor;

use proptest::prelude::*;
use tempfile::TempDir;
use verisim_journal::{decode, encode, frame_len, Decoded, Journal, JournalError, SyncMode};

/// Generate arbitrary entries, biased towards the empty entry and uniform
/// byte runs.
fn arb_entry() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(Vec::new()),
        (0usize..128, any::<u8>()).prop_map(|(len, byte)| vec![byte; len]),
        prop::collection::vec(any::<u8>(), 0..512),
    ]
}

proptest! {
    #[test]
    fn test_round_trip_preserves_order_and_bytes(
        entries in prop::collection::vec(arb_entry(), 0..32),
        durable in any::<bool>()
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prop.journal");
        let mut journal = Journal::open(path, SyncMode::from(durable)).unwrap();

        for entry in &entries {
            journal.push(entry).unwrap();
        }
        for entry in &entries {
            let popped = journal.pop().unwrap();
            prop_assert_eq!(popped.as_ref(), Some(entry));
        }
        prop_assert_eq!(journal.pop().unwrap(), None);

        let expected: u64 = entries.iter().map(|e| frame_len(e.len())).sum();
        prop_assert_eq!(journal.writer().write_offset(), expected);
        prop_assert_eq!(journal.reader().read_offset(), expected);
        journal.close().unwrap();
    }

    #[test]
    fn test_decode_into_any_buffer_returns_exact_entry(
        entry in arb_entry(),
        stale in prop::collection::vec(any::<u8>(), 0..1024)
    ) {
        let mut stream = Vec::new();
        encode(&mut stream, &entry, false).unwrap();

        let decoded = decode(&mut Cursor::new(&stream), stale).unwrap();
        prop_assert_eq!(decoded, Decoded::Entry(entry));
    }

    #[test]
    fn test_every_strict_prefix_is_torn_or_end(
        entry in prop::collection::vec(any::<u8>(), 1..256),
        cut_seed in any::<prop::sample::Index>()
    ) {
        let mut stream = Vec::new();
        encode(&mut stream, &entry, false).unwrap();
        let cut = cut_seed.index(stream.len());

        match decode(&mut &stream[..cut], Vec::new()) {
            Ok(Decoded::EndOfLog(_)) => {
                prop_assert_eq!(cut, 0);
            }
            Err(JournalError::TornLength { read }) => {
                prop_assert_eq!(read, cut);
            }
            Err(JournalError::TornPayload { expected, read }) => {
                prop_assert_eq!(expected as usize, entry.len());
                prop_assert_eq!(read, cut - 4);
            }
            other => {
                prop_assert!(false, "unexpected outcome {:?}", other);
            }
        }
    }
}
