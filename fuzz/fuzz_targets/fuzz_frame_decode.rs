// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for journal frame decoding

#![no_main]

use libfuzzer_sys::fuzz_target;
use verisim_journal::{decode, Decoded, FRAME_HEADER_SIZE};

fuzz_target!(|data: &[u8]| {
    let mut source = data;
    let mut buffer = Vec::new();

    loop {
        // Skip frames that declare more payload than the input holds; they
        // would only measure the allocator.
        if source.len() >= FRAME_HEADER_SIZE {
            let declared = u32::from_be_bytes([source[0], source[1], source[2], source[3]]);
            if declared as usize > source.len() {
                return;
            }
        }

        let before = source.len();
        match decode(&mut source, buffer) {
            Ok(Decoded::Entry(entry)) => {
                // A decoded frame consumes exactly its prefix and payload.
                assert_eq!(before - source.len(), FRAME_HEADER_SIZE + entry.len());
                buffer = entry;
            }
            Ok(Decoded::EndOfLog(_)) => {
                assert!(source.is_empty());
                return;
            }
            Err(err) => {
                // The only way a byte slice can fail is a torn trailing frame.
                assert!(err.is_torn_frame());
                return;
            }
        }
    }
});
