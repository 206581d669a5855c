// SPDX-License-Identifier: PMPL-1.0-or-later
//
// VeriSimDB Journal crate
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A minimal write-ahead journal: an append-only file of length-prefixed
// entries with one write cursor and one independent read cursor. A producer
// pushes entries at the end while a consumer pops them from the front, in
// order. Popping never removes anything from the file.
//
// # On-disk format
//
// ```text
// [4 bytes: length (u32, big-endian)]
// [N bytes: entry]
// ... repeated, nothing else
// ```
//
// No header, footer, magic number or checksum. A trailing frame cut short
// by a crash is reported as a torn frame when the reader reaches it.
//
// # Usage
//
// ```no_run
// use verisim_journal::{Journal, SyncMode};
//
// let mut journal = Journal::open("/tmp/verisim.journal", SyncMode::Fsync).unwrap();
// journal.push(b"hello").unwrap();
//
// while let Some(entry) = journal.pop().unwrap() {
//     println!("{} bytes", entry.len());
// }
//
// // `None` only means "caught up": push more and pop again.
// journal.push(b"again").unwrap();
// assert_eq!(journal.pop().unwrap().as_deref(), Some(&b"again"[..]));
//
// journal.close().unwrap();
// ```
//
// # Concurrency
//
// One producer and one consumer may run at the same time; split the journal
// and move each half to its own thread. For anything more, wrap the journal
// in a `SharedJournal`.

pub mod config;
pub mod error;
pub mod frame;
pub mod journal;
pub mod reader;
pub mod shared;
pub mod storage;
pub mod writer;

// Re-export the primary public API for ergonomic imports.
pub use config::{JournalConfig, SyncMode};
pub use error::{IoPhase, JournalError, JournalResult};
pub use frame::{decode, encode, frame_len, Decoded, FRAME_HEADER_SIZE, MAX_ENTRY_LEN};
pub use journal::Journal;
pub use reader::{Entries, JournalReader};
pub use shared::SharedJournal;
pub use storage::{FrameSink, FrameSource};
pub use writer::JournalWriter;
