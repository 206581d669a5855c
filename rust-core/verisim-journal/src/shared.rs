// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Opt-in locking for callers that cannot guarantee a single producer and a
// single consumer. Each direction gets its own mutex, so pushes serialize
// against pushes and pops against pops while a push never waits on a pop.

use std::fs::File;
use std::path::Path;

use parking_lot::Mutex;

use crate::config::SyncMode;
use crate::error::JournalResult;
use crate::frame::Decoded;
use crate::journal::Journal;
use crate::reader::JournalReader;
use crate::storage::{FrameSink, FrameSource};
use crate::writer::JournalWriter;

/// A [`Journal`] whose methods take `&self`, safe to share behind an `Arc`.
#[derive(Debug)]
pub struct SharedJournal<W = File, R = File> {
    writer: Mutex<JournalWriter<W>>,
    reader: Mutex<JournalReader<R>>,
}

impl SharedJournal<File, File> {
    /// Open (or create) the journal file at `path`. See [`Journal::open`].
    pub fn open(path: impl AsRef<Path>, sync_mode: SyncMode) -> JournalResult<Self> {
        Journal::open(path, sync_mode).map(Self::new)
    }
}

impl<W: FrameSink, R: FrameSource> SharedJournal<W, R> {
    pub fn new(journal: Journal<W, R>) -> Self {
        let (writer, reader) = journal.split();
        Self {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
        }
    }

    /// Append one entry, waiting for any other push to finish first.
    pub fn push(&self, entry: &[u8]) -> JournalResult<()> {
        self.writer.lock().push(entry)
    }

    /// Take the next entry, waiting for any other pop to finish first.
    pub fn pop(&self) -> JournalResult<Option<Vec<u8>>> {
        self.reader.lock().pop()
    }

    pub fn pop_into(&self, buffer: Vec<u8>) -> JournalResult<Decoded> {
        self.reader.lock().pop_into(buffer)
    }

    pub fn sync(&self) -> JournalResult<()> {
        self.writer.lock().sync()
    }

    pub fn write_offset(&self) -> u64 {
        self.writer.lock().write_offset()
    }

    pub fn read_offset(&self) -> u64 {
        self.reader.lock().read_offset()
    }

    /// Remove the locks and get the plain journal back.
    pub fn into_inner(self) -> Journal<W, R> {
        Journal::from_cursors(self.writer.into_inner(), self.reader.into_inner())
    }

    /// Close the underlying journal. See [`Journal::close`].
    pub fn close(self) -> JournalResult<()> {
        self.into_inner().close()
    }
}

impl<W: FrameSink, R: FrameSource> From<Journal<W, R>> for SharedJournal<W, R> {
    fn from(journal: Journal<W, R>) -> Self {
        Self::new(journal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_concurrent_pushers_keep_per_thread_order() {
        let dir = TempDir::new().unwrap();
        let journal =
            Arc::new(SharedJournal::open(dir.path().join("shared"), SyncMode::Async).unwrap());

        let producers: Vec<_> = (0u8..4)
            .map(|id| {
                let journal = Arc::clone(&journal);
                thread::spawn(move || {
                    for seq in 0u32..250 {
                        let mut entry = vec![id];
                        entry.extend_from_slice(&seq.to_be_bytes());
                        journal.push(&entry).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let mut next_seq: HashMap<u8, u32> = HashMap::new();
        while let Some(entry) = journal.pop().unwrap() {
            assert_eq!(entry.len(), 5);
            let seq = u32::from_be_bytes(entry[1..5].try_into().unwrap());
            let expected = next_seq.entry(entry[0]).or_insert(0);
            assert_eq!(seq, *expected);
            *expected += 1;
        }

        assert_eq!(next_seq.len(), 4);
        assert!(next_seq.values().all(|&n| n == 250));
        assert_eq!(journal.read_offset(), journal.write_offset());

        let journal = Arc::try_unwrap(journal).unwrap();
        journal.close().unwrap();
    }

    #[test]
    fn test_into_inner_round_trip() {
        let source = Cursor::new(Vec::<u8>::new());
        let journal = Journal::from_parts(Vec::new(), source, SyncMode::Fsync);
        let shared = SharedJournal::from(journal);
        shared.push(b"kept").unwrap();
        assert_eq!(shared.write_offset(), 8);

        let journal = shared.into_inner();
        assert_eq!(journal.writer().get_ref(), &vec![0, 0, 0, 4, b'k', b'e', b'p', b't']);
    }
}
