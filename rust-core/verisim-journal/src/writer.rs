// SPDX-License-Identifier: PMPL-1.0-or-later
//
// VeriSimDB Journal - Write cursor
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `JournalWriter` owns the append handle of a journal. It frames each
// pushed entry through the codec and applies the durability mode chosen at
// open time to every push.

use std::fs::File;

use tracing::{debug, trace};

use crate::config::SyncMode;
use crate::error::{IoPhase, JournalError, JournalResult};
use crate::frame::{encode, frame_len};
use crate::storage::FrameSink;

/// The append-only side of a journal.
///
/// Pushes are applied in call order. `push` takes `&mut self`, so two pushes
/// can never race on the same writer; share it across threads only through
/// [`crate::SharedJournal`] or a lock of your own.
#[derive(Debug)]
pub struct JournalWriter<W = File> {
    /// Append handle on the journal storage.
    sink: W,

    /// Durability applied to every push.
    sync_mode: SyncMode,

    /// Storage length at open plus every frame pushed since.
    write_offset: u64,
}

impl<W: FrameSink> JournalWriter<W> {
    /// Wrap an append handle whose storage is currently empty.
    pub fn new(sink: W, sync_mode: SyncMode) -> Self {
        Self::with_offset(sink, sync_mode, 0)
    }

    /// Wrap an append handle whose storage already holds `offset` bytes.
    pub fn with_offset(sink: W, sync_mode: SyncMode, offset: u64) -> Self {
        Self {
            sink,
            sync_mode,
            write_offset: offset,
        }
    }

    /// Append one entry as a frame.
    ///
    /// With [`SyncMode::Fsync`] the frame is on stable storage when this
    /// returns. On error nothing is retried. A failed write leaves the offset
    /// where it was and the storage may now end in a torn frame. A failed
    /// sync still counts the frame, since every byte of it was written; only
    /// its durability is unknown.
    pub fn push(&mut self, entry: &[u8]) -> JournalResult<()> {
        match encode(&mut self.sink, entry, self.sync_mode.is_durable()) {
            Ok(()) => {}
            Err(err) if err.phase() == Some(IoPhase::Sync) => {
                self.write_offset += frame_len(entry.len());
                return Err(err);
            }
            Err(err) => return Err(err),
        }
        self.write_offset += frame_len(entry.len());
        trace!(len = entry.len(), write_offset = self.write_offset, "Pushed journal entry");
        Ok(())
    }

    /// Force everything pushed so far to stable storage, regardless of the
    /// configured sync mode.
    pub fn sync(&mut self) -> JournalResult<()> {
        self.sink
            .sync()
            .map_err(|e| JournalError::io(IoPhase::Sync, e))
    }

    /// Sync, then release the handle.
    ///
    /// The handle is released even if the sync fails; the first error wins.
    pub fn close(mut self) -> JournalResult<()> {
        let synced = self.sync();
        let closed = self
            .sink
            .close()
            .map_err(|e| JournalError::io(IoPhase::CloseWriter, e));
        debug!(write_offset = self.write_offset, "Closed journal writer");
        synced.and(closed)
    }

    /// Bytes in the journal as seen by this writer.
    pub fn write_offset(&self) -> u64 {
        self.write_offset
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// The underlying append handle.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }
}
