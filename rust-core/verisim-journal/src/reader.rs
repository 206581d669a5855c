// SPDX-License-Identifier: PMPL-1.0-or-later
//
// VeriSimDB Journal - Read cursor
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `JournalReader` consumes frames sequentially from its own handle on
// the journal storage. Consuming an entry never modifies the storage; it
// only moves this cursor forward.
//
// `read_offset` only ever advances by whole frames. When a decode fails part
// way through a frame (the writer is still appending it, or a crash tore it)
// the handle is moved back to `read_offset` before the next decode, so the
// same frame is tried again rather than skipped.

use std::fs::File;
use std::io::{Seek, SeekFrom};

use tracing::{debug, trace};

use crate::error::{IoPhase, JournalError, JournalResult};
use crate::frame::{decode, frame_len, Decoded};
use crate::storage::FrameSource;

// ---------------------------------------------------------------------------
// JournalReader
// ---------------------------------------------------------------------------

/// The sequential-scan side of a journal.
///
/// Entries come back in exactly the order they were pushed. Running out of
/// entries is not terminal: once the writer pushes more, `pop` returns them.
#[derive(Debug)]
pub struct JournalReader<R = File> {
    /// Independent read handle on the journal storage.
    source: R,

    /// Bytes consumed through complete frames.
    read_offset: u64,

    /// Set after a failed decode: the handle may sit inside a frame.
    rewind_pending: bool,
}

impl<R: FrameSource> JournalReader<R> {
    /// Wrap a read handle positioned at the start of the journal.
    pub fn new(source: R) -> Self {
        Self::with_offset(source, 0)
    }

    /// Wrap a read handle already positioned `offset` bytes into the
    /// journal, on a frame boundary.
    pub fn with_offset(source: R, offset: u64) -> Self {
        Self {
            source,
            read_offset: offset,
            rewind_pending: false,
        }
    }

    /// Take the next entry, or `None` if the reader has caught up with
    /// everything currently visible.
    pub fn pop(&mut self) -> JournalResult<Option<Vec<u8>>> {
        Ok(self.pop_into(Vec::new())?.into_entry())
    }

    /// Take the next entry, decoding into `buffer` when it is large enough.
    ///
    /// At end of log the buffer is handed back unchanged so the caller can
    /// retry with it later.
    ///
    /// A torn frame is returned as an error and the cursor stays in front of
    /// it. Popping again returns the same error until the frame is complete,
    /// then returns the entry.
    pub fn pop_into(&mut self, buffer: Vec<u8>) -> JournalResult<Decoded> {
        if self.rewind_pending {
            self.rewind()?;
        }

        let decoded = match decode(&mut self.source, buffer) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.rewind_pending = true;
                return Err(err);
            }
        };
        if let Decoded::Entry(entry) = &decoded {
            self.read_offset += frame_len(entry.len());
            trace!(len = entry.len(), read_offset = self.read_offset, "Popped journal entry");
        }
        Ok(decoded)
    }

    /// Move the handle back to the last frame boundary.
    fn rewind(&mut self) -> JournalResult<()> {
        self.source
            .seek(SeekFrom::Start(self.read_offset))
            .map_err(|e| JournalError::io(IoPhase::Seek, e))?;
        self.rewind_pending = false;
        trace!(read_offset = self.read_offset, "Rewound journal reader to frame boundary");
        Ok(())
    }

    /// Iterate over the entries currently available.
    ///
    /// The iterator ends at end of log or after yielding the first error.
    /// Calling `entries` again later picks up whatever was pushed since.
    pub fn entries(&mut self) -> Entries<'_, R> {
        Entries {
            reader: self,
            done: false,
        }
    }

    /// Release the handle.
    pub fn close(self) -> JournalResult<()> {
        let read_offset = self.read_offset;
        self.source
            .close()
            .map_err(|e| JournalError::io(IoPhase::CloseReader, e))?;
        debug!(read_offset, "Closed journal reader");
        Ok(())
    }

    /// Byte offset of the next frame this reader will decode.
    ///
    /// Persist this value to resume after a restart with
    /// [`crate::JournalConfig::read_from`].
    pub fn read_offset(&self) -> u64 {
        self.read_offset
    }

    /// The underlying read handle.
    pub fn get_ref(&self) -> &R {
        &self.source
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Iterator over the entries a [`JournalReader`] can currently see.
pub struct Entries<'a, R> {
    reader: &'a mut JournalReader<R>,
    done: bool,
}

impl<R: FrameSource> Iterator for Entries<'_, R> {
    type Item = JournalResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.pop() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: FrameSource> std::iter::FusedIterator for Entries<'_, R> {}
