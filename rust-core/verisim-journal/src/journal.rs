// SPDX-License-Identifier: PMPL-1.0-or-later
//
// VeriSimDB Journal - Log handle
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A `Journal` pairs one write cursor and one read cursor over the same
// storage. The two cursors share nothing but the storage itself: appends
// grow it monotonically and the reader sees them without any signalling.
//
// Concurrency contract: one producer and one consumer may run at the same
// time. `split` hands the cursors to separate owners for exactly that.
// Same-direction calls are ruled out by `&mut self`; no locks are taken.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, info};

use crate::config::{JournalConfig, SyncMode};
use crate::error::{IoPhase, JournalError, JournalResult};
use crate::frame::Decoded;
use crate::reader::JournalReader;
use crate::storage::{FrameSink, FrameSource};
use crate::writer::JournalWriter;

/// An append-only journal with independent write and read cursors.
///
/// The journal never deletes or truncates its storage. Popping an entry
/// moves the read cursor; the bytes stay where they are.
#[derive(Debug)]
pub struct Journal<W = File, R = File> {
    writer: JournalWriter<W>,
    reader: JournalReader<R>,
}

impl Journal<File, File> {
    /// Open the journal file at `path`, creating it if it does not exist.
    ///
    /// New entries are appended after any existing content. The read cursor
    /// always starts at the beginning of the file; consumer progress from a
    /// previous process is not restored.
    pub fn open(path: impl AsRef<Path>, sync_mode: SyncMode) -> JournalResult<Self> {
        Self::open_with_config(path, &JournalConfig::default().with_sync_mode(sync_mode))
    }

    /// Open the journal file at `path` with explicit configuration.
    ///
    /// The parent directory must already exist.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: &JournalConfig,
    ) -> JournalResult<Self> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let sink = options
            .open(path)
            .map_err(|e| JournalError::io(IoPhase::OpenWriter, e))?;
        let len = sink
            .metadata()
            .map_err(|e| JournalError::io(IoPhase::OpenWriter, e))?
            .len();

        let mut source = File::open(path).map_err(|e| JournalError::io(IoPhase::OpenReader, e))?;

        if config.read_from > len {
            return Err(JournalError::InvalidReadOffset {
                offset: config.read_from,
                len,
            });
        }
        if config.read_from > 0 {
            source
                .seek(SeekFrom::Start(config.read_from))
                .map_err(|e| JournalError::io(IoPhase::Seek, e))?;
        }

        info!(
            path = %path.display(),
            sync_mode = ?config.sync_mode,
            write_offset = len,
            read_offset = config.read_from,
            "Opened journal"
        );

        Ok(Self {
            writer: JournalWriter::with_offset(sink, config.sync_mode, len),
            reader: JournalReader::with_offset(source, config.read_from),
        })
    }
}

impl<W: FrameSink, R: FrameSource> Journal<W, R> {
    /// Build a journal over an append handle and a read handle that refer to
    /// the same storage. Both are assumed to start at offset zero.
    pub fn from_parts(sink: W, source: R, sync_mode: SyncMode) -> Self {
        Self::from_cursors(JournalWriter::new(sink, sync_mode), JournalReader::new(source))
    }

    /// Reassemble a journal from cursors previously taken apart by
    /// [`Journal::split`].
    pub fn from_cursors(writer: JournalWriter<W>, reader: JournalReader<R>) -> Self {
        Self { writer, reader }
    }

    /// Append one entry. See [`JournalWriter::push`].
    pub fn push(&mut self, entry: &[u8]) -> JournalResult<()> {
        self.writer.push(entry)
    }

    /// Take the next entry, or `None` if none is currently available.
    /// See [`JournalReader::pop`].
    pub fn pop(&mut self) -> JournalResult<Option<Vec<u8>>> {
        self.reader.pop()
    }

    /// Take the next entry into a reusable buffer.
    /// See [`JournalReader::pop_into`].
    pub fn pop_into(&mut self, buffer: Vec<u8>) -> JournalResult<Decoded> {
        self.reader.pop_into(buffer)
    }

    /// Force everything pushed so far to stable storage.
    pub fn sync(&mut self) -> JournalResult<()> {
        self.writer.sync()
    }

    /// Sync the writer, close the writer, close the reader.
    ///
    /// Every step is attempted even if an earlier one failed. The first
    /// error encountered is returned.
    pub fn close(self) -> JournalResult<()> {
        let Self { writer, reader } = self;
        let writer_closed = writer.close();
        let reader_closed = reader.close();
        writer_closed.and(reader_closed)
    }

    /// Separate the write and read cursors so a producer and a consumer can
    /// own one each, typically on different threads.
    pub fn split(self) -> (JournalWriter<W>, JournalReader<R>) {
        debug!(
            write_offset = self.writer.write_offset(),
            read_offset = self.reader.read_offset(),
            "Split journal into writer and reader"
        );
        (self.writer, self.reader)
    }

    pub fn writer(&self) -> &JournalWriter<W> {
        &self.writer
    }

    pub fn reader(&self) -> &JournalReader<R> {
        &self.reader
    }
}
