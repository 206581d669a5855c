// SPDX-License-Identifier: PMPL-1.0-or-later
//
// VeriSimDB Journal - Error types
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Every failure is returned to the caller. I/O failures carry the phase in
// which they happened; torn frames are reported separately from I/O so a
// caller can tell "the storage broke" apart from "the log ends mid-frame".
// Reaching the end of the log is not an error and has no variant here.

use std::fmt;
use std::io;

use thiserror::Error;

/// The step of a journal operation during which an I/O error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoPhase {
    /// Opening (or creating) the append handle.
    OpenWriter,
    /// Opening the independent read handle.
    OpenReader,
    /// Positioning the read handle at a configured start offset.
    Seek,
    /// Writing the 4-byte length prefix of a frame.
    WriteLength,
    /// Writing the payload bytes of a frame.
    WritePayload,
    /// Forcing appended bytes to stable storage.
    Sync,
    /// Reading the 4-byte length prefix of a frame.
    ReadLength,
    /// Reading the payload bytes of a frame.
    ReadPayload,
    /// Releasing the append handle.
    CloseWriter,
    /// Releasing the read handle.
    CloseReader,
}

impl fmt::Display for IoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            IoPhase::OpenWriter => "opening writer",
            IoPhase::OpenReader => "opening reader",
            IoPhase::Seek => "seeking reader",
            IoPhase::WriteLength => "writing length",
            IoPhase::WritePayload => "writing entry",
            IoPhase::Sync => "syncing writer",
            IoPhase::ReadLength => "reading length",
            IoPhase::ReadPayload => "reading entry",
            IoPhase::CloseWriter => "closing writer",
            IoPhase::CloseReader => "closing reader",
        };
        f.write_str(phase)
    }
}

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The underlying storage failed to open, read, write, sync or close.
    #[error("journal I/O error while {phase}: {source}")]
    Io {
        /// Which step failed.
        phase: IoPhase,
        /// The error reported by the storage layer, unmodified.
        #[source]
        source: io::Error,
    },

    /// The stream ended inside a length prefix.
    #[error("torn frame: stream ended after {read} of 4 length bytes")]
    TornLength {
        /// Number of prefix bytes that were available.
        read: usize,
    },

    /// The stream ended before the payload announced by the length prefix
    /// was complete.
    #[error("torn frame: stream ended after {read} of {expected} entry bytes")]
    TornPayload {
        /// Payload length declared by the prefix.
        expected: u32,
        /// Payload bytes that were available.
        read: usize,
    },

    /// The entry cannot be described by a 4-byte length field.
    #[error(
        "entry of {length} bytes exceeds the maximum frame payload of {max} bytes",
        max = u32::MAX
    )]
    EntryTooLarge {
        /// Length of the rejected entry.
        length: usize,
    },

    /// A configured read offset lies past the end of the journal file.
    #[error("read offset {offset} is past the end of the journal ({len} bytes)")]
    InvalidReadOffset {
        /// The requested start offset.
        offset: u64,
        /// The journal length at open.
        len: u64,
    },
}

impl JournalError {
    pub(crate) fn io(phase: IoPhase, source: io::Error) -> Self {
        JournalError::Io { phase, source }
    }

    /// Returns `true` for the decode failures caused by an incomplete
    /// trailing frame.
    pub fn is_torn_frame(&self) -> bool {
        matches!(
            self,
            JournalError::TornLength { .. } | JournalError::TornPayload { .. }
        )
    }

    /// The phase of an I/O failure, if this is one.
    pub fn phase(&self) -> Option<IoPhase> {
        match self {
            JournalError::Io { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Convenience type alias for journal results.
pub type JournalResult<T> = Result<T, JournalError>;
