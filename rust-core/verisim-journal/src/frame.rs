// SPDX-License-Identifier: PMPL-1.0-or-later
//
// VeriSimDB Journal - Frame codec
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encodes and decodes length-prefixed frames over a byte stream. The codec
// holds no state of its own: everything lives in the stream and in the
// optional buffer a caller hands to `decode`.
//
// On-disk frame format:
//   [4 bytes: length (u32, big-endian)]
//   [N bytes: entry]
//
// There is no separator, checksum, header or footer. A journal is frames
// laid end to end.

use std::io::{self, Read};

use crate::error::{IoPhase, JournalError, JournalResult};
use crate::storage::FrameSink;

/// Size of the length prefix in front of every entry.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Largest entry a single frame can carry.
pub const MAX_ENTRY_LEN: usize = u32::MAX as usize;

/// Total on-disk size of a frame carrying an entry of `entry_len` bytes.
pub fn frame_len(entry_len: usize) -> u64 {
    FRAME_HEADER_SIZE as u64 + entry_len as u64
}

// ---------------------------------------------------------------------------
// Decoded
// ---------------------------------------------------------------------------

/// Outcome of a successful [`decode`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A complete entry, exactly as long as its length prefix declared.
    Entry(Vec<u8>),

    /// The stream had no further bytes at a frame boundary. Carries the
    /// caller's buffer back untouched. More frames may appear later.
    EndOfLog(Vec<u8>),
}

impl Decoded {
    /// The entry, or `None` at end of log.
    pub fn into_entry(self) -> Option<Vec<u8>> {
        match self {
            Decoded::Entry(entry) => Some(entry),
            Decoded::EndOfLog(_) => None,
        }
    }

    /// The underlying buffer, whichever way decoding went. Useful for
    /// feeding it into the next call.
    pub fn into_buffer(self) -> Vec<u8> {
        match self {
            Decoded::Entry(buffer) | Decoded::EndOfLog(buffer) => buffer,
        }
    }

    pub fn is_end_of_log(&self) -> bool {
        matches!(self, Decoded::EndOfLog(_))
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Append one frame carrying `entry` to `sink`.
///
/// Writes the big-endian length, then the entry bytes, then (if `durable`)
/// forces the sink to stable storage. The first failure aborts the call and
/// is returned with the phase that failed. A failure after the length was
/// written leaves a torn frame behind; the codec does not repair it.
pub fn encode<W>(sink: &mut W, entry: &[u8], durable: bool) -> JournalResult<()>
where
    W: FrameSink + ?Sized,
{
    let length = u32::try_from(entry.len()).map_err(|_| JournalError::EntryTooLarge {
        length: entry.len(),
    })?;

    sink.write_all(&length.to_be_bytes())
        .map_err(|e| JournalError::io(IoPhase::WriteLength, e))?;
    sink.write_all(entry)
        .map_err(|e| JournalError::io(IoPhase::WritePayload, e))?;

    if durable {
        sink.sync().map_err(|e| JournalError::io(IoPhase::Sync, e))?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Read the next frame from `source`.
///
/// `buffer` is an allocation hint only. If its capacity covers the next
/// entry it is resized in place and overwritten; otherwise a new buffer of
/// exactly the entry's length is allocated. At a clean end of stream the
/// buffer comes back unmodified inside [`Decoded::EndOfLog`].
///
/// A stream that ends inside a frame is a torn frame
/// ([`JournalError::TornLength`] / [`JournalError::TornPayload`]), never a
/// short entry and never end-of-log.
pub fn decode<R>(source: &mut R, buffer: Vec<u8>) -> JournalResult<Decoded>
where
    R: Read + ?Sized,
{
    let mut prefix = [0u8; FRAME_HEADER_SIZE];
    let read = read_full(source, &mut prefix)
        .map_err(|e| JournalError::io(IoPhase::ReadLength, e))?;

    match read {
        0 => return Ok(Decoded::EndOfLog(buffer)),
        FRAME_HEADER_SIZE => {}
        read => return Err(JournalError::TornLength { read }),
    }

    let length = u32::from_be_bytes(prefix);
    let mut entry = reuse_or_allocate(buffer, length as usize);

    let read = read_full(source, &mut entry)
        .map_err(|e| JournalError::io(IoPhase::ReadPayload, e))?;
    if read < entry.len() {
        return Err(JournalError::TornPayload {
            expected: length,
            read,
        });
    }

    Ok(Decoded::Entry(entry))
}

/// Size `buffer` to exactly `len` bytes, keeping its allocation when it is
/// large enough. Old contents are about to be overwritten, so they are not
/// carried into a new allocation.
fn reuse_or_allocate(mut buffer: Vec<u8>, len: usize) -> Vec<u8> {
    if buffer.capacity() >= len {
        buffer.clear();
        buffer.resize(len, 0);
        buffer
    } else {
        vec![0u8; len]
    }
}

/// Fill `buf` from `source`, looping over short reads.
///
/// Returns the number of bytes obtained, which is less than `buf.len()` only
/// if the stream ended first.
fn read_full<R>(source: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: Read + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
