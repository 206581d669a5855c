// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage traits for the journal.
//
// The frame codec only needs a byte sink it can append to and force to
// stable storage, and a byte source it can read sequentially. Files are the
// production implementation; in-memory buffers implement the same traits so
// the codec and the journal can be exercised without touching disk.
//
// Sources are seekable so a reader that met an incomplete frame can return
// to the frame boundary and decode it again once the writer finishes it.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};

/// An append target for frames.
///
/// Appends must land at the end of the stream and become visible, in order,
/// to an independent [`FrameSource`] over the same storage.
pub trait FrameSink: Write {
    /// Force all written bytes to stable storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Release the handle, reporting any error the storage surfaces on close.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// A sequential read source for frames.
///
/// Reads advance the position; seeking is only used to move back to the
/// start of a frame that could not be decoded completely.
pub trait FrameSource: Read + Seek {
    /// Release the handle, reporting any error the storage surfaces on close.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl FrameSink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    // `File` has no fallible close in std; dropping releases the descriptor.
}

impl FrameSource for File {}

impl FrameSink for Vec<u8> {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: AsRef<[u8]>> FrameSource for Cursor<T> {}
