// SPDX-License-Identifier: PMPL-1.0-or-later
//! Journal configuration.
//!
//! The durability mode is fixed when a journal is opened and applies to
//! every push; there is no per-call override.

use serde::{Deserialize, Serialize};

/// Controls whether each push is forced to stable storage before it returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Call `fsync` after every push. Acknowledged entries survive a crash.
    Fsync,

    /// Never sync on push; rely on the OS page cache. An entry pushed just
    /// before a crash may be lost, and the final frame may be torn.
    #[default]
    Async,
}

impl SyncMode {
    /// Returns `true` if pushes are synced before returning.
    pub fn is_durable(self) -> bool {
        matches!(self, SyncMode::Fsync)
    }
}

impl From<bool> for SyncMode {
    fn from(durable: bool) -> Self {
        if durable {
            SyncMode::Fsync
        } else {
            SyncMode::Async
        }
    }
}

/// Options for [`crate::Journal::open_with_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Durability applied to every push.
    pub sync_mode: SyncMode,

    /// Byte offset at which the read cursor starts.
    ///
    /// The journal never records how far a consumer got. A caller that wants
    /// to resume after a restart stores [`crate::JournalReader::read_offset`]
    /// somewhere of its own and passes it back here. It must land on a frame
    /// boundary; anything else decodes garbage.
    pub read_from: u64,
}

impl JournalConfig {
    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    pub fn with_read_from(mut self, offset: u64) -> Self {
        self.read_from = offset;
        self
    }
}
