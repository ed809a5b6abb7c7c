// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry file access under advisory locks.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chat_core::RegistryEntry;
use fs2::FileExt;
use thiserror::Error;
use tracing::warn;

/// The canonical map of live agents, keyed by name.
pub type Registry = BTreeMap<String, RegistryEntry>;

/// Registry access errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle to the registry file.
///
/// Every operation brackets a whole-file advisory lock around a complete
/// read or a complete read-modify-write; no partial updates.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Store backed by an explicit file path (tests).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the well-known registry file in the chat directory.
    pub fn open_default() -> Self {
        Self::new(crate::paths::registry_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole registry under a shared lock.
    ///
    /// A missing, empty, or unreadable file is an empty registry; failures
    /// are logged, never propagated.
    pub fn read(&self) -> Registry {
        match self.try_read() {
            Ok(registry) => registry,
            Err(e) => {
                warn!("failed to read registry {}: {}", self.path.display(), e);
                Registry::new()
            }
        }
    }

    fn try_read(&self) -> Result<Registry, RegistryError> {
        if !self.path.exists() {
            return Ok(Registry::new());
        }

        let mut file = OpenOptions::new().read(true).open(&self.path)?;
        file.lock_shared()?;
        let mut text = String::new();
        let result = file.read_to_string(&mut text);
        FileExt::unlock(&file)?;
        result?;

        if text.trim().is_empty() {
            return Ok(Registry::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Replace the whole registry under an exclusive lock.
    pub fn write(&self, registry: &Registry) -> Result<(), RegistryError> {
        // Open without truncating so the lock is held before any bytes change.
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let result = write_locked(&mut file, registry);
        FileExt::unlock(&file)?;
        result
    }

    /// Read-modify-write the registry inside a single exclusive lock.
    ///
    /// The closure mutates a local copy; the serialized result replaces the
    /// file before the lock is released. An unparseable file is treated as
    /// empty, consistent with [`RegistryStore::read`].
    pub fn update<F>(&self, f: F) -> Result<Registry, RegistryError>
    where
        F: FnOnce(&mut Registry),
    {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let result = update_locked(&mut file, &self.path, f);
        FileExt::unlock(&file)?;
        result
    }
}

fn write_locked(file: &mut std::fs::File, registry: &Registry) -> Result<(), RegistryError> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    serde_json::to_writer_pretty(&mut *file, registry)?;
    file.flush()?;
    Ok(())
}

fn update_locked<F>(
    file: &mut std::fs::File,
    path: &Path,
    f: F,
) -> Result<Registry, RegistryError>
where
    F: FnOnce(&mut Registry),
{
    let mut text = String::new();
    file.read_to_string(&mut text)?;

    let mut registry: Registry = if text.trim().is_empty() {
        Registry::new()
    } else {
        match serde_json::from_str(&text) {
            Ok(registry) => registry,
            Err(e) => {
                warn!("replacing unparseable registry {}: {}", path.display(), e);
                Registry::new()
            }
        }
    };

    f(&mut registry);
    write_locked(file, &registry)?;
    Ok(registry)
}

/// Bound on one liveness probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Probe whether the endpoint at `path` is accepting connections.
///
/// Used during join to distinguish a live name collision from a stale entry
/// left behind by a crash. Bounded by [`PROBE_TIMEOUT`] so a wedged peer
/// cannot stall the joining daemon.
pub async fn probe(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    matches!(
        tokio::time::timeout(PROBE_TIMEOUT, tokio::net::UnixStream::connect(path)).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
