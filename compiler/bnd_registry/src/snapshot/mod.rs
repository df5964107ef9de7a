//! Registry snapshots.
//!
//! A compiled module publishes its binding facts as a snapshot so that
//! downstream modules can resolve against them without re-reading the
//! declarations.
//!
//! # Format
//!
//! ```text
//! ┌────────────┬──────────────────┬──────────────────────────────┐
//! │ "BNDREG"   │ version (u32 LE) │ bincode-encoded registry     │
//! └────────────┴──────────────────┴──────────────────────────────┘
//! ```

use std::path::Path;

use crate::{BindingRegistry, SnapshotError};

/// Leading bytes of every snapshot.
pub const MAGIC: &[u8; 6] = b"BNDREG";

/// Bumped whenever the encoded registry layout changes.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = MAGIC.len() + 4;

/// An encoded registry, header included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    data: Vec<u8>,
}

impl RegistrySnapshot {
    /// Encode a registry.
    pub fn from_registry(registry: &BindingRegistry) -> Result<Self, SnapshotError> {
        let body = bincode::serialize(registry)?;
        let mut data = Vec::with_capacity(HEADER_LEN + body.len());
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        data.extend_from_slice(&body);
        Ok(Self { data })
    }

    /// Decode the registry.
    pub fn to_registry(&self) -> Result<BindingRegistry, SnapshotError> {
        Ok(bincode::deserialize(&self.data[HEADER_LEN..])?)
    }

    /// Wrap raw bytes, validating the header.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, SnapshotError> {
        if data.get(..MAGIC.len()) != Some(&MAGIC[..]) {
            return Err(SnapshotError::BadMagic);
        }
        let Some(version) = data
            .get(MAGIC.len()..HEADER_LEN)
            .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        else {
            return Err(SnapshotError::BadMagic);
        };
        let found = u32::from_le_bytes(version);
        if found != FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found,
                expected: FORMAT_VERSION,
            });
        }
        Ok(Self { data })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read and validate a snapshot file.
    pub fn read(path: &Path) -> Result<Self, SnapshotError> {
        let data = std::fs::read(path).map_err(|source| SnapshotError::Io {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "read snapshot");
        Self::from_bytes(data)
    }

    pub fn write(&self, path: &Path) -> Result<(), SnapshotError> {
        std::fs::write(path, &self.data).map_err(|source| SnapshotError::Io {
            path: path.to_owned(),
            source,
        })
    }
}
