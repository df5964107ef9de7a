//! Registry, snapshot, and declaration errors.

use std::fmt;
use std::path::PathBuf;

use crate::AttributeName;

/// The registry table a fact belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Adapter,
    MultiAdapter,
    InverseAdapter,
    InverseMethod,
    Conversion,
    Untaggable,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Table::Adapter => "binding adapter",
            Table::MultiAdapter => "multi-attribute adapter",
            Table::InverseAdapter => "inverse binding adapter",
            Table::InverseMethod => "inverse binding method",
            Table::Conversion => "conversion",
            Table::Untaggable => "untaggable type",
        })
    }
}

/// A registration was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The exact key already maps to a different fact.
    #[error("{table} already registered for {key}: `{existing}` conflicts with `{rejected}`")]
    DuplicateRegistration {
        table: Table,
        key: String,
        existing: String,
        rejected: String,
    },

    #[error(
        "multi-attribute adapter on `{view_type}` names {attributes} attributes \
         but {parameters} parameter types"
    )]
    ArityMismatch {
        view_type: String,
        attributes: usize,
        parameters: usize,
    },

    #[error("multi-attribute adapter on `{view_type}` names attribute `{attribute}` twice")]
    RepeatedAttribute {
        view_type: String,
        attribute: AttributeName,
    },
}

/// A snapshot could not be read, written, or decoded.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to access registry snapshot `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode registry snapshot: {0}")]
    Codec(#[from] bincode::Error),

    #[error("not a registry snapshot (bad header)")]
    BadMagic,

    #[error("registry snapshot format {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// A declaration file could not be loaded into the registry.
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("malformed declarations: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
