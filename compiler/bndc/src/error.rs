use std::io;
use std::path::PathBuf;

use bnd_registry::{DeclarationError, SnapshotError};
use bnd_resolve::{EmitError, ResolveError};
use bnd_types::{GraphError, TypeParseError};

/// Anything that stops a `bndc` command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{}: {source}", path.display())]
    Universe { path: PathBuf, source: GraphError },

    #[error("{}: {source}", path.display())]
    Declarations {
        path: PathBuf,
        source: DeclarationError,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("invalid type `{input}`: {source}")]
    Type {
        input: String,
        source: TypeParseError,
    },

    #[error("expected `attribute=Type`, got `{0}`")]
    Binding(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}
