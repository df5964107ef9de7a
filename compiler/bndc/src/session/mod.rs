//! Loading inputs: class graphs, fact files, and upstream snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use bnd_registry::{BindingRegistry, DeclarationSet, RegistrySnapshot};
use bnd_resolve::ResolverConfig;
use bnd_types::{ClassGraph, TypeRef};

use crate::error::CliError;

/// Where a registry comes from.
#[derive(Debug, Default)]
pub struct RegistrySources<'a> {
    /// Snapshots of dependencies, earliest wins.
    pub upstream: &'a [PathBuf],
    /// Classes being recompiled; their facts are dropped from upstream.
    pub stale_classes: &'a [String],
    /// JSON fact files for this unit.
    pub facts: &'a [PathBuf],
}

/// Overrides for [`ResolverConfig`] fields.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub listener_type: Option<String>,
    pub binder_type: Option<String>,
    pub min_api: Option<u32>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: ResolverConfig) -> ResolverConfig {
        if let Some(listener_type) = self.listener_type {
            config.listener_type = listener_type;
        }
        if let Some(binder_type) = self.binder_type {
            config.binder_type = binder_type;
        }
        if let Some(min_api) = self.min_api {
            config.default_min_api = min_api;
        }
        config
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

/// Merge upstream snapshots, drop stale facts, then register this unit's
/// facts.
pub fn load_registry(sources: &RegistrySources<'_>) -> Result<BindingRegistry, CliError> {
    let upstream = sources
        .upstream
        .iter()
        .map(|path| RegistrySnapshot::read(path)?.to_registry())
        .collect::<Result<Vec<_>, _>>()?;
    let mut registry = BindingRegistry::with_upstream(upstream);

    if !sources.stale_classes.is_empty() {
        let removed = registry.clear_facts_for_classes(sources.stale_classes);
        tracing::debug!(removed, "dropped facts of recompiled classes");
    }

    for path in sources.facts {
        let declarations = DeclarationSet::from_json(&read(path)?)
            .and_then(|set| set.apply(&mut registry).map(|()| set.len()))
            .map_err(|source| CliError::Declarations {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), facts = declarations, "registered facts");
    }
    Ok(registry)
}

pub fn load_universe(path: &Path) -> Result<ClassGraph, CliError> {
    ClassGraph::from_json(&read(path)?).map_err(|source| CliError::Universe {
        path: path.to_owned(),
        source,
    })
}

pub fn parse_type(input: &str) -> Result<TypeRef, CliError> {
    TypeRef::parse(input).map_err(|source| CliError::Type {
        input: input.to_owned(),
        source,
    })
}

/// Split `attribute=Type`.
pub fn parse_binding(input: &str) -> Result<(String, TypeRef), CliError> {
    let Some((attribute, ty)) = input.split_once('=') else {
        return Err(CliError::Binding(input.to_owned()));
    };
    if attribute.is_empty() {
        return Err(CliError::Binding(input.to_owned()));
    }
    Ok((attribute.to_owned(), parse_type(ty)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap loaded inputs")]
mod tests;
