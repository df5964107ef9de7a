//! The binding registry.
//!
//! `BindingRegistry` holds every fact the resolver consults, in seven
//! tables:
//!
//! ```text
//! adapters          attribute → (view, value)     → adapter method
//! renamed           attribute → view class        → setter name
//! conversions       from type → to type           → conversion method
//! multi_adapters    (view, attributes, types)     → adapter method
//! inverse_adapters  attribute → (view, value)     → getter adapter + event
//! inverse_methods   attribute → view class        → getter name + event
//! untaggable        type name                     → owning class
//! ```
//!
//! # Lifecycle
//!
//! A registry is assembled once per compilation unit: upstream snapshots
//! are merged first (earlier snapshots win), then the unit's own facts are
//! registered. After that it is only read. Facts are removed solely through
//! [`BindingRegistry::clear_facts_for_classes`], when the classes that
//! declared them are being recompiled.
//!
//! # Design
//!
//! - `BTreeMap` tables so candidate order, and with it tie-breaking, is
//!   deterministic across runs and across snapshot round-trips
//! - Registering a different fact under an occupied key is an error;
//!   re-registering the identical fact is a no-op

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;

use crate::descriptor::erased_name;
use crate::{
    AccessorKey, AttributeName, InverseDescriptor, MethodDescriptor, MultiValueAdapterKey,
    RegistryError, Table,
};

type Nested<K, V> = BTreeMap<AttributeName, BTreeMap<K, V>>;

/// Registry of binding adapters, renamed setters, conversions, and inverse
/// bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BindingRegistry {
    adapters: Nested<AccessorKey, MethodDescriptor>,
    renamed: Nested<String, MethodDescriptor>,
    conversions: BTreeMap<String, BTreeMap<String, MethodDescriptor>>,
    multi_adapters: BTreeMap<MultiValueAdapterKey, MethodDescriptor>,
    inverse_adapters: Nested<AccessorKey, InverseDescriptor>,
    inverse_methods: Nested<String, InverseDescriptor>,
    untaggable: BTreeMap<String, String>,
}

impl BindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from upstream modules' registries.
    ///
    /// Earlier registries take precedence over later ones on key collisions.
    pub fn with_upstream(upstream: impl IntoIterator<Item = BindingRegistry>) -> Self {
        let mut registry = Self::new();
        for module in upstream {
            registry.merge(module);
        }
        registry
    }

    // === Registration ===

    /// Map `attribute` on `declaring_class` (and its subclasses) to the
    /// setter `method`. `owner` is the class that declared the mapping.
    ///
    /// Overwrites any previous mapping for the same key.
    pub fn register_renamed_method(
        &mut self,
        attribute: &str,
        declaring_class: &str,
        method: &str,
        owner: &str,
    ) {
        self.renamed
            .entry(AttributeName::new(attribute))
            .or_default()
            .insert(
                erased_name(declaring_class),
                MethodDescriptor::new_instance(owner, method),
            );
    }

    /// Register a single-attribute binding adapter.
    pub fn register_adapter(
        &mut self,
        attribute: &str,
        view_type: &str,
        value_type: &str,
        adapter: MethodDescriptor,
    ) -> Result<(), RegistryError> {
        let attribute = AttributeName::new(attribute);
        let key = AccessorKey::new(view_type, value_type);
        let label = format!("`{attribute}` on {key}");
        insert_unique(
            self.adapters.entry(attribute).or_default(),
            key,
            adapter,
            Table::Adapter,
            label,
        )
    }

    /// Register an adapter consuming several attributes at once.
    pub fn register_multi_value_adapter(
        &mut self,
        key: MultiValueAdapterKey,
        adapter: MethodDescriptor,
    ) -> Result<(), RegistryError> {
        let label = key.to_string();
        insert_unique(&mut self.multi_adapters, key, adapter, Table::MultiAdapter, label)
    }

    /// Register a getter adapter for two-way binding.
    pub fn register_inverse_adapter(
        &mut self,
        attribute: &str,
        view_type: &str,
        value_type: &str,
        inverse: InverseDescriptor,
    ) -> Result<(), RegistryError> {
        let attribute = AttributeName::new(attribute);
        let key = AccessorKey::new(view_type, value_type);
        let label = format!("`{attribute}` on {key}");
        insert_unique(
            self.inverse_adapters.entry(attribute).or_default(),
            key,
            inverse,
            Table::InverseAdapter,
            label,
        )
    }

    /// Register a view getter for two-way binding of `attribute` on
    /// `declaring_class`.
    pub fn register_inverse_method(
        &mut self,
        attribute: &str,
        declaring_class: &str,
        inverse: InverseDescriptor,
    ) -> Result<(), RegistryError> {
        let attribute = AttributeName::new(attribute);
        let key = erased_name(declaring_class);
        let label = format!("`{attribute}` on {key}");
        insert_unique(
            self.inverse_methods.entry(attribute).or_default(),
            key,
            inverse,
            Table::InverseMethod,
            label,
        )
    }

    /// Register a method converting values of type `from` to type `to`.
    pub fn register_conversion(
        &mut self,
        from: &str,
        to: &str,
        conversion: MethodDescriptor,
    ) -> Result<(), RegistryError> {
        let from = erased_name(from);
        let to = erased_name(to);
        let label = format!("{from} → {to}");
        insert_unique(
            self.conversions.entry(from).or_default(),
            to,
            conversion,
            Table::Conversion,
            label,
        )
    }

    /// Mark view types whose instances cannot carry a binding tag.
    ///
    /// On a conflict none of `type_names` is registered.
    pub fn register_untaggable_types<I>(
        &mut self,
        type_names: I,
        owner: &str,
    ) -> Result<(), RegistryError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let owner = erased_name(owner);
        let names: Vec<String> = type_names
            .into_iter()
            .map(|name| erased_name(name.as_ref()))
            .collect();
        // Check the whole batch before inserting.
        let conflict = names.iter().find_map(|name| {
            self.untaggable
                .get(name)
                .filter(|existing| **existing != owner)
                .map(|existing| (name, existing))
        });
        if let Some((name, existing)) = conflict {
            return Err(RegistryError::DuplicateRegistration {
                table: Table::Untaggable,
                key: format!("`{name}`"),
                existing: existing.clone(),
                rejected: owner,
            });
        }
        for name in names {
            self.untaggable.entry(name).or_insert_with(|| owner.clone());
        }
        Ok(())
    }

    // === Invalidation and merging ===

    /// Drop every fact declared by one of `classes`.
    ///
    /// Returns the number of facts removed.
    #[tracing::instrument(level = "debug", skip_all, fields(classes = classes.len()))]
    pub fn clear_facts_for_classes<S: AsRef<str>>(&mut self, classes: &[S]) -> usize {
        let doomed: FxHashSet<&str> = classes.iter().map(AsRef::as_ref).collect();
        let owned = |d: &MethodDescriptor| doomed.contains(d.declaring_type.as_str());
        let before = self.len();

        retain_nested(&mut self.adapters, |d| !owned(d));
        retain_nested(&mut self.renamed, |d| !owned(d));
        retain_nested(&mut self.conversions, |d| !owned(d));
        retain_nested(&mut self.inverse_adapters, |d| !owned(&d.method));
        retain_nested(&mut self.inverse_methods, |d| !owned(&d.method));
        self.multi_adapters.retain(|_, d| !owned(d));
        self.untaggable
            .retain(|_, owner| !doomed.contains(owner.as_str()));

        let removed = before - self.len();
        tracing::debug!(removed, "cleared facts");
        removed
    }

    /// Fold an upstream registry into this one. Facts already present win.
    pub fn merge(&mut self, upstream: BindingRegistry) {
        merge_nested(&mut self.adapters, upstream.adapters);
        merge_nested(&mut self.renamed, upstream.renamed);
        merge_nested(&mut self.conversions, upstream.conversions);
        merge_nested(&mut self.inverse_adapters, upstream.inverse_adapters);
        merge_nested(&mut self.inverse_methods, upstream.inverse_methods);
        for (key, adapter) in upstream.multi_adapters {
            self.multi_adapters.entry(key).or_insert(adapter);
        }
        for (name, owner) in upstream.untaggable {
            self.untaggable.entry(name).or_insert(owner);
        }
    }

    // === Lookup ===

    /// Single-attribute adapters for `attribute`, in key order.
    pub fn adapters(
        &self,
        attribute: &AttributeName,
    ) -> impl Iterator<Item = (&AccessorKey, &MethodDescriptor)> {
        self.adapters.get(attribute).into_iter().flatten()
    }

    /// Renamed setters for `attribute`, keyed by view class.
    pub fn renamed_methods(
        &self,
        attribute: &AttributeName,
    ) -> impl Iterator<Item = (&str, &MethodDescriptor)> {
        self.renamed
            .get(attribute)
            .into_iter()
            .flatten()
            .map(|(class, d)| (class.as_str(), d))
    }

    /// All conversions as `(from, to, method)`, ordered by `from` then `to`.
    pub fn conversions(&self) -> impl Iterator<Item = (&str, &str, &MethodDescriptor)> {
        self.conversions.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, d)| (from.as_str(), to.as_str(), d))
        })
    }

    /// All multi-attribute adapters, in key order.
    pub fn multi_value_adapters(
        &self,
    ) -> impl Iterator<Item = (&MultiValueAdapterKey, &MethodDescriptor)> {
        self.multi_adapters.iter()
    }

    /// Inverse adapters for `attribute`, in key order.
    pub fn inverse_adapters(
        &self,
        attribute: &AttributeName,
    ) -> impl Iterator<Item = (&AccessorKey, &InverseDescriptor)> {
        self.inverse_adapters.get(attribute).into_iter().flatten()
    }

    /// Inverse getters for `attribute`, keyed by view class.
    pub fn inverse_methods(
        &self,
        attribute: &AttributeName,
    ) -> impl Iterator<Item = (&str, &InverseDescriptor)> {
        self.inverse_methods
            .get(attribute)
            .into_iter()
            .flatten()
            .map(|(class, d)| (class.as_str(), d))
    }

    // === Listing ===

    /// Every single-attribute adapter, grouped by attribute.
    pub fn all_adapters(
        &self,
    ) -> impl Iterator<Item = (&AttributeName, &AccessorKey, &MethodDescriptor)> {
        flatten_nested(&self.adapters)
    }

    pub fn all_renamed_methods(
        &self,
    ) -> impl Iterator<Item = (&AttributeName, &str, &MethodDescriptor)> {
        flatten_nested(&self.renamed).map(|(a, class, d)| (a, class.as_str(), d))
    }

    pub fn all_inverse_adapters(
        &self,
    ) -> impl Iterator<Item = (&AttributeName, &AccessorKey, &InverseDescriptor)> {
        flatten_nested(&self.inverse_adapters)
    }

    pub fn all_inverse_methods(
        &self,
    ) -> impl Iterator<Item = (&AttributeName, &str, &InverseDescriptor)> {
        flatten_nested(&self.inverse_methods).map(|(a, class, d)| (a, class.as_str(), d))
    }

    /// Untaggable type names with the class that declared each.
    pub fn untaggable_types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.untaggable
            .iter()
            .map(|(name, owner)| (name.as_str(), owner.as_str()))
    }

    // === Queries ===

    /// Whether `attribute` is the change event of some two-way binding.
    pub fn is_two_way_event_attribute(&self, attribute: &str) -> bool {
        let attribute = AttributeName::new(attribute);
        let is_event = |d: &InverseDescriptor| d.event == attribute;
        self.inverse_adapters.values().flat_map(BTreeMap::values).any(is_event)
            || self.inverse_methods.values().flat_map(BTreeMap::values).any(is_event)
    }

    /// Whether views of `type_name` cannot carry a binding tag.
    pub fn is_untaggable(&self, type_name: &str) -> bool {
        self.untaggable.contains_key(&erased_name(type_name))
    }

    /// Class that declared `type_name` untaggable.
    pub fn untaggable_owner(&self, type_name: &str) -> Option<&str> {
        self.untaggable.get(&erased_name(type_name)).map(String::as_str)
    }

    /// Total number of facts across all tables.
    pub fn len(&self) -> usize {
        fn nested<K, V>(table: &Nested<K, V>) -> usize {
            table.values().map(BTreeMap::len).sum()
        }
        nested(&self.adapters)
            + nested(&self.renamed)
            + self.conversions.values().map(BTreeMap::len).sum::<usize>()
            + self.multi_adapters.len()
            + nested(&self.inverse_adapters)
            + nested(&self.inverse_methods)
            + self.untaggable.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insert `value` under `key` unless a different value is already there.
fn insert_unique<K: Ord, V: PartialEq + fmt::Display>(
    table: &mut BTreeMap<K, V>,
    key: K,
    value: V,
    kind: Table,
    label: String,
) -> Result<(), RegistryError> {
    match table.get(&key) {
        Some(existing) if *existing == value => Ok(()),
        Some(existing) => Err(RegistryError::DuplicateRegistration {
            table: kind,
            key: label,
            existing: existing.to_string(),
            rejected: value.to_string(),
        }),
        None => {
            table.insert(key, value);
            Ok(())
        }
    }
}

fn flatten_nested<K, V>(table: &Nested<K, V>) -> impl Iterator<Item = (&AttributeName, &K, &V)> {
    table
        .iter()
        .flat_map(|(attribute, inner)| inner.iter().map(move |(k, v)| (attribute, k, v)))
}

fn retain_nested<O: Ord, K: Ord, V>(
    table: &mut BTreeMap<O, BTreeMap<K, V>>,
    mut keep: impl FnMut(&V) -> bool,
) {
    for inner in table.values_mut() {
        inner.retain(|_, v| keep(v));
    }
    table.retain(|_, inner| !inner.is_empty());
}

fn merge_nested<O: Ord, K: Ord, V>(
    into: &mut BTreeMap<O, BTreeMap<K, V>>,
    from: BTreeMap<O, BTreeMap<K, V>>,
) {
    for (outer, values) in from {
        let target = into.entry(outer).or_default();
        for (key, value) in values {
            target.entry(key).or_insert(value);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap registrations")]
mod tests;
