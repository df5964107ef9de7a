//! Multi-attribute adapter resolution.

use std::cmp::Ordering;

use bnd_registry::{AttributeName, MethodDescriptor, MultiValueAdapterKey};
use bnd_types::{TypeRef, TypeUniverse};
use rustc_hash::FxHashSet;

use super::Resolver;
use crate::rank::{compare_multi_setters, find_conversion};
use crate::{MultiAttributeSetter, SlotBinding, SlotMatch};

impl Resolver<'_> {
    /// Cover as many of `attributes` as possible with multi-attribute
    /// adapters, best first. No attribute is consumed by more than one of
    /// the returned calls.
    ///
    /// # Panics
    ///
    /// Panics if `attributes` and `value_types` differ in length.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve_multi_attribute_setters(
        &self,
        attributes: &[&str],
        view_type: &TypeRef,
        value_types: &[TypeRef],
    ) -> Vec<MultiAttributeSetter> {
        assert_eq!(
            attributes.len(),
            value_types.len(),
            "every attribute needs a value type"
        );
        let attributes: Vec<AttributeName> =
            attributes.iter().map(|a| AttributeName::new(a)).collect();
        let value_types: Vec<TypeRef> = value_types
            .iter()
            .map(|value| self.erase_against_view(view_type, value).1)
            .collect();
        let view_type = self.universe.erase(view_type);

        let candidates: Vec<MultiAttributeSetter> = self
            .registry
            .multi_value_adapters()
            .filter_map(|(key, adapter)| {
                self.match_adapter(key, adapter, &attributes, &view_type, &value_types)
            })
            .collect();
        tracing::trace!(candidates = candidates.len(), "matched multi-attribute adapters");
        select_greedy(self.universe, candidates)
    }

    /// Bind the supplied attributes to the adapter's slots, or `None` if the
    /// adapter does not apply.
    fn match_adapter(
        &self,
        key: &MultiValueAdapterKey,
        adapter: &MethodDescriptor,
        attributes: &[AttributeName],
        view_type: &TypeRef,
        value_types: &[TypeRef],
    ) -> Option<MultiAttributeSetter> {
        if key.require_all && key.attributes.len() > attributes.len() {
            return None;
        }
        let adapter_view = self.lookup(&key.view_type)?;
        if !self.universe.is_assignable_from(&adapter_view, view_type) {
            return None;
        }
        let parameter_types = key
            .parameter_types
            .iter()
            .map(|name| self.lookup(name))
            .collect::<Option<Vec<_>>>()?;

        let mut matched: Vec<Option<SlotMatch>> = vec![None; key.attributes.len()];
        for (attribute, value_type) in attributes.iter().zip(value_types) {
            let Some(slot) = key.slot_of(attribute) else {
                continue;
            };
            matched[slot] = Some(self.match_slot(value_type, &parameter_types[slot])?);
        }

        let supplied = matched.iter().filter(|m| m.is_some()).count();
        if supplied == 0 || (key.require_all && supplied != key.attributes.len()) {
            return None;
        }

        let slots = key
            .attributes
            .iter()
            .zip(parameter_types)
            .zip(matched)
            .map(|((attribute, parameter_type), matched)| SlotBinding {
                attribute: attribute.clone(),
                parameter_type,
                matched,
            })
            .collect();
        Some(MultiAttributeSetter {
            key: key.clone(),
            adapter: adapter.clone(),
            view_type: adapter_view,
            slots,
            min_api: self.config.default_min_api,
        })
    }

    fn match_slot(&self, value_type: &TypeRef, parameter_type: &TypeRef) -> Option<SlotMatch> {
        let universe = self.universe;
        if universe.is_assignable_from(parameter_type, value_type) {
            Some(SlotMatch::Direct)
        } else if universe.is_boxing_conversion(value_type, parameter_type) {
            Some(SlotMatch::Boxing)
        } else if universe.is_implicit_conversion(value_type, parameter_type) {
            Some(SlotMatch::Widening)
        } else if let Some(conversion) =
            find_conversion(universe, self.registry, value_type, parameter_type)
        {
            Some(SlotMatch::Converted(conversion.clone()))
        } else if value_type.is_object() {
            Some(SlotMatch::Cast)
        } else {
            None
        }
    }
}

/// Repeatedly take the best candidate and discard every other candidate
/// sharing an attribute with it.
fn select_greedy(
    universe: &dyn TypeUniverse,
    mut candidates: Vec<MultiAttributeSetter>,
) -> Vec<MultiAttributeSetter> {
    let mut selected = Vec::new();
    while !candidates.is_empty() {
        // Ties keep registry order.
        let best = (1..candidates.len()).fold(0, |best, i| {
            match compare_multi_setters(universe, &candidates[i], &candidates[best]) {
                Ordering::Less => i,
                _ => best,
            }
        });
        let chosen = candidates.remove(best);
        let consumed: FxHashSet<&AttributeName> = chosen.attributes().into_iter().collect();
        candidates.retain(|candidate| {
            candidate
                .attributes()
                .into_iter()
                .all(|attribute| !consumed.contains(attribute))
        });
        tracing::debug!(
            adapter = %chosen.adapter,
            consumed = consumed.len(),
            "selected multi-attribute adapter"
        );
        selected.push(chosen);
    }
    selected
}
