//! The resolver.
//!
//! A `Resolver` borrows a frozen [`BindingRegistry`] and a [`TypeUniverse`]
//! and answers resolution queries against them. It holds no state of its
//! own beyond its configuration, so one resolver can serve a whole
//! code-generation pass.

mod getter;
mod multi;
mod setter;

use bnd_registry::BindingRegistry;
use bnd_types::{TypeRef, TypeUniverse};

use crate::ResolverConfig;

/// Resolves binding expressions to method calls.
pub struct Resolver<'a> {
    registry: &'a BindingRegistry,
    universe: &'a dyn TypeUniverse,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a BindingRegistry, universe: &'a dyn TypeUniverse) -> Self {
        Self::with_config(registry, universe, ResolverConfig::default())
    }

    pub fn with_config(
        registry: &'a BindingRegistry,
        universe: &'a dyn TypeUniverse,
        config: ResolverConfig,
    ) -> Self {
        Resolver {
            registry,
            universe,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &'a BindingRegistry {
        self.registry
    }

    /// Whether `attribute` is the change event of a two-way binding.
    pub fn is_two_way_event_attribute(&self, attribute: &str) -> bool {
        self.registry.is_two_way_event_attribute(attribute)
    }

    /// Whether views of `view_type` cannot carry a binding tag.
    pub fn is_untaggable(&self, view_type: &str) -> bool {
        self.registry.is_untaggable(view_type)
    }

    /// Resolve a registry type name, erased. Unknown names are logged and
    /// skipped by the caller.
    fn lookup(&self, name: &str) -> Option<TypeRef> {
        let found = self.universe.find_type(name).map(|ty| self.universe.erase(&ty));
        if found.is_none() {
            tracing::debug!(type_name = name, "unknown type in registry, skipping entry");
        }
        found
    }

    fn is_binder(&self, view_type: &TypeRef) -> bool {
        self.universe.is_binder_type(view_type)
            || self
                .universe
                .find_type(&self.config.binder_type)
                .is_some_and(|binder| self.universe.is_assignable_from(&binder, view_type))
    }

    fn listener_type(&self) -> TypeRef {
        self.universe
            .find_type(&self.config.listener_type)
            .unwrap_or_else(|| TypeRef::named(self.config.listener_type.as_str()))
    }

    /// Erase `value_type` if it mentions one of a generic view's type
    /// arguments, and erase the view.
    fn erase_against_view(&self, view_type: &TypeRef, value_type: &TypeRef) -> (TypeRef, TypeRef) {
        if !view_type.is_generic() {
            return (view_type.clone(), value_type.clone());
        }
        let value_type = if view_type.type_args().iter().any(|arg| mentions(value_type, arg)) {
            self.universe.erase(value_type)
        } else {
            value_type.clone()
        };
        (self.universe.erase(view_type), value_type)
    }
}

fn mentions(ty: &TypeRef, arg: &TypeRef) -> bool {
    ty == arg
        || ty.type_args().iter().any(|inner| mentions(inner, arg))
        || ty.array_component().is_some_and(|component| mentions(component, arg))
}
