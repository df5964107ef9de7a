//! Getter resolution for two-way bindings.

use std::slice;

use bnd_registry::{getter_names, AttributeName};
use bnd_types::{MethodSig, TypeRef};

use super::Resolver;
use crate::rank::is_better_parameter;
use crate::{EventSetter, GetterCall, ResolveError};

/// Running best while scanning inverse candidates.
#[derive(Default)]
struct Search {
    view_type: Option<TypeRef>,
    return_type: Option<TypeRef>,
    call: Option<GetterCall>,
    /// Last event whose setter could not be resolved.
    missing_event: Option<AttributeName>,
}

impl Search {
    /// Forget the view and return type of a candidate whose event setter is
    /// missing. A call accepted earlier is kept.
    fn drop_candidate(&mut self, event: &AttributeName) {
        self.view_type = None;
        self.return_type = None;
        self.missing_event = Some(event.clone());
    }
}

impl Resolver<'_> {
    /// Find the getter that reads `attribute` back from the view, together
    /// with the setter for its change event.
    ///
    /// `value_type` is the type of the bound expression, if known; without
    /// it any getter is accepted and the last match wins.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve_getter(
        &self,
        attribute: &str,
        view_type: &TypeRef,
        value_type: Option<&TypeRef>,
    ) -> Result<GetterCall, ResolveError> {
        let attribute = AttributeName::new(attribute);
        if self.is_binder(view_type) {
            return Ok(GetterCall::Binder {
                attribute,
                min_api: self.config.default_min_api,
            });
        }
        let view_type = self.universe.erase(view_type);

        let mut search = Search::default();
        self.scan_inverse_methods(&attribute, &view_type, value_type, &mut search);
        self.scan_inverse_adapters(&attribute, &view_type, value_type, &mut search);

        match search {
            Search {
                call: Some(call), ..
            } => Ok(call),
            Search {
                missing_event: Some(event),
                ..
            } => Err(ResolveError::InverseEventNotFound {
                event,
                view_type: view_type.to_string(),
            }),
            Search { .. } => Err(ResolveError::NoGetterFound {
                attribute,
                view_type: view_type.to_string(),
            }),
        }
    }

    fn scan_inverse_methods(
        &self,
        attribute: &AttributeName,
        view_type: &TypeRef,
        value_type: Option<&TypeRef>,
        search: &mut Search,
    ) {
        for (class, inverse) in self.registry.inverse_methods(attribute) {
            let Some(class) = self.lookup(class) else {
                continue;
            };
            if !self.universe.is_assignable_from(&class, view_type) {
                continue;
            }
            let name = if inverse.method.method.is_empty() {
                attribute.local_name()
            } else {
                inverse.method.method.as_str()
            };
            let Some(getter) = self.find_instance_getter(&class, name) else {
                tracing::debug!(class = %class, name, "no getter for inverse binding method");
                continue;
            };

            // A declared getter is taken outright when nothing matched yet.
            if search.return_type.is_some()
                && !self.accepts(search, &class, &getter.return_type, value_type)
            {
                continue;
            }
            search.view_type = Some(class);
            search.return_type = Some(getter.return_type.clone());
            match self.resolve_event(&inverse.event, view_type) {
                Some(event) => {
                    search.call = Some(GetterCall::InverseNative {
                        inverse: inverse.clone(),
                        getter,
                        event,
                    });
                }
                None => search.drop_candidate(&inverse.event),
            }
        }
    }

    fn scan_inverse_adapters(
        &self,
        attribute: &AttributeName,
        view_type: &TypeRef,
        value_type: Option<&TypeRef>,
        search: &mut Search,
    ) {
        for (key, inverse) in self.registry.inverse_adapters(attribute) {
            let Some(adapter_view) = self.lookup(&key.view_type) else {
                continue;
            };
            if !self.universe.is_assignable_from(&adapter_view, view_type) {
                continue;
            }
            let Some(adapter_value) = self.lookup(&key.value_type) else {
                continue;
            };

            if !self.accepts(search, &adapter_view, &adapter_value, value_type) {
                continue;
            }
            search.view_type = Some(adapter_view.clone());
            search.return_type = Some(adapter_value.clone());
            match self.resolve_event(&inverse.event, view_type) {
                Some(event) => {
                    search.call = Some(GetterCall::InverseAdapter {
                        inverse: inverse.clone(),
                        view_type: adapter_view,
                        return_type: adapter_value,
                        event,
                        min_api: self.config.default_min_api,
                    });
                }
                None => search.drop_candidate(&inverse.event),
            }
        }
    }

    /// Whether a getter declared on `candidate_view` returning
    /// `return_type` beats the current best.
    fn accepts(
        &self,
        search: &Search,
        candidate_view: &TypeRef,
        return_type: &TypeRef,
        value_type: Option<&TypeRef>,
    ) -> bool {
        let Some(value_type) = value_type else {
            return true;
        };
        let better_view = search
            .view_type
            .as_ref()
            .map_or(true, |best| self.universe.is_assignable_from(best, candidate_view));
        is_better_parameter(
            self.universe,
            self.registry,
            value_type,
            return_type,
            search.return_type.as_ref(),
            better_view,
        )
    }

    /// A zero-argument, non-void instance method named `name`, `getName`, or
    /// `isName`.
    fn find_instance_getter(&self, class: &TypeRef, name: &str) -> Option<MethodSig> {
        getter_names(name).iter().find_map(|candidate| {
            self.universe
                .methods(class, candidate, 0)
                .into_iter()
                .find(|m| !m.is_static && !m.is_void())
        })
    }

    /// Resolve the setter that installs the change listener for `event`.
    ///
    /// Falls back to multi-attribute adapters, which must yield exactly one
    /// call.
    fn resolve_event(&self, event: &AttributeName, view_type: &TypeRef) -> Option<EventSetter> {
        let listener = self.listener_type();
        if let Ok(call) = self.resolve_setter(event.as_str(), Some(view_type), &listener) {
            return Some(EventSetter::Single(call));
        }
        let mut calls = self.resolve_multi_attribute_setters(
            &[event.as_str()],
            view_type,
            slice::from_ref(&listener),
        );
        if calls.len() == 1 {
            return calls.pop().map(EventSetter::Multi);
        }
        tracing::error!(
            event = %event,
            view_type = %view_type,
            candidates = calls.len(),
            "could not find event on view type"
        );
        None
    }
}
