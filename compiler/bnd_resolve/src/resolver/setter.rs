//! Single-attribute setter resolution.

use bnd_registry::AttributeName;
use bnd_types::TypeRef;
use smallvec::SmallVec;

use super::Resolver;
use crate::rank::{find_conversion, is_better_parameter};
use crate::{ResolveError, SetterCall, ValueAdaptation};

/// Best candidate so far, with the view and parameter types it won with.
struct Best {
    view_type: TypeRef,
    parameter_type: TypeRef,
    call: SetterCall,
}

impl Resolver<'_> {
    /// Find the call that sets `attribute` to a value of `value_type`.
    ///
    /// Registered adapters compete with the view's own setters; an adapter
    /// declared for a view at least as specific as the current best may
    /// displace it. `view_type` is `None` when the view's type is unknown,
    /// which, like a nested binding, yields a call by naming convention.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve_setter(
        &self,
        attribute: &str,
        view_type: Option<&TypeRef>,
        value_type: &TypeRef,
    ) -> Result<SetterCall, ResolveError> {
        let attribute = AttributeName::new(attribute);
        let Some(view_type) = view_type else {
            return Ok(self.dummy_setter(&attribute));
        };
        let (view_type, value_type) = self.erase_against_view(view_type, value_type);

        let mut best = self.best_view_setter(&attribute, &view_type, &value_type);
        self.compete_adapters(&attribute, &view_type, &value_type, &mut best);

        match best {
            Some(best) => Ok(self.adapt(best.call, &value_type, &best.parameter_type)),
            None if self.is_binder(&view_type) => Ok(self.dummy_setter(&attribute)),
            None => Err(ResolveError::NoSetterFound {
                attribute,
                view_type: view_type.to_string(),
            }),
        }
    }

    fn dummy_setter(&self, attribute: &AttributeName) -> SetterCall {
        SetterCall::Dummy {
            method: attribute.setter_name(),
            min_api: self.config.default_min_api,
        }
    }

    /// Setter names to look for on the view, most specific first.
    fn setter_candidates(
        &self,
        attribute: &AttributeName,
        view_type: &TypeRef,
    ) -> SmallVec<[String; 3]> {
        let mut names = SmallVec::new();
        let renamed = self.registry.renamed_methods(attribute).find(|(class, _)| {
            self.lookup(class)
                .is_some_and(|class| self.universe.is_assignable_from(&class, view_type))
        });
        if let Some((_, method)) = renamed {
            names.push(method.method.clone());
        }
        names.push(attribute.setter_name());
        names.push(attribute.local_name().to_owned());
        names
    }

    /// Best one-argument void instance method on the view itself.
    fn best_view_setter(
        &self,
        attribute: &AttributeName,
        view_type: &TypeRef,
        value_type: &TypeRef,
    ) -> Option<Best> {
        let mut best: Option<Best> = None;
        for name in self.setter_candidates(attribute, view_type) {
            for method in self.universe.methods(view_type, &name, 1) {
                if !method.is_void() || method.is_static {
                    continue;
                }
                let [param] = method.params.as_slice() else {
                    continue;
                };
                let old = best.as_ref().map(|b| &b.parameter_type);
                if is_better_parameter(self.universe, self.registry, value_type, param, old, true) {
                    best = Some(Best {
                        view_type: method.declaring_type.clone(),
                        parameter_type: param.clone(),
                        call: SetterCall::NativeMethod {
                            method: method.clone(),
                            adaptation: ValueAdaptation::default(),
                        },
                    });
                }
            }
        }
        best
    }

    fn compete_adapters(
        &self,
        attribute: &AttributeName,
        view_type: &TypeRef,
        value_type: &TypeRef,
        best: &mut Option<Best>,
    ) {
        for (key, adapter) in self.registry.adapters(attribute) {
            let Some(adapter_view) = self.lookup(&key.view_type) else {
                continue;
            };
            if !self.universe.is_assignable_from(&adapter_view, view_type) {
                continue;
            }
            let Some(adapter_value) = self.lookup(&key.value_type) else {
                continue;
            };
            tracing::trace!(%adapter, takes = %adapter_value, value = %value_type, "candidate adapter");

            let better_view = best
                .as_ref()
                .map_or(true, |b| self.universe.is_assignable_from(&b.view_type, &adapter_view));
            let old = best.as_ref().map(|b| &b.parameter_type);
            let universe = self.universe;
            if is_better_parameter(universe, self.registry, value_type, &adapter_value, old, better_view) {
                *best = Some(Best {
                    view_type: adapter_view.clone(),
                    parameter_type: adapter_value.clone(),
                    call: SetterCall::Adapter {
                        adapter: adapter.clone(),
                        view_type: adapter_view,
                        parameter_type: adapter_value,
                        adaptation: ValueAdaptation::default(),
                        min_api: self.config.default_min_api,
                    },
                });
            }
        }
    }

    /// Attach the conversion or cast `value_type` needs to reach `param`.
    fn adapt(&self, mut call: SetterCall, value_type: &TypeRef, param: &TypeRef) -> SetterCall {
        let adaptation = self.adaptation(value_type, param);
        match &mut call {
            SetterCall::Adapter {
                adaptation: slot, ..
            }
            | SetterCall::NativeMethod {
                adaptation: slot, ..
            } => *slot = adaptation,
            SetterCall::Dummy { .. } => {}
        }
        call
    }

    fn adaptation(&self, value_type: &TypeRef, param: &TypeRef) -> ValueAdaptation {
        let universe = self.universe;
        let direct = value_type == param
            || universe.is_boxing_conversion(value_type, param)
            || universe.is_implicit_conversion(value_type, param)
            || universe.is_assignable_from(param, value_type);
        let conversion = if direct {
            None
        } else {
            find_conversion(universe, self.registry, value_type, param).cloned()
        };
        let cast = (conversion.is_none()
            && value_type.is_object()
            && param.is_nullable()
            && !param.is_object())
        .then(|| param.clone());
        ValueAdaptation { conversion, cast }
    }
}
