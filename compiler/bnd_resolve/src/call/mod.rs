//! Call descriptors.
//!
//! Resolution results are plain data: which method to call and how the
//! value expressions must be adapted on the way in. Each descriptor renders
//! itself as a Java call expression given the expressions for the binding
//! component, the view, and the bound values.
//!
//! Static adapters are called on their declaring class; instance adapters
//! are reached through the component's accessor for the adapter holder:
//!
//! ```text
//! com.example.Bindings.setImageUrl(view, value)           static
//! component.getBindings().setImageUrl(view, value)        instance
//! ```
//!
//! When an adapter takes the old value too, the old value expressions come
//! first.

use bnd_registry::{capitalize, AttributeName, InverseDescriptor, MethodDescriptor, MultiValueAdapterKey};
use bnd_types::{MethodSig, TypeRef};

use crate::EmitError;

/// Rewrites applied to a value expression before it is passed on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueAdaptation {
    /// Registered conversion wrapping the value.
    pub conversion: Option<MethodDescriptor>,
    /// Cast prefixed to the (converted) value.
    pub cast: Option<TypeRef>,
}

impl ValueAdaptation {
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.conversion.is_none() && self.cast.is_none()
    }

    /// Render `value` with the conversion and cast applied.
    pub fn apply(&self, component: Option<&str>, value: &str) -> Result<String, EmitError> {
        let converted = match &self.conversion {
            Some(conversion) => invoke(conversion, component, vec![value.to_owned()])?,
            None => value.to_owned(),
        };
        Ok(match &self.cast {
            Some(cast) => format!("({cast}) {converted}"),
            None => converted,
        })
    }
}

/// A resolved single-attribute setter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetterCall {
    /// Setter on a nested binding, called by convention without checking it
    /// exists.
    Dummy { method: String, min_api: u32 },
    /// A registered binding adapter.
    Adapter {
        adapter: MethodDescriptor,
        /// The adapter's declared view type.
        view_type: TypeRef,
        /// The adapter's declared value type.
        parameter_type: TypeRef,
        adaptation: ValueAdaptation,
        min_api: u32,
    },
    /// A setter declared on the view class.
    NativeMethod {
        method: MethodSig,
        adaptation: ValueAdaptation,
    },
}

impl SetterCall {
    /// Render the call. `values` is `[new]`, or `[old, new]` when the call
    /// requires the old value.
    pub fn to_java(
        &self,
        component: Option<&str>,
        view: &str,
        values: &[&str],
    ) -> Result<String, EmitError> {
        let expected = if self.requires_old_value() { 2 } else { 1 };
        check_value_count(values, expected)?;
        match self {
            SetterCall::Dummy { method, .. } => Ok(format!("{view}.{method}({})", values.join(", "))),
            SetterCall::Adapter {
                adapter,
                adaptation,
                ..
            } => {
                let mut args = vec![view.to_owned()];
                for value in values {
                    args.push(adaptation.apply(component, value)?);
                }
                invoke(adapter, component, args)
            }
            SetterCall::NativeMethod { method, adaptation } => {
                let mut args = Vec::with_capacity(values.len());
                for value in values {
                    args.push(adaptation.apply(component, value)?);
                }
                Ok(format!("{view}.{}({})", method.name, args.join(", ")))
            }
        }
    }

    pub fn min_api(&self) -> u32 {
        match self {
            SetterCall::Dummy { min_api, .. } | SetterCall::Adapter { min_api, .. } => *min_api,
            SetterCall::NativeMethod { method, .. } => method.min_api,
        }
    }

    pub fn requires_old_value(&self) -> bool {
        matches!(self, SetterCall::Adapter { adapter, .. } if adapter.requires_old_value)
    }

    /// Types of the value arguments, old value first when required.
    ///
    /// Empty for dummy setters, whose parameter type is unknown.
    pub fn parameter_types(&self) -> Vec<&TypeRef> {
        match self {
            SetterCall::Dummy { .. } => Vec::new(),
            SetterCall::Adapter { parameter_type, .. } if self.requires_old_value() => {
                vec![parameter_type, parameter_type]
            }
            SetterCall::Adapter { parameter_type, .. } => vec![parameter_type],
            SetterCall::NativeMethod { method, .. } => method.params.iter().collect(),
        }
    }

    /// The method name as it appears in the rendered call.
    pub fn method_name(&self) -> &str {
        match self {
            SetterCall::Dummy { method, .. } => method,
            SetterCall::Adapter { adapter, .. } => &adapter.method,
            SetterCall::NativeMethod { method, .. } => &method.name,
        }
    }

    pub fn adaptation(&self) -> Option<&ValueAdaptation> {
        match self {
            SetterCall::Dummy { .. } => None,
            SetterCall::Adapter { adaptation, .. } | SetterCall::NativeMethod { adaptation, .. } => {
                Some(adaptation)
            }
        }
    }

    /// Accessor expression for the adapter holder, for instance adapters.
    pub fn adapter_accessor(&self, component: &str) -> Option<String> {
        match self {
            SetterCall::Adapter { adapter, .. } => accessor(adapter, component),
            _ => None,
        }
    }
}

/// How a supplied value reaches its adapter parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotMatch {
    /// Assignable as is.
    Direct,
    Boxing,
    /// Implicit primitive widening.
    Widening,
    Converted(MethodDescriptor),
    /// `java.lang.Object` cast to the parameter type.
    Cast,
}

/// One parameter slot of a multi-attribute adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotBinding {
    pub attribute: AttributeName,
    pub parameter_type: TypeRef,
    /// `None` when the attribute was not supplied; the slot then receives
    /// the parameter type's default literal.
    pub matched: Option<SlotMatch>,
}

impl SlotBinding {
    #[inline]
    pub fn is_supplied(&self) -> bool {
        self.matched.is_some()
    }

    fn render(&self, component: Option<&str>, value: &str) -> Result<String, EmitError> {
        match &self.matched {
            Some(SlotMatch::Converted(conversion)) => {
                invoke(conversion, component, vec![value.to_owned()])
            }
            Some(SlotMatch::Cast) => Ok(format!("({}) {value}", self.parameter_type)),
            _ => Ok(value.to_owned()),
        }
    }
}

/// A resolved multi-attribute adapter call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiAttributeSetter {
    pub key: MultiValueAdapterKey,
    pub adapter: MethodDescriptor,
    /// The adapter's declared view type.
    pub view_type: TypeRef,
    /// Parameter slots in declaration order.
    pub slots: Vec<SlotBinding>,
    pub min_api: u32,
}

impl MultiAttributeSetter {
    /// The supplied attributes this call consumes, in slot order.
    ///
    /// Value expressions passed to [`to_java`](Self::to_java) follow this
    /// order.
    pub fn attributes(&self) -> Vec<&AttributeName> {
        self.supplied().map(|slot| &slot.attribute).collect()
    }

    pub fn supplied_count(&self) -> usize {
        self.supplied().count()
    }

    #[inline]
    pub fn requires_old_value(&self) -> bool {
        self.adapter.requires_old_value
    }

    /// Types of the supplied values; the old values' types come first when
    /// required.
    pub fn parameter_types(&self) -> Vec<&TypeRef> {
        let types: Vec<&TypeRef> = self.supplied().map(|slot| &slot.parameter_type).collect();
        if self.requires_old_value() {
            types.iter().chain(&types).copied().collect()
        } else {
            types
        }
    }

    /// Render the call. `values` holds one expression per supplied
    /// attribute, preceded by as many old-value expressions when the adapter
    /// requires them.
    pub fn to_java(
        &self,
        component: Option<&str>,
        view: &str,
        values: &[&str],
    ) -> Result<String, EmitError> {
        let supplied = self.supplied_count();
        let old_count = if self.requires_old_value() { supplied } else { 0 };
        check_value_count(values, supplied + old_count)?;

        let (old, new) = values.split_at(old_count);
        let mut args = vec![view.to_owned()];
        if self.requires_old_value() {
            self.render_slots(component, old, &mut args)?;
        }
        self.render_slots(component, new, &mut args)?;
        invoke(&self.adapter, component, args)
    }

    /// Accessor expression for the adapter holder, for instance adapters.
    pub fn adapter_accessor(&self, component: &str) -> Option<String> {
        accessor(&self.adapter, component)
    }

    fn supplied(&self) -> impl Iterator<Item = &SlotBinding> {
        self.slots.iter().filter(|slot| slot.is_supplied())
    }

    fn render_slots(
        &self,
        component: Option<&str>,
        values: &[&str],
        out: &mut Vec<String>,
    ) -> Result<(), EmitError> {
        let mut values = values.iter();
        for slot in &self.slots {
            if !slot.is_supplied() {
                out.push(slot.parameter_type.default_literal().to_owned());
                continue;
            }
            let value = values.next().ok_or(EmitError::ValueCount {
                expected: self.supplied_count(),
                found: 0,
            })?;
            out.push(slot.render(component, value)?);
        }
        Ok(())
    }
}

/// The setter installing the change listener of a two-way binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventSetter {
    Single(SetterCall),
    Multi(MultiAttributeSetter),
}

impl EventSetter {
    pub fn to_java(
        &self,
        component: Option<&str>,
        view: &str,
        values: &[&str],
    ) -> Result<String, EmitError> {
        match self {
            EventSetter::Single(call) => call.to_java(component, view, values),
            EventSetter::Multi(call) => call.to_java(component, view, values),
        }
    }

    pub fn min_api(&self) -> u32 {
        match self {
            EventSetter::Single(call) => call.min_api(),
            EventSetter::Multi(call) => call.min_api,
        }
    }

    pub fn requires_old_value(&self) -> bool {
        match self {
            EventSetter::Single(call) => call.requires_old_value(),
            EventSetter::Multi(call) => call.requires_old_value(),
        }
    }
}

/// A resolved two-way binding getter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GetterCall {
    /// The view is a nested binding; the value is read off it by convention.
    Binder { attribute: AttributeName, min_api: u32 },
    /// A registered inverse binding adapter.
    InverseAdapter {
        inverse: InverseDescriptor,
        /// The adapter's declared view type.
        view_type: TypeRef,
        return_type: TypeRef,
        event: EventSetter,
        min_api: u32,
    },
    /// A getter declared on the view class.
    InverseNative {
        inverse: InverseDescriptor,
        getter: MethodSig,
        event: EventSetter,
    },
}

impl GetterCall {
    pub fn to_java(&self, component: Option<&str>, view: &str) -> Result<String, EmitError> {
        match self {
            GetterCall::Binder { attribute, .. } => {
                Ok(format!("{view}.get{}()", capitalize(attribute.local_name())))
            }
            GetterCall::InverseAdapter { inverse, .. } => {
                invoke(&inverse.method, component, vec![view.to_owned()])
            }
            GetterCall::InverseNative { getter, .. } => Ok(format!("{view}.{}()", getter.name)),
        }
    }

    pub fn min_api(&self) -> u32 {
        match self {
            GetterCall::Binder { min_api, .. } | GetterCall::InverseAdapter { min_api, .. } => {
                *min_api
            }
            GetterCall::InverseNative { getter, .. } => getter.min_api,
        }
    }

    /// Type of the value read. Unknown for nested bindings.
    pub fn return_type(&self) -> Option<&TypeRef> {
        match self {
            GetterCall::Binder { .. } => None,
            GetterCall::InverseAdapter { return_type, .. } => Some(return_type),
            GetterCall::InverseNative { getter, .. } => Some(&getter.return_type),
        }
    }

    /// The setter that installs the change listener.
    pub fn event(&self) -> Option<&EventSetter> {
        match self {
            GetterCall::Binder { .. } => None,
            GetterCall::InverseAdapter { event, .. } | GetterCall::InverseNative { event, .. } => {
                Some(event)
            }
        }
    }

    /// The normalized name of the change-event attribute.
    pub fn event_attribute(&self) -> Option<&AttributeName> {
        match self {
            GetterCall::Binder { .. } => None,
            GetterCall::InverseAdapter { inverse, .. }
            | GetterCall::InverseNative { inverse, .. } => Some(&inverse.event),
        }
    }

    /// Accessor expression for the adapter holder, for instance adapters.
    pub fn adapter_accessor(&self, component: &str) -> Option<String> {
        match self {
            GetterCall::InverseAdapter { inverse, .. } => accessor(&inverse.method, component),
            _ => None,
        }
    }
}

fn check_value_count(values: &[&str], expected: usize) -> Result<(), EmitError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(EmitError::ValueCount {
            expected,
            found: values.len(),
        })
    }
}

fn accessor(method: &MethodDescriptor, component: &str) -> Option<String> {
    (!method.is_static).then(|| format!("{component}.get{}()", method.simple_type_name()))
}

/// Render a call to a registered method. The component is prepended to
/// `args` when the method takes it.
fn invoke(
    method: &MethodDescriptor,
    component: Option<&str>,
    args: Vec<String>,
) -> Result<String, EmitError> {
    let needs_component = !method.is_static || method.takes_component();
    let component = match component {
        Some(component) => component,
        None if needs_component => {
            return Err(EmitError::MissingComponent {
                method: method.to_string(),
            })
        }
        None => "",
    };

    let receiver = match accessor(method, component) {
        Some(accessor) => accessor,
        None => method.declaring_type.clone(),
    };
    let mut all = Vec::with_capacity(args.len() + 1);
    if method.takes_component() {
        all.push(component.to_owned());
    }
    all.extend(args);
    Ok(format!("{receiver}.{}({})", method.method, all.join(", ")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap rendered calls")]
mod tests;
