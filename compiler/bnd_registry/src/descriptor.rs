//! Method descriptors and registry keys.
//!
//! Types inside descriptors and keys are stored as erased qualified names,
//! not `TypeRef`s: the registry outlives any one type universe (it is
//! persisted and reloaded by downstream modules), so names are resolved
//! against the universe at query time.

use std::fmt;

use bnd_types::{simple_name, TypeRef};

use crate::{AttributeName, RegistryError};

/// A method the generated code can call.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MethodDescriptor {
    /// Class declaring the method.
    pub declaring_type: String,
    pub method: String,
    pub is_static: bool,
    /// The method takes the previous value before the new one.
    pub requires_old_value: bool,
    /// Binding-component type passed as the leading argument, if any.
    pub component_type: Option<String>,
}

impl MethodDescriptor {
    /// A static method.
    pub fn new_static(declaring_type: &str, method: impl Into<String>) -> Self {
        MethodDescriptor {
            declaring_type: erased_name(declaring_type),
            method: method.into(),
            is_static: true,
            requires_old_value: false,
            component_type: None,
        }
    }

    /// An instance method, reached through the binding component.
    pub fn new_instance(declaring_type: &str, method: impl Into<String>) -> Self {
        MethodDescriptor {
            is_static: false,
            ..MethodDescriptor::new_static(declaring_type, method)
        }
    }

    #[must_use]
    pub fn with_old_value(mut self) -> Self {
        self.requires_old_value = true;
        self
    }

    #[must_use]
    pub fn with_component(mut self, component_type: &str) -> Self {
        self.component_type = Some(erased_name(component_type));
        self
    }

    #[inline]
    pub fn takes_component(&self) -> bool {
        self.component_type.is_some()
    }

    /// The declaring type without its package.
    pub fn simple_type_name(&self) -> &str {
        simple_name(&self.declaring_type)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.method)
    }
}

/// A getter used by two-way binding, paired with the event attribute that
/// signals a change of the value it reads.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct InverseDescriptor {
    pub method: MethodDescriptor,
    pub event: AttributeName,
}

impl InverseDescriptor {
    pub fn new(method: MethodDescriptor, event: &str) -> Self {
        InverseDescriptor {
            method,
            event: AttributeName::new(event),
        }
    }
}

impl fmt::Display for InverseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (event `{}`)", self.method, self.event)
    }
}

/// Per-(view, value) adapter key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct AccessorKey {
    pub view_type: String,
    pub value_type: String,
}

impl AccessorKey {
    pub fn new(view_type: &str, value_type: &str) -> Self {
        AccessorKey {
            view_type: erased_name(view_type),
            value_type: erased_name(value_type),
        }
    }
}

impl fmt::Display for AccessorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.view_type, self.value_type)
    }
}

/// Key of an adapter that consumes several attributes in one call.
///
/// `attributes[i]` binds to the method parameter of type `parameter_types[i]`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MultiValueAdapterKey {
    pub view_type: String,
    pub attributes: Vec<AttributeName>,
    pub parameter_types: Vec<String>,
    /// The adapter only applies when every attribute is bound.
    pub require_all: bool,
}

impl MultiValueAdapterKey {
    pub fn new<A, P>(
        view_type: &str,
        attributes: A,
        parameter_types: P,
        require_all: bool,
    ) -> Result<Self, RegistryError>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let view_type = erased_name(view_type);
        let attributes: Vec<AttributeName> = attributes
            .into_iter()
            .map(|a| AttributeName::new(a.as_ref()))
            .collect();
        let parameter_types: Vec<String> = parameter_types
            .into_iter()
            .map(|p| erased_name(p.as_ref()))
            .collect();

        if attributes.len() != parameter_types.len() {
            return Err(RegistryError::ArityMismatch {
                view_type,
                attributes: attributes.len(),
                parameters: parameter_types.len(),
            });
        }
        for (i, attribute) in attributes.iter().enumerate() {
            if attributes[..i].contains(attribute) {
                return Err(RegistryError::RepeatedAttribute {
                    view_type,
                    attribute: attribute.clone(),
                });
            }
        }

        Ok(MultiValueAdapterKey {
            view_type,
            attributes,
            parameter_types,
            require_all,
        })
    }

    /// Parameter slot bound to `attribute`.
    pub fn slot_of(&self, attribute: &AttributeName) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }

    /// Attribute names in sorted order, paired with their slots.
    pub fn sorted_slots(&self) -> Vec<(&AttributeName, usize)> {
        let mut slots: Vec<_> = self.attributes.iter().zip(0..).collect();
        slots.sort();
        slots
    }
}

impl fmt::Display for MultiValueAdapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.view_type)?;
        for (i, (attribute, ty)) in self.attributes.iter().zip(&self.parameter_types).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{attribute}: {ty}")?;
        }
        f.write_str("]")?;
        if self.require_all {
            f.write_str(" (all required)")?;
        }
        Ok(())
    }
}

/// Canonical form of a type name as stored in the registry.
///
/// Generic arguments are erased; names that fail to parse are kept verbatim
/// so they can still be reported.
pub fn erased_name(name: &str) -> String {
    match TypeRef::parse(name) {
        Ok(ty) => ty.erasure().qualified_name(),
        Err(_) => name.trim().to_owned(),
    }
}
