//! Declaration facts.
//!
//! The annotation processor front end is out of scope for this workspace;
//! whatever extracts binding facts from user code hands them over as a
//! `DeclarationSet`, a plain JSON document:
//!
//! ```json
//! {
//!   "adapters": [
//!     { "attribute": "imageUrl", "view_type": "android.widget.ImageView",
//!       "value_type": "java.lang.String",
//!       "declaring_type": "com.example.Bindings", "method": "setImageUrl" }
//!   ],
//!   "untaggable": [
//!     { "types": ["android.view.ViewStub"], "owner": "com.example.Bindings" }
//!   ]
//! }
//! ```
//!
//! Every section is optional.

use serde::Deserialize;

use crate::{
    BindingRegistry, DeclarationError, InverseDescriptor, MethodDescriptor, MultiValueAdapterKey,
};

/// Method half of a fact.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MethodFact {
    pub declaring_type: String,
    pub method: String,
    #[serde(rename = "static", default = "yes")]
    pub is_static: bool,
    #[serde(default)]
    pub requires_old_value: bool,
    #[serde(default)]
    pub component_type: Option<String>,
}

impl MethodFact {
    fn descriptor(&self) -> MethodDescriptor {
        let mut descriptor = if self.is_static {
            MethodDescriptor::new_static(&self.declaring_type, self.method.as_str())
        } else {
            MethodDescriptor::new_instance(&self.declaring_type, self.method.as_str())
        };
        if self.requires_old_value {
            descriptor = descriptor.with_old_value();
        }
        if let Some(component) = &self.component_type {
            descriptor = descriptor.with_component(component);
        }
        descriptor
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AdapterFact {
    pub attribute: String,
    pub view_type: String,
    pub value_type: String,
    #[serde(flatten)]
    pub method: MethodFact,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MultiAdapterFact {
    pub view_type: String,
    pub attributes: Vec<String>,
    pub parameter_types: Vec<String>,
    #[serde(default = "yes")]
    pub require_all: bool,
    #[serde(flatten)]
    pub method: MethodFact,
}

/// A `@BindingMethod`-style rename of an attribute's setter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RenamedFact {
    pub attribute: String,
    pub declaring_class: String,
    pub method: String,
    pub owner: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InverseAdapterFact {
    pub attribute: String,
    pub view_type: String,
    pub value_type: String,
    /// Defaults to `<attribute>AttrChanged`.
    #[serde(default)]
    pub event: Option<String>,
    #[serde(flatten)]
    pub method: MethodFact,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InverseMethodFact {
    pub attribute: String,
    pub declaring_class: String,
    /// Getter name; empty means "derive from the attribute".
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub event: Option<String>,
    /// Class that declared the mapping.
    pub owner: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ConversionFact {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub method: MethodFact,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UntaggableFact {
    pub types: Vec<String>,
    pub owner: String,
}

/// A batch of binding facts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeclarationSet {
    pub adapters: Vec<AdapterFact>,
    pub multi_adapters: Vec<MultiAdapterFact>,
    pub renamed: Vec<RenamedFact>,
    pub inverse_adapters: Vec<InverseAdapterFact>,
    pub inverse_methods: Vec<InverseMethodFact>,
    pub conversions: Vec<ConversionFact>,
    pub untaggable: Vec<UntaggableFact>,
}

impl DeclarationSet {
    pub fn from_json(json: &str) -> Result<Self, DeclarationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of facts in the set.
    pub fn len(&self) -> usize {
        self.adapters.len()
            + self.multi_adapters.len()
            + self.renamed.len()
            + self.inverse_adapters.len()
            + self.inverse_methods.len()
            + self.conversions.len()
            + self.untaggable.iter().map(|u| u.types.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register every fact, stopping at the first rejected one.
    /// Register every fact in `registry`.
    ///
    /// Either all facts are registered or, on error, `registry` is left
    /// unchanged.
    #[tracing::instrument(level = "debug", skip_all, fields(facts = self.len()))]
    pub fn apply(&self, registry: &mut BindingRegistry) -> Result<(), DeclarationError> {
        let mut staged = registry.clone();
        self.register_all(&mut staged)?;
        *registry = staged;
        tracing::debug!(registry = registry.len(), "applied declarations");
        Ok(())
    }

    fn register_all(&self, registry: &mut BindingRegistry) -> Result<(), DeclarationError> {
        for fact in &self.adapters {
            registry.register_adapter(
                &fact.attribute,
                &fact.view_type,
                &fact.value_type,
                fact.method.descriptor(),
            )?;
        }
        for fact in &self.multi_adapters {
            let key = MultiValueAdapterKey::new(
                &fact.view_type,
                &fact.attributes,
                &fact.parameter_types,
                fact.require_all,
            )?;
            registry.register_multi_value_adapter(key, fact.method.descriptor())?;
        }
        for fact in &self.renamed {
            registry.register_renamed_method(
                &fact.attribute,
                &fact.declaring_class,
                &fact.method,
                &fact.owner,
            );
        }
        for fact in &self.inverse_adapters {
            let event = event_or_default(fact.event.as_deref(), &fact.attribute);
            registry.register_inverse_adapter(
                &fact.attribute,
                &fact.view_type,
                &fact.value_type,
                InverseDescriptor::new(fact.method.descriptor(), &event),
            )?;
        }
        for fact in &self.inverse_methods {
            let event = event_or_default(fact.event.as_deref(), &fact.attribute);
            let getter = MethodDescriptor::new_instance(&fact.owner, fact.method.as_str());
            registry.register_inverse_method(
                &fact.attribute,
                &fact.declaring_class,
                InverseDescriptor::new(getter, &event),
            )?;
        }
        for fact in &self.conversions {
            registry.register_conversion(&fact.from, &fact.to, fact.method.descriptor())?;
        }
        for fact in &self.untaggable {
            registry.register_untaggable_types(&fact.types, &fact.owner)?;
        }
        Ok(())
    }
}

fn event_or_default(event: Option<&str>, attribute: &str) -> String {
    match event {
        Some(event) if !event.trim().is_empty() => event.to_owned(),
        _ => format!("{attribute}AttrChanged"),
    }
}

fn yes() -> bool {
    true
}
