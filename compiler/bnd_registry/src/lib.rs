//! Binding-adapter registry.
//!
//! Holds the facts a binding compiler knows about how layout attributes map
//! onto code: user-declared adapters (single and multi-attribute), renamed
//! setters, value conversions, inverse (two-way) getters, and untaggable
//! view types.
//!
//! Facts enter through [`DeclarationSet`] or the `register_*` methods, and
//! leave a module as a [`RegistrySnapshot`] that downstream modules merge.

mod attribute;
mod declarations;
mod descriptor;
mod error;
mod registry;
mod snapshot;

pub use attribute::{capitalize, getter_names, AttributeName, FRAMEWORK_NAMESPACE};
pub use declarations::{
    AdapterFact, ConversionFact, DeclarationSet, InverseAdapterFact, InverseMethodFact,
    MethodFact, MultiAdapterFact, RenamedFact, UntaggableFact,
};
pub use descriptor::{
    erased_name, AccessorKey, InverseDescriptor, MethodDescriptor, MultiValueAdapterKey,
};
pub use error::{DeclarationError, RegistryError, SnapshotError, Table};
pub use registry::BindingRegistry;
pub use snapshot::{RegistrySnapshot, FORMAT_VERSION, MAGIC};
