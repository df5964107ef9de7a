//! Binding-adapter resolution.
//!
//! Given an attribute bound on a view, [`Resolver`] decides which method the
//! generated code calls:
//!
//! - **Setters**: a registered adapter, a renamed or conventional setter on
//!   the view, or (for nested bindings) a dummy call
//! - **Getters**: the inverse side of two-way binding, paired with the
//!   setter that installs its change listener
//! - **Multi-attribute adapters**: adapters consuming several attributes at
//!   once, selected greedily so each attribute is consumed at most once
//!
//! Resolution answers with call descriptors ([`SetterCall`], [`GetterCall`],
//! [`MultiAttributeSetter`]) that render themselves as Java expressions.

mod call;
mod config;
mod error;
mod rank;
mod resolver;

pub use call::{
    EventSetter, GetterCall, MultiAttributeSetter, SetterCall, SlotBinding, SlotMatch,
    ValueAdaptation,
};
pub use config::ResolverConfig;
pub use error::{EmitError, ResolveError};
pub use rank::{compare_multi_setters, find_conversion, is_better_parameter};
pub use resolver::Resolver;
