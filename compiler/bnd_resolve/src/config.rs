//! Resolver configuration.

use bnd_types::{BINDER_BASE, INVERSE_LISTENER};

/// Names and defaults the resolver does not discover from the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Type of the listener argument passed to inverse-binding event setters.
    pub listener_type: String,
    /// Base class of generated binders; views of this type get dummy setters
    /// and binder getters.
    pub binder_type: String,
    /// API level reported for calls that carry no level of their own.
    pub default_min_api: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            listener_type: INVERSE_LISTENER.to_owned(),
            binder_type: BINDER_BASE.to_owned(),
            default_min_api: 1,
        }
    }
}
