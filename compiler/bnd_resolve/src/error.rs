use bnd_registry::AttributeName;

/// Resolution found nothing applicable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot find a setter for `{attribute}` that accepts the value on `{view_type}`")]
    NoSetterFound {
        attribute: AttributeName,
        view_type: String,
    },

    #[error("cannot find a getter for two-way binding of `{attribute}` on `{view_type}`")]
    NoGetterFound {
        attribute: AttributeName,
        view_type: String,
    },

    /// A getter matched but the setter for its change event did not
    /// resolve to exactly one call.
    #[error("could not find event `{event}` on view type `{view_type}`")]
    InverseEventNotFound {
        event: AttributeName,
        view_type: String,
    },
}

/// A call descriptor could not be rendered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("call expects {expected} value expressions, got {found}")]
    ValueCount { expected: usize, found: usize },

    #[error("`{method}` is called through the binding component, but no component expression was given")]
    MissingComponent { method: String },
}
