//! The type-universe capability.
//!
//! The resolver never inspects classes itself. Everything it needs to know
//! about the class hierarchy (assignability, declared methods, which type
//! is the generated binder) is asked of a `TypeUniverse`. Production
//! callers back it with their compiler's element model; tests and the CLI
//! use the in-memory [`ClassGraph`](crate::ClassGraph).

use crate::{Primitive, TypeRef};

/// A method visible on some type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MethodSig {
    /// The class that declares the method (may be a supertype of the queried type).
    pub declaring_type: TypeRef,
    pub name: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub is_static: bool,
    /// Minimum platform API level the method requires.
    pub min_api: u32,
}

impl MethodSig {
    #[inline]
    pub fn is_void(&self) -> bool {
        self.return_type.is_void()
    }
}

/// Injected type-system queries.
///
/// The provided methods implement the standard primitive rules and only
/// need overriding for universes with unusual boxing or widening.
pub trait TypeUniverse {
    /// Resolve a qualified type name. `None` means the name is unknown.
    fn find_type(&self, name: &str) -> Option<TypeRef>;

    /// Whether a value of type `source` can be assigned to `target` without
    /// boxing, widening, or conversion.
    fn is_assignable_from(&self, target: &TypeRef, source: &TypeRef) -> bool;

    /// Public methods named `name` with exactly `arity` parameters, declared
    /// on `owner` or inherited by it. Overridden methods appear once.
    fn methods(&self, owner: &TypeRef, name: &str, arity: usize) -> Vec<MethodSig>;

    /// Whether `ty` is (a subclass of) the generated binder base type.
    fn is_binder_type(&self, ty: &TypeRef) -> bool;

    /// Strip generic arguments.
    fn erase(&self, ty: &TypeRef) -> TypeRef {
        ty.erasure()
    }

    /// Exactly one side is primitive and both share the same box.
    fn is_boxing_conversion(&self, a: &TypeRef, b: &TypeRef) -> bool {
        is_boxing_conversion(a, b)
    }

    /// Rank of `ty` on the primitive widening ladder.
    fn implicit_conversion_level(&self, ty: &TypeRef) -> Option<u8> {
        ty.as_primitive().and_then(Primitive::conversion_level)
    }

    /// Whether `from` widens implicitly to `to`.
    fn is_implicit_conversion(&self, from: &TypeRef, to: &TypeRef) -> bool {
        is_implicit_conversion(from, to)
    }
}

/// Exactly one side is primitive and both share the same box.
pub fn is_boxing_conversion(a: &TypeRef, b: &TypeRef) -> bool {
    a.is_primitive() != b.is_primitive() && a.boxed() == b.boxed()
}

/// Primitive widening from `from` to `to`.
pub fn is_implicit_conversion(from: &TypeRef, to: &TypeRef) -> bool {
    match (from.as_primitive(), to.as_primitive()) {
        (Some(from), Some(to)) => from.widens_to(to),
        _ => false,
    }
}
