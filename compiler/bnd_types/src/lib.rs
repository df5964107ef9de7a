//! Type model for binding-adapter resolution.
//!
//! The resolver reasons about view and value types through three pieces:
//!
//! - [`TypeRef`]: a type named by its qualified name, possibly generic
//! - [`Primitive`]: the primitive value types and their boxing/widening rules
//! - [`TypeUniverse`]: the injected capability answering assignability and
//!   method-lookup questions
//!
//! [`ClassGraph`] is a small in-memory universe for callers without a real
//! class model (tests, the command-line driver).

mod graph;
mod primitive;
mod ty;
mod universe;

pub use graph::{ClassDecl, ClassGraph, GraphError, MethodDecl, BINDER_BASE, INVERSE_LISTENER};
pub use primitive::Primitive;
pub use ty::{simple_name, TypeKind, TypeParseError, TypeRef, OBJECT, STRING};
pub use universe::{is_boxing_conversion, is_implicit_conversion, MethodSig, TypeUniverse};
