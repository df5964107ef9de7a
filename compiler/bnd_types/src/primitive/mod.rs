//! Primitive types and their conversion rules.
//!
//! Primitives never participate in subtyping. They reach other types through
//! three mechanisms only:
//!
//! - **Boxing**: `int` ⇄ `java.lang.Integer`
//! - **Implicit widening**: `byte` → `short` → `int` → `long` → `float` → `double`,
//!   ranked by [`Primitive::conversion_level`]
//! - **Registered conversion methods** (handled by the registry, not here)

use std::fmt;

/// A primitive value type.
///
/// Variants are declared in widening order so the derived `Ord` follows
/// the conversion ladder (with `Boolean` first and outside of it).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    /// All primitives in declaration order.
    pub const ALL: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    /// Look up a primitive by its keyword (`int`, `boolean`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Look up the primitive whose box has the given qualified name.
    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed_name() == name)
    }

    /// The source keyword for this primitive.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    /// Qualified name of the boxed counterpart.
    pub fn boxed_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Char => "java.lang.Character",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
        }
    }

    /// Rank on the implicit widening ladder.
    ///
    /// Lower ranks widen to higher ones. `boolean` is not convertible.
    pub fn conversion_level(self) -> Option<u8> {
        match self {
            Primitive::Boolean => None,
            Primitive::Byte => Some(0),
            Primitive::Char => Some(1),
            Primitive::Short => Some(2),
            Primitive::Int => Some(3),
            Primitive::Long => Some(4),
            Primitive::Float => Some(5),
            Primitive::Double => Some(6),
        }
    }

    /// Whether a value of `self` widens implicitly to `to`.
    ///
    /// Nothing widens to `char`, and `boolean` neither widens nor is widened to.
    pub fn widens_to(self, to: Primitive) -> bool {
        if to == Primitive::Char {
            return false;
        }
        match (self.conversion_level(), to.conversion_level()) {
            (Some(from), Some(to)) => from < to,
            _ => false,
        }
    }

    /// Literal used when a parameter of this type must be filled with a default.
    pub fn default_literal(self) -> &'static str {
        match self {
            Primitive::Boolean => "false",
            Primitive::Char => "'\\u0000'",
            Primitive::Long => "0L",
            Primitive::Float => "0f",
            Primitive::Double => "0.0",
            Primitive::Byte | Primitive::Short | Primitive::Int => "0",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
