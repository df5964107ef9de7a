//! Type references.
//!
//! A `TypeRef` names a class or primitive by its fully-qualified name,
//! optionally applied to generic type arguments. It carries no semantic
//! information beyond its shape: assignability and method lookup belong to
//! the [`TypeUniverse`](crate::TypeUniverse).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::Primitive;

/// Qualified name of the root reference type.
pub const OBJECT: &str = "java.lang.Object";

/// Qualified name of the string type.
pub const STRING: &str = "java.lang.String";

/// Classification of a type reference.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum TypeKind {
    /// A primitive value type.
    Primitive(Primitive),
    /// The `void` pseudo-type (method returns only).
    Void,
    /// An array of the contained component type.
    Array(Box<TypeRef>),
    /// A class or interface.
    Reference,
}

/// A reference to a type by qualified name.
///
/// Two references are equal iff their qualified names match, including
/// type arguments: `java.util.List<java.lang.String>` differs from the raw
/// `java.util.List`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TypeRef {
    /// Erased qualified name (`java.util.List`, `int`, `int[]`).
    name: String,
    kind: TypeKind,
    args: Vec<TypeRef>,
}

/// Failure to parse a type name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    #[error("empty type name")]
    Empty,
    #[error("unbalanced `<` or `>` in `{0}`")]
    Unbalanced(String),
    #[error("unexpected trailing input `{rest}` in `{input}`")]
    Trailing { input: String, rest: String },
    #[error("primitive `{0}` cannot take type arguments")]
    PrimitiveWithArgs(String),
}

impl TypeRef {
    /// Reference a type by name, classifying primitives and `void`.
    ///
    /// The name is taken verbatim; use [`TypeRef::parse`] for names that
    /// may carry type arguments or array suffixes.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = if name == "void" {
            TypeKind::Void
        } else if let Some(p) = Primitive::from_name(&name) {
            TypeKind::Primitive(p)
        } else {
            TypeKind::Reference
        };
        TypeRef {
            name,
            kind,
            args: Vec::new(),
        }
    }

    /// A primitive type.
    pub fn primitive(p: Primitive) -> Self {
        TypeRef {
            name: p.name().to_owned(),
            kind: TypeKind::Primitive(p),
            args: Vec::new(),
        }
    }

    /// `java.lang.Object`.
    pub fn object() -> Self {
        Self::named(OBJECT)
    }

    /// `java.lang.String`.
    pub fn string() -> Self {
        Self::named(STRING)
    }

    /// `void`.
    pub fn void() -> Self {
        Self::named("void")
    }

    /// A generic class applied to type arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        let mut ty = Self::named(name);
        ty.args = args;
        ty
    }

    /// An array of `component`.
    pub fn array_of(component: TypeRef) -> Self {
        TypeRef {
            name: format!("{}[]", component.qualified_name()),
            kind: TypeKind::Array(Box::new(component)),
            args: Vec::new(),
        }
    }

    /// Parse a source-style type name such as `java.util.Map<K, V>[]`.
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let mut parser = Parser { input, pos: 0 };
        let ty = parser.ty()?;
        parser.skip_ws();
        if parser.pos < input.len() {
            let rest = &input[parser.pos..];
            if rest.starts_with('>') {
                return Err(TypeParseError::Unbalanced(input.to_owned()));
            }
            return Err(TypeParseError::Trailing {
                input: input.to_owned(),
                rest: rest.to_owned(),
            });
        }
        Ok(ty)
    }

    // === Accessors ===

    /// The erased name, without type arguments.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Generic type arguments (empty for raw and non-generic types).
    #[inline]
    pub fn type_args(&self) -> &[TypeRef] {
        &self.args
    }

    /// The full name including type arguments.
    pub fn qualified_name(&self) -> String {
        self.to_string()
    }

    /// The name after the last package separator (`android.widget.TextView` → `TextView`).
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    // === Classification ===

    #[inline]
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self.kind {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn array_component(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Array(component) => Some(component),
            _ => None,
        }
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    /// Whether this is exactly `java.lang.Object`.
    #[inline]
    pub fn is_object(&self) -> bool {
        self.name == OBJECT && self.args.is_empty()
    }

    /// Whether the type has type arguments applied.
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Whether a value of this type may be `null`.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, TypeKind::Reference | TypeKind::Array(_))
    }

    // === Derived types ===

    /// Strip generic type arguments (recursively through array components).
    pub fn erasure(&self) -> TypeRef {
        match &self.kind {
            TypeKind::Array(component) if component.is_generic() || component.is_array() => {
                TypeRef::array_of(component.erasure())
            }
            _ if self.is_generic() => TypeRef {
                name: self.name.clone(),
                kind: self.kind.clone(),
                args: Vec::new(),
            },
            _ => self.clone(),
        }
    }

    /// The boxed form of a primitive; any other type is returned as is.
    pub fn boxed(&self) -> TypeRef {
        match self.as_primitive() {
            Some(p) => TypeRef::named(p.boxed_name()),
            None => self.clone(),
        }
    }

    /// The primitive this type boxes, if it is a primitive wrapper.
    pub fn unboxed(&self) -> Option<Primitive> {
        if self.is_generic() {
            return None;
        }
        Primitive::from_boxed_name(&self.name)
    }

    /// Literal used to fill an unsupplied parameter of this type.
    pub fn default_literal(&self) -> &'static str {
        match self.as_primitive() {
            Some(p) => p.default_literal(),
            None => "null",
        }
    }
}

/// The name after the last package separator.
pub fn simple_name(qualified: &str) -> &str {
    let erased = qualified.split('<').next().unwrap_or(qualified);
    erased.rsplit('.').next().unwrap_or(erased)
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.args.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Recursive-descent parser over a type name.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, s: &str) -> bool {
        self.skip_ws();
        if self.input[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> &str {
        self.skip_ws();
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '.' | '_' | '$' | '?')))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn ty(&mut self) -> Result<TypeRef, TypeParseError> {
        let name = self.ident().to_owned();
        if name.is_empty() {
            return Err(if self.input.trim().is_empty() {
                TypeParseError::Empty
            } else {
                TypeParseError::Unbalanced(self.input.to_owned())
            });
        }

        // Bounded wildcards erase to their bound.
        if name == "?" && self.eat("extends") {
            return self.ty();
        }

        let mut args = Vec::new();
        if self.eat("<") {
            loop {
                args.push(self.ty()?);
                if self.eat(",") {
                    continue;
                }
                if self.eat(">") {
                    break;
                }
                return Err(TypeParseError::Unbalanced(self.input.to_owned()));
            }
        }

        let mut ty = TypeRef::generic(name, args);
        if ty.is_generic() && (ty.is_primitive() || ty.is_void()) {
            return Err(TypeParseError::PrimitiveWithArgs(ty.name));
        }
        while self.eat("[]") {
            ty = TypeRef::array_of(ty);
        }
        Ok(ty)
    }
}
