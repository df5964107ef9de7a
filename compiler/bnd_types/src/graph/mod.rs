//! In-memory type universe.
//!
//! `ClassGraph` holds a fixed set of class declarations and answers
//! [`TypeUniverse`] queries by walking declared supertypes. It is seeded
//! with the handful of `java.lang` and binding-runtime types the resolver
//! relies on, so callers only declare their own view and adapter classes.
//!
//! # JSON form
//!
//! ```text
//! {
//!   "classes": [
//!     {
//!       "name": "android.widget.TextView",
//!       "superclass": "android.view.View",
//!       "methods": [
//!         { "name": "setText", "params": ["java.lang.CharSequence"] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ty::OBJECT;
use crate::{MethodSig, TypeKind, TypeRef, TypeUniverse};

/// Base class of every generated binding class.
pub const BINDER_BASE: &str = "androidx.databinding.ViewDataBinding";

/// Listener type passed to the event setter of a two-way binding.
pub const INVERSE_LISTENER: &str = "androidx.databinding.InverseBindingListener";

/// A declared class or interface.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClassDecl {
    pub name: String,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Generic parameter names; occurrences in method signatures erase to `Object`.
    pub type_params: Vec<String>,
    pub methods: Vec<MethodDecl>,
    /// Marks the generated-binder base type.
    pub binder: bool,
}

/// A declared method. Types are given as source-style names.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "void_name")]
    pub returns: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default = "default_min_api")]
    pub min_api: u32,
}

fn void_name() -> String {
    "void".to_owned()
}

fn default_min_api() -> u32 {
    1
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDecl {
            name: name.into(),
            ..ClassDecl::default()
        }
    }

    #[must_use]
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn binder(mut self) -> Self {
        self.binder = true;
        self
    }
}

impl MethodDecl {
    /// A `void` instance method taking one parameter.
    pub fn setter(name: impl Into<String>, param: impl Into<String>) -> Self {
        MethodDecl {
            name: name.into(),
            params: vec![param.into()],
            returns: void_name(),
            is_static: false,
            min_api: default_min_api(),
        }
    }

    /// A zero-argument instance method returning `returns`.
    pub fn getter(name: impl Into<String>, returns: impl Into<String>) -> Self {
        MethodDecl {
            name: name.into(),
            params: Vec::new(),
            returns: returns.into(),
            is_static: false,
            min_api: default_min_api(),
        }
    }

    #[must_use]
    pub fn since_api(mut self, min_api: u32) -> Self {
        self.min_api = min_api;
        self
    }

    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Failure to load a class graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("malformed class graph: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(serde::Deserialize)]
struct GraphFile {
    #[serde(default)]
    classes: Vec<ClassDecl>,
}

/// A closed, in-memory class hierarchy.
#[derive(Clone, Debug)]
pub struct ClassGraph {
    classes: FxHashMap<String, ClassDecl>,
}

impl Default for ClassGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassGraph {
    /// A graph holding only the well-known runtime types.
    pub fn new() -> Self {
        let mut graph = ClassGraph {
            classes: FxHashMap::default(),
        };
        graph
            .declare(ClassDecl::new(OBJECT))
            .declare(ClassDecl::new("java.lang.CharSequence"))
            .declare(
                ClassDecl::new("java.lang.String")
                    .extends(OBJECT)
                    .implements("java.lang.CharSequence"),
            )
            .declare(ClassDecl::new("java.lang.Number").extends(OBJECT))
            .declare(ClassDecl::new(BINDER_BASE).extends(OBJECT).binder())
            .declare(ClassDecl::new(INVERSE_LISTENER));
        for p in crate::Primitive::ALL {
            let parent = match p {
                crate::Primitive::Boolean | crate::Primitive::Char => OBJECT,
                _ => "java.lang.Number",
            };
            graph.declare(ClassDecl::new(p.boxed_name()).extends(parent));
        }
        graph
    }

    /// Parse a JSON class list on top of the well-known types.
    pub fn from_json(src: &str) -> Result<Self, GraphError> {
        let file: GraphFile = serde_json::from_str(src)?;
        let mut graph = ClassGraph::new();
        for decl in file.classes {
            graph.declare(decl);
        }
        Ok(graph)
    }

    /// Add or replace a class declaration.
    pub fn declare(&mut self, decl: ClassDecl) -> &mut Self {
        self.classes.insert(decl.name.clone(), decl);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The class and all of its declared supertypes, nearest first.
    ///
    /// Unknown supertypes end their branch of the walk.
    fn lineage(&self, name: &str) -> Vec<&ClassDecl> {
        let mut visited = FxHashSet::default();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(name);

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name) {
                continue;
            }
            let Some(decl) = self.classes.get(name) else {
                tracing::debug!(class = name, "supertype not declared in class graph");
                continue;
            };
            result.push(decl);
            queue.extend(decl.superclass.as_deref());
            queue.extend(decl.interfaces.iter().map(String::as_str));
        }

        result
    }

    fn signature(decl: &ClassDecl, method: &MethodDecl) -> Option<MethodSig> {
        let resolve = |name: &str| match TypeRef::parse(name) {
            Ok(ty) if decl.type_params.iter().any(|p| p == ty.name()) => Some(TypeRef::object()),
            Ok(ty) => Some(ty),
            Err(error) => {
                tracing::debug!(class = %decl.name, method = %method.name, %error, "bad type in signature");
                None
            }
        };
        let params = method
            .params
            .iter()
            .map(|p| resolve(p.as_str()))
            .collect::<Option<Vec<_>>>()?;
        Some(MethodSig {
            declaring_type: TypeRef::named(decl.name.clone()),
            name: method.name.clone(),
            params,
            return_type: resolve(method.returns.as_str())?,
            is_static: method.is_static,
            min_api: method.min_api,
        })
    }
}

impl TypeUniverse for ClassGraph {
    fn find_type(&self, name: &str) -> Option<TypeRef> {
        let ty = match TypeRef::parse(name) {
            Ok(ty) => ty,
            Err(error) => {
                tracing::debug!(name, %error, "unparsable type name");
                return None;
            }
        };
        let mut base = &ty;
        while let Some(component) = base.array_component() {
            base = component;
        }
        match base.kind() {
            TypeKind::Reference if !self.classes.contains_key(base.name()) => None,
            _ => Some(ty),
        }
    }

    fn is_assignable_from(&self, target: &TypeRef, source: &TypeRef) -> bool {
        let (target, source) = (target.erasure(), source.erasure());
        if target == source {
            return true;
        }
        match (target.kind(), source.kind()) {
            (TypeKind::Primitive(_) | TypeKind::Void, _)
            | (_, TypeKind::Primitive(_) | TypeKind::Void) => false,
            _ if target.is_object() => true,
            (TypeKind::Array(t), TypeKind::Array(s)) => {
                !t.is_primitive() && !s.is_primitive() && self.is_assignable_from(t, s)
            }
            (TypeKind::Array(_), _) | (_, TypeKind::Array(_)) => false,
            (TypeKind::Reference, TypeKind::Reference) => self
                .lineage(source.name())
                .iter()
                .any(|decl| decl.name == target.name()),
        }
    }

    fn methods(&self, owner: &TypeRef, name: &str, arity: usize) -> Vec<MethodSig> {
        let mut found: Vec<MethodSig> = Vec::new();
        for decl in self.lineage(owner.erasure().name()) {
            for method in &decl.methods {
                if method.name != name || method.params.len() != arity {
                    continue;
                }
                let Some(sig) = Self::signature(decl, method) else {
                    continue;
                };
                // Nearest declaration wins over the overridden one.
                if found.iter().any(|seen| seen.params == sig.params) {
                    continue;
                }
                found.push(sig);
            }
        }
        found
    }

    fn is_binder_type(&self, ty: &TypeRef) -> bool {
        self.classes
            .values()
            .filter(|decl| decl.binder)
            .any(|decl| self.is_assignable_from(&TypeRef::named(decl.name.clone()), ty))
    }
}
