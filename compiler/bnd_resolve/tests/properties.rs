//! Property tests for resolution invariants.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::collections::BTreeSet;

use bnd_registry::{BindingRegistry, MethodDescriptor, MultiValueAdapterKey};
use bnd_resolve::Resolver;
use bnd_types::{ClassDecl, ClassGraph, Primitive, TypeRef, OBJECT};
use proptest::prelude::*;

const VIEW: &str = "android.view.View";
const TEXT_VIEW: &str = "android.widget.TextView";
const ATTRIBUTES: [&str; 5] = ["a", "b", "c", "d", "e"];

fn universe() -> ClassGraph {
    let mut graph = ClassGraph::new();
    graph
        .declare(ClassDecl::new(VIEW).extends(OBJECT))
        .declare(ClassDecl::new(TEXT_VIEW).extends(VIEW));
    graph
}

/// A multi-attribute adapter: attribute subset, view, and `require_all`.
fn adapter_strategy() -> impl Strategy<Value = (BTreeSet<usize>, bool, bool)> {
    (
        prop::collection::btree_set(0..ATTRIBUTES.len(), 1..=3),
        any::<bool>(),
        any::<bool>(),
    )
}

fn build_registry(adapters: &[(BTreeSet<usize>, bool, bool)]) -> BindingRegistry {
    let mut registry = BindingRegistry::new();
    for (i, (attributes, on_text_view, require_all)) in adapters.iter().enumerate() {
        let names: Vec<&str> = attributes.iter().map(|&a| ATTRIBUTES[a]).collect();
        let view = if *on_text_view { TEXT_VIEW } else { VIEW };
        let key =
            MultiValueAdapterKey::new(view, &names, vec!["int"; names.len()], *require_all).unwrap();
        // Identical keys may be generated twice; the first registration stands.
        let _ = registry.register_multi_value_adapter(
            key,
            MethodDescriptor::new_static("Bindings", format!("set{i}")),
        );
    }
    registry
}

proptest! {
    #[test]
    fn no_attribute_is_consumed_twice(
        adapters in prop::collection::vec(adapter_strategy(), 0..8),
        supplied in prop::collection::btree_set(0..ATTRIBUTES.len(), 1..=ATTRIBUTES.len()),
    ) {
        let universe = universe();
        let registry = build_registry(&adapters);
        let resolver = Resolver::new(&registry, &universe);

        let attributes: Vec<&str> = supplied.iter().map(|&a| ATTRIBUTES[a]).collect();
        let values = vec![TypeRef::primitive(Primitive::Int); attributes.len()];
        let setters = resolver.resolve_multi_attribute_setters(
            &attributes,
            &TypeRef::named(TEXT_VIEW),
            &values,
        );

        let mut consumed = BTreeSet::new();
        for setter in &setters {
            for attribute in setter.attributes() {
                prop_assert!(
                    consumed.insert(attribute.as_str().to_owned()),
                    "attribute `{}` consumed twice",
                    attribute
                );
                prop_assert!(attributes.contains(&attribute.as_str()));
            }
        }
    }

    #[test]
    fn require_all_adapters_only_apply_when_complete(
        adapters in prop::collection::vec(adapter_strategy(), 1..8),
        supplied in prop::collection::btree_set(0..ATTRIBUTES.len(), 1..=ATTRIBUTES.len()),
    ) {
        let universe = universe();
        let registry = build_registry(&adapters);
        let resolver = Resolver::new(&registry, &universe);

        let attributes: Vec<&str> = supplied.iter().map(|&a| ATTRIBUTES[a]).collect();
        let values = vec![TypeRef::primitive(Primitive::Int); attributes.len()];
        let setters = resolver.resolve_multi_attribute_setters(
            &attributes,
            &TypeRef::named(TEXT_VIEW),
            &values,
        );

        for setter in setters.iter().filter(|s| s.key.require_all) {
            for declared in &setter.key.attributes {
                prop_assert!(attributes.contains(&declared.as_str()));
            }
        }
    }

    #[test]
    fn exact_adapter_always_wins(
        value in prop::sample::select(vec!["int", "long", "float", "java.lang.Integer", "java.lang.Object"]),
    ) {
        let universe = universe();
        let mut registry = BindingRegistry::new();
        for candidate in ["int", "long", "float", "java.lang.Integer", "java.lang.Object"] {
            registry
                .register_adapter(
                    "app:level",
                    TEXT_VIEW,
                    candidate,
                    MethodDescriptor::new_static("Bindings", format!("set_{}", candidate.replace('.', "_"))),
                )
                .unwrap();
        }
        let resolver = Resolver::new(&registry, &universe);

        let call = resolver
            .resolve_setter("app:level", Some(&TypeRef::named(TEXT_VIEW)), &TypeRef::parse(value).unwrap())
            .unwrap();
        prop_assert_eq!(call.method_name(), format!("set_{}", value.replace('.', "_")));
    }
}
