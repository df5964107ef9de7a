use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const TEXT_VIEW: &str = "android.widget.TextView";
const IMAGE_VIEW: &str = "android.widget.ImageView";
const BINDINGS: &str = "com.example.Bindings";
const OTHER: &str = "com.example.Other";

fn adapter(declaring: &str, method: &str) -> MethodDescriptor {
    MethodDescriptor::new_static(declaring, method)
}

fn sample() -> BindingRegistry {
    let mut registry = BindingRegistry::new();
    registry
        .register_adapter("app:imageUrl", IMAGE_VIEW, "java.lang.String", adapter(BINDINGS, "setImageUrl"))
        .unwrap();
    registry
        .register_adapter("android:text", TEXT_VIEW, "int", adapter(OTHER, "setTextRes"))
        .unwrap();
    registry.register_renamed_method("android:tint", IMAGE_VIEW, "setImageTintList", BINDINGS);
    registry
        .register_conversion("int", "android.graphics.drawable.Drawable", adapter(OTHER, "convertColor"))
        .unwrap();
    registry
        .register_inverse_method(
            "android:rating",
            "android.widget.RatingBar",
            InverseDescriptor::new(MethodDescriptor::new_instance(BINDINGS, "getRating"), "android:ratingAttrChanged"),
        )
        .unwrap();
    registry
        .register_untaggable_types(["android.view.ViewStub"], BINDINGS)
        .unwrap();
    registry
}

#[test]
fn adapters_are_keyed_by_normalized_attribute() {
    let registry = sample();
    let found: Vec<_> = registry.adapters(&AttributeName::new("imageUrl")).collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, &AccessorKey::new(IMAGE_VIEW, "java.lang.String"));
    assert_eq!(found[0].1.to_string(), "com.example.Bindings.setImageUrl");

    assert_eq!(registry.adapters(&AttributeName::new("text")).count(), 0);
    assert_eq!(registry.adapters(&AttributeName::new("android:text")).count(), 1);
}

#[test]
fn generic_arguments_are_erased_in_keys() {
    let mut registry = BindingRegistry::new();
    registry
        .register_adapter("items", "com.example.ListView<T>", "java.util.List<T>", adapter(BINDINGS, "setItems"))
        .unwrap();
    let (key, _) = registry
        .adapters(&AttributeName::new("items"))
        .next()
        .unwrap();
    assert_eq!(key, &AccessorKey::new("com.example.ListView", "java.util.List"));
}

#[test]
fn identical_registration_is_idempotent() {
    let mut registry = sample();
    let before = registry.len();
    registry
        .register_adapter("imageUrl", IMAGE_VIEW, "java.lang.String", adapter(BINDINGS, "setImageUrl"))
        .unwrap();
    assert_eq!(registry.len(), before);
}

#[test]
fn conflicting_registration_is_rejected() {
    let mut registry = sample();
    let err = registry
        .register_adapter("imageUrl", IMAGE_VIEW, "java.lang.String", adapter(OTHER, "loadUrl"))
        .unwrap_err();
    match err {
        RegistryError::DuplicateRegistration {
            table,
            existing,
            rejected,
            ..
        } => {
            assert_eq!(table, Table::Adapter);
            assert_eq!(existing, "com.example.Bindings.setImageUrl");
            assert_eq!(rejected, "com.example.Other.loadUrl");
        }
        other => panic!("unexpected error: {other}"),
    }
    // The original fact survives.
    let (_, kept) = registry
        .adapters(&AttributeName::new("imageUrl"))
        .next()
        .unwrap();
    assert_eq!(kept.method, "setImageUrl");
}

#[test]
fn renamed_methods_overwrite() {
    let mut registry = sample();
    registry.register_renamed_method("android:tint", IMAGE_VIEW, "setColorFilter", OTHER);
    let renamed: Vec<_> = registry
        .renamed_methods(&AttributeName::new("android:tint"))
        .collect();
    assert_eq!(renamed.len(), 1);
    assert_eq!(renamed[0].0, IMAGE_VIEW);
    assert_eq!(renamed[0].1.method, "setColorFilter");
    assert_eq!(renamed[0].1.declaring_type, OTHER);
}

#[test]
fn two_way_event_attributes_are_recognized() {
    let registry = sample();
    assert!(registry.is_two_way_event_attribute("android:ratingAttrChanged"));
    assert!(!registry.is_two_way_event_attribute("ratingAttrChanged"));
    assert!(!registry.is_two_way_event_attribute("android:rating"));
}

#[test]
fn untaggable_types_remember_their_owner() {
    let registry = sample();
    assert!(registry.is_untaggable("android.view.ViewStub"));
    assert_eq!(registry.untaggable_owner("android.view.ViewStub"), Some(BINDINGS));
    assert!(!registry.is_untaggable(TEXT_VIEW));
}

#[test]
fn untaggable_conflict_registers_nothing() {
    let mut registry = BindingRegistry::new();
    registry
        .register_untaggable_types(["android.view.Merge"], OTHER)
        .unwrap();

    let err = registry
        .register_untaggable_types(["android.view.ViewStub", "android.view.Merge"], BINDINGS)
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::DuplicateRegistration {
            table: Table::Untaggable,
            ..
        }
    ));
    assert!(!registry.is_untaggable("android.view.ViewStub"));
    assert_eq!(registry.untaggable_owner("android.view.Merge"), Some(OTHER));

    // Repeating a name already owned by the same class is fine.
    registry
        .register_untaggable_types(["android.view.Merge", "android.view.ViewStub"], OTHER)
        .unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn listing_walks_every_table() {
    let registry = sample();
    let adapters: Vec<_> = registry
        .all_adapters()
        .map(|(attribute, _, d)| format!("{attribute} {d}"))
        .collect();
    assert_eq!(
        adapters,
        vec![
            "android:text com.example.Other.setTextRes",
            "imageUrl com.example.Bindings.setImageUrl",
        ]
    );
    let renamed: Vec<_> = registry.all_renamed_methods().map(|(_, class, _)| class).collect();
    assert_eq!(renamed, vec![IMAGE_VIEW]);
    assert_eq!(registry.all_inverse_adapters().count(), 0);
    assert_eq!(registry.all_inverse_methods().count(), 1);
    assert_eq!(
        registry.untaggable_types().collect::<Vec<_>>(),
        vec![("android.view.ViewStub", BINDINGS)]
    );
}

#[test]
fn clearing_a_class_drops_only_its_facts() {
    let mut registry = sample();
    assert_eq!(registry.len(), 6);

    let removed = registry.clear_facts_for_classes(&[BINDINGS]);
    assert_eq!(removed, 4);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.adapters(&AttributeName::new("imageUrl")).count(), 0);
    assert_eq!(registry.adapters(&AttributeName::new("android:text")).count(), 1);
    assert!(!registry.is_untaggable("android.view.ViewStub"));
    assert_eq!(registry.conversions().count(), 1);

    assert_eq!(registry.clear_facts_for_classes(&[BINDINGS]), 0);
}

#[test]
fn clearing_prunes_empty_tables() {
    let mut registry = sample();
    registry.clear_facts_for_classes(&[BINDINGS, OTHER]);
    assert!(registry.is_empty());
    assert_eq!(registry, BindingRegistry::new());
}

#[test]
fn merge_keeps_existing_facts() {
    let mut local = BindingRegistry::new();
    local
        .register_adapter("imageUrl", IMAGE_VIEW, "java.lang.String", adapter(OTHER, "loadUrl"))
        .unwrap();
    local.merge(sample());

    let (_, kept) = local
        .adapters(&AttributeName::new("imageUrl"))
        .next()
        .unwrap();
    assert_eq!(kept.declaring_type, OTHER);
    assert_eq!(local.len(), 6);
}

#[test]
fn earlier_upstream_wins() {
    let mut first = BindingRegistry::new();
    first
        .register_conversion("int", "java.lang.String", adapter(BINDINGS, "first"))
        .unwrap();
    let mut second = BindingRegistry::new();
    second
        .register_conversion("int", "java.lang.String", adapter(BINDINGS, "second"))
        .unwrap();

    let merged = BindingRegistry::with_upstream([first, second]);
    let conversions: Vec<_> = merged.conversions().collect();
    assert_eq!(conversions.len(), 1);
    assert_eq!(conversions[0].2.method, "first");
}

#[test]
fn multi_value_adapters_are_ordered_by_key() {
    let mut registry = BindingRegistry::new();
    let b = MultiValueAdapterKey::new(TEXT_VIEW, ["b"], ["int"], true).unwrap();
    let a = MultiValueAdapterKey::new(TEXT_VIEW, ["a", "c"], ["int", "int"], false).unwrap();
    registry
        .register_multi_value_adapter(b.clone(), adapter(BINDINGS, "setB"))
        .unwrap();
    registry
        .register_multi_value_adapter(a.clone(), adapter(BINDINGS, "setAC"))
        .unwrap();

    let keys: Vec<_> = registry.multi_value_adapters().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![a, b]);
}

proptest! {
    /// Whatever order facts arrive in, the first descriptor per key is kept
    /// and every later conflicting one is rejected.
    #[test]
    fn first_registration_wins(
        facts in prop::collection::vec((0..4usize, 0..3usize, 0..3usize), 1..32)
    ) {
        let views = ["a.V0", "a.V1", "a.V2", "a.V3"];
        let methods = ["m0", "m1", "m2"];
        let mut registry = BindingRegistry::new();
        let mut first = std::collections::BTreeMap::new();

        for (view, value, method) in facts {
            let key = (view, value);
            let descriptor = adapter(BINDINGS, methods[method]);
            let result = registry.register_adapter(
                "attr",
                views[view],
                views[value],
                descriptor.clone(),
            );
            let expected = first.entry(key).or_insert(descriptor.clone());
            prop_assert_eq!(result.is_ok(), *expected == descriptor);
        }

        prop_assert_eq!(registry.len(), first.len());
        for ((view, value), descriptor) in &first {
            let key = AccessorKey::new(views[*view], views[*value]);
            let stored = registry
                .adapters(&AttributeName::new("attr"))
                .find(|(k, _)| **k == key)
                .map(|(_, d)| d.clone());
            prop_assert_eq!(stored.as_ref(), Some(descriptor));
        }
    }
}
