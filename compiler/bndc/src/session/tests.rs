use std::fs;

use super::*;
use bnd_registry::{AttributeName, MethodDescriptor};
use pretty_assertions::assert_eq;

const FACTS: &str = r#"{
    "adapters": [
        { "attribute": "app:imageUrl", "view_type": "android.widget.ImageView",
          "value_type": "java.lang.String", "declaring_type": "com.example.Bindings",
          "method": "setImageUrl" }
    ]
}"#;

#[test]
fn registry_merges_upstream_then_facts() {
    let dir = tempfile::tempdir().unwrap();
    let facts = dir.path().join("facts.json");
    fs::write(&facts, FACTS).unwrap();

    let mut upstream = BindingRegistry::new();
    upstream
        .register_adapter(
            "app:tint",
            "android.widget.ImageView",
            "int",
            MethodDescriptor::new_static("com.lib.Tint", "setTint"),
        )
        .unwrap();
    let snapshot = dir.path().join("lib.bnd");
    RegistrySnapshot::from_registry(&upstream)
        .unwrap()
        .write(&snapshot)
        .unwrap();

    let registry = load_registry(&RegistrySources {
        upstream: &[snapshot],
        stale_classes: &[],
        facts: &[facts],
    })
    .unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.adapters(&AttributeName::new("tint")).count(), 1);
}

#[test]
fn stale_classes_are_cleared_before_facts_apply() {
    let dir = tempfile::tempdir().unwrap();
    let mut upstream = BindingRegistry::new();
    upstream
        .register_adapter(
            "app:imageUrl",
            "android.widget.ImageView",
            "java.lang.String",
            MethodDescriptor::new_static("com.example.Bindings", "loadImage"),
        )
        .unwrap();
    let snapshot = dir.path().join("previous.bnd");
    RegistrySnapshot::from_registry(&upstream)
        .unwrap()
        .write(&snapshot)
        .unwrap();
    let facts = dir.path().join("facts.json");
    fs::write(&facts, FACTS).unwrap();

    // Without clearing, the changed adapter conflicts with its old version.
    let conflict = load_registry(&RegistrySources {
        upstream: &[snapshot.clone()],
        stale_classes: &[],
        facts: &[facts.clone()],
    });
    assert!(matches!(conflict, Err(CliError::Declarations { .. })));

    let registry = load_registry(&RegistrySources {
        upstream: &[snapshot],
        stale_classes: &["com.example.Bindings".to_owned()],
        facts: &[facts],
    })
    .unwrap();
    let (_, adapter) = registry
        .adapters(&AttributeName::new("imageUrl"))
        .next()
        .unwrap();
    assert_eq!(adapter.method, "setImageUrl");
}

#[test]
fn missing_files_name_the_path() {
    let err = load_universe(Path::new("/nonexistent/universe.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/universe.json"));
}

#[test]
fn bindings_split_on_the_first_equals() {
    let (attribute, ty) = parse_binding("android:min=int").unwrap();
    assert_eq!(attribute, "android:min");
    assert_eq!(ty, TypeRef::parse("int").unwrap());

    assert!(matches!(parse_binding("min"), Err(CliError::Binding(_))));
    assert!(matches!(parse_binding("=int"), Err(CliError::Binding(_))));
    assert!(matches!(parse_binding("min=List<"), Err(CliError::Type { .. })));
}

#[test]
fn overrides_replace_only_given_fields() {
    let config = ConfigOverrides {
        min_api: Some(21),
        ..ConfigOverrides::default()
    }
    .apply(ResolverConfig::default());
    assert_eq!(config.default_min_api, 21);
    assert_eq!(config.listener_type, ResolverConfig::default().listener_type);
}
