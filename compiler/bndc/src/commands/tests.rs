use super::*;
use bnd_registry::{InverseDescriptor, MethodDescriptor, MultiValueAdapterKey};
use bnd_types::{ClassDecl, ClassGraph, MethodDecl, Primitive, INVERSE_LISTENER, OBJECT};
use pretty_assertions::assert_eq;

const VIEW: &str = "android.view.View";
const TEXT_VIEW: &str = "android.widget.TextView";
const SEEK_BAR: &str = "android.widget.SeekBar";

fn universe() -> ClassGraph {
    let mut graph = ClassGraph::new();
    graph
        .declare(ClassDecl::new(VIEW).extends(OBJECT))
        .declare(
            ClassDecl::new(TEXT_VIEW)
                .extends(VIEW)
                .method(MethodDecl::setter("setText", "java.lang.CharSequence")),
        )
        .declare(ClassDecl::new(SEEK_BAR).extends(VIEW));
    graph
}

fn registry() -> BindingRegistry {
    let mut registry = BindingRegistry::new();
    registry
        .register_adapter(
            "app:font",
            TEXT_VIEW,
            "java.lang.String",
            MethodDescriptor::new_instance("com.example.Fonts", "setFont").with_old_value(),
        )
        .unwrap();
    registry
        .register_multi_value_adapter(
            MultiValueAdapterKey::new(SEEK_BAR, ["min", "max"], ["int", "int"], false).unwrap(),
            MethodDescriptor::new_static("Bindings", "setRange"),
        )
        .unwrap();
    registry
        .register_inverse_adapter(
            "android:progress",
            SEEK_BAR,
            "int",
            InverseDescriptor::new(
                MethodDescriptor::new_static("Bindings", "getProgress"),
                "android:progressAttrChanged",
            ),
        )
        .unwrap();
    registry
        .register_adapter(
            "android:progressAttrChanged",
            SEEK_BAR,
            INVERSE_LISTENER,
            MethodDescriptor::new_static("Bindings", "setListener"),
        )
        .unwrap();
    registry
}

fn exprs(component: Option<&str>) -> Expressions {
    Expressions {
        component: component.map(str::to_owned),
        view: "view".to_owned(),
    }
}

fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
    let mut out = Vec::new();
    run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn old_value_placeholders_come_first() {
    assert_eq!(value_exprs(&["min", "max"], true), ["oldMin", "oldMax", "min", "max"]);
    assert_eq!(value_exprs(&["value"], false), ["value"]);
}

#[test]
fn setter_reports_instance_adapter_holder() {
    let (registry, universe) = (registry(), universe());
    let resolver = Resolver::new(&registry, &universe);
    let text = output(|out| {
        setter(
            &resolver,
            "app:font",
            Some(&TypeRef::named(TEXT_VIEW)),
            &TypeRef::string(),
            &exprs(Some("this")),
            false,
            out,
        )
    });
    assert_eq!(
        text,
        "this.getFonts().setFont(view, oldValue, value);\n  min api: 1\n  adapter holder: this.getFonts()\n"
    );
}

#[test]
fn setter_json_report() {
    let (registry, universe) = (registry(), universe());
    let resolver = Resolver::new(&registry, &universe);
    let text = output(|out| {
        setter(
            &resolver,
            "android:text",
            Some(&TypeRef::named(TEXT_VIEW)),
            &TypeRef::string(),
            &exprs(None),
            true,
            out,
        )
    });
    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["kind"], "method");
    assert_eq!(report["call"], "view.setText(value)");
    assert_eq!(report["requires_old_value"], false);
}

#[test]
fn getter_renders_event_setter() {
    let (registry, universe) = (registry(), universe());
    let resolver = Resolver::new(&registry, &universe);
    let text = output(|out| {
        getter(
            &resolver,
            "android:progress",
            &TypeRef::named(SEEK_BAR),
            Some(&TypeRef::primitive(Primitive::Int)),
            &exprs(None),
            false,
            out,
        )
    });
    assert_eq!(
        text,
        "Bindings.getProgress(view);\n  returns: int\n  event `android:progressAttrChanged`: Bindings.setListener(view, listener);\n"
    );
}

#[test]
fn multi_lists_unconsumed_attributes() {
    let (registry, universe) = (registry(), universe());
    let resolver = Resolver::new(&registry, &universe);
    let int = TypeRef::primitive(Primitive::Int);
    let bindings = vec![
        ("max".to_owned(), int.clone()),
        ("thumb".to_owned(), int),
    ];
    let text = output(|out| {
        multi(&resolver, &bindings, &TypeRef::named(SEEK_BAR), &exprs(None), false, out)
    });
    assert_eq!(
        text,
        "Bindings.setRange(view, 0, max);\n  consumes: max\nunconsumed: thumb\n"
    );
}

#[test]
fn dump_lists_every_table() {
    let text = output(|out| dump(&registry(), out));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# 4 facts");
    assert!(lines.contains(&"multi android.widget.SeekBar[min: int, max: int] -> Bindings.setRange"));
    assert!(lines.iter().any(|l| l.starts_with("inverse-adapter android:progress ")));
    assert_eq!(lines.iter().filter(|l| l.starts_with("adapter ")).count(), 2);
}

#[test]
fn dump_marks_required_multi_adapters_once() {
    let mut registry = registry();
    registry
        .register_multi_value_adapter(
            MultiValueAdapterKey::new(SEEK_BAR, ["from", "to"], ["int", "int"], true).unwrap(),
            MethodDescriptor::new_static("Bindings", "setSpan"),
        )
        .unwrap();
    let text = output(|out| dump(&registry, out));
    let line = text
        .lines()
        .find(|l| l.ends_with("-> Bindings.setSpan"))
        .unwrap();
    assert_eq!(line, "multi android.widget.SeekBar[from: int, to: int] (all required) -> Bindings.setSpan");
    assert_eq!(line.matches("all").count(), 1);
}

#[test]
fn snapshot_writes_a_readable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bnd");
    let text = output(|out| snapshot(&registry(), &path, out));
    assert!(text.starts_with("wrote 4 facts"));
    let reloaded = RegistrySnapshot::read(&path).unwrap().to_registry().unwrap();
    assert_eq!(reloaded, registry());
}
