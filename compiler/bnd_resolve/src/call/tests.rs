use super::*;
use bnd_types::Primitive;
use pretty_assertions::assert_eq;

fn ty(name: &str) -> TypeRef {
    TypeRef::parse(name).unwrap()
}

fn setter(name: &str, param: &str) -> MethodSig {
    MethodSig {
        declaring_type: ty("android.widget.TextView"),
        name: name.to_owned(),
        params: vec![ty(param)],
        return_type: TypeRef::void(),
        is_static: false,
        min_api: 1,
    }
}

fn adapter_call(adapter: MethodDescriptor, adaptation: ValueAdaptation) -> SetterCall {
    SetterCall::Adapter {
        adapter,
        view_type: ty("android.widget.ImageView"),
        parameter_type: TypeRef::string(),
        adaptation,
        min_api: 1,
    }
}

#[test]
fn static_adapter_renders_on_its_class() {
    let call = adapter_call(
        MethodDescriptor::new_static("com.example.Bindings", "setImageUrl"),
        ValueAdaptation::default(),
    );
    assert_eq!(
        call.to_java(None, "view", &["url"]).unwrap(),
        "com.example.Bindings.setImageUrl(view, url)"
    );
    assert_eq!(call.adapter_accessor("component"), None);
    assert_eq!(call.parameter_types(), vec![&TypeRef::string()]);
}

#[test]
fn instance_adapter_goes_through_the_component() {
    let call = adapter_call(
        MethodDescriptor::new_instance("com.example.Bindings", "setImageUrl"),
        ValueAdaptation::default(),
    );
    assert_eq!(
        call.to_java(Some("this.mBindingComponent"), "view", &["url"]).unwrap(),
        "this.mBindingComponent.getBindings().setImageUrl(view, url)"
    );
    assert_eq!(
        call.adapter_accessor("c").as_deref(),
        Some("c.getBindings()")
    );
    assert_eq!(
        call.to_java(None, "view", &["url"]),
        Err(EmitError::MissingComponent {
            method: "com.example.Bindings.setImageUrl".to_owned()
        })
    );
}

#[test]
fn component_argument_and_old_value_come_first() {
    let call = adapter_call(
        MethodDescriptor::new_static("com.example.Bindings", "setUrl")
            .with_component("com.example.Component")
            .with_old_value(),
        ValueAdaptation::default(),
    );
    assert!(call.requires_old_value());
    assert_eq!(call.parameter_types().len(), 2);
    assert_eq!(
        call.to_java(Some("c"), "v", &["oldUrl", "newUrl"]).unwrap(),
        "com.example.Bindings.setUrl(c, v, oldUrl, newUrl)"
    );
    assert_eq!(
        call.to_java(Some("c"), "v", &["newUrl"]),
        Err(EmitError::ValueCount {
            expected: 2,
            found: 1
        })
    );
}

#[test]
fn conversion_wraps_the_value_once() {
    let adaptation = ValueAdaptation {
        conversion: Some(MethodDescriptor::new_static("com.example.Converters", "toDrawable")),
        cast: None,
    };
    let call = SetterCall::NativeMethod {
        method: setter("setBackground", "android.graphics.drawable.Drawable"),
        adaptation,
    };
    assert_eq!(
        call.to_java(None, "view", &["color"]).unwrap(),
        "view.setBackground(com.example.Converters.toDrawable(color))"
    );
}

#[test]
fn cast_prefixes_the_value() {
    let call = SetterCall::NativeMethod {
        method: setter("setText", "java.lang.CharSequence"),
        adaptation: ValueAdaptation {
            conversion: None,
            cast: Some(ty("java.lang.CharSequence")),
        },
    };
    assert_eq!(
        call.to_java(None, "view", &["value"]).unwrap(),
        "view.setText((java.lang.CharSequence) value)"
    );
}

#[test]
fn dummy_setter_calls_by_name() {
    let call = SetterCall::Dummy {
        method: "setUser".to_owned(),
        min_api: 1,
    };
    assert_eq!(call.to_java(None, "binding", &["user"]).unwrap(), "binding.setUser(user)");
    assert!(call.parameter_types().is_empty());
    assert_eq!(call.adaptation(), None);
}

fn range_setter(old_value: bool) -> MultiAttributeSetter {
    let key = MultiValueAdapterKey::new(
        "android.widget.ProgressBar",
        ["min", "max", "tint"],
        ["int", "java.lang.Integer", "java.lang.String"],
        false,
    )
    .unwrap();
    let mut adapter = MethodDescriptor::new_static("com.example.Bindings", "setRange");
    if old_value {
        adapter = adapter.with_old_value();
    }
    MultiAttributeSetter {
        key,
        adapter,
        view_type: ty("android.widget.ProgressBar"),
        slots: vec![
            SlotBinding {
                attribute: AttributeName::new("min"),
                parameter_type: TypeRef::primitive(Primitive::Int),
                matched: Some(SlotMatch::Direct),
            },
            SlotBinding {
                attribute: AttributeName::new("max"),
                parameter_type: ty("java.lang.Integer"),
                matched: None,
            },
            SlotBinding {
                attribute: AttributeName::new("tint"),
                parameter_type: TypeRef::string(),
                matched: Some(SlotMatch::Cast),
            },
        ],
        min_api: 1,
    }
}

#[test]
fn unsupplied_slots_get_default_literals() {
    let call = range_setter(false);
    assert_eq!(
        call.attributes(),
        vec![&AttributeName::new("min"), &AttributeName::new("tint")]
    );
    assert_eq!(
        call.to_java(None, "bar", &["lo", "t"]).unwrap(),
        "com.example.Bindings.setRange(bar, lo, null, (java.lang.String) t)"
    );
}

#[test]
fn multi_setter_old_values_precede_new_values() {
    let call = range_setter(true);
    assert_eq!(call.parameter_types().len(), 4);
    assert_eq!(
        call.to_java(None, "bar", &["oldLo", "oldT", "lo", "t"]).unwrap(),
        "com.example.Bindings.setRange(bar, oldLo, null, (java.lang.String) oldT, lo, null, (java.lang.String) t)"
    );
    assert!(call.to_java(None, "bar", &["lo", "t"]).is_err());
}

#[test]
fn getter_calls_render_and_expose_their_event() {
    let event = EventSetter::Single(SetterCall::Dummy {
        method: "setValueChanged".to_owned(),
        min_api: 1,
    });
    let getter = GetterCall::InverseAdapter {
        inverse: InverseDescriptor::new(
            MethodDescriptor::new_static("com.example.Bindings", "getValue"),
            "app:valueChanged",
        ),
        view_type: ty("com.example.Slider"),
        return_type: TypeRef::primitive(Primitive::Float),
        event,
        min_api: 1,
    };
    assert_eq!(
        getter.to_java(None, "slider").unwrap(),
        "com.example.Bindings.getValue(slider)"
    );
    assert_eq!(getter.event_attribute().map(AttributeName::as_str), Some("valueChanged"));
    assert!(getter.event().is_some());

    let binder = GetterCall::Binder {
        attribute: AttributeName::new("user"),
        min_api: 1,
    };
    assert_eq!(binder.to_java(None, "included").unwrap(), "included.getUser()");
    assert_eq!(binder.event(), None);
    assert_eq!(binder.return_type(), None);
}
