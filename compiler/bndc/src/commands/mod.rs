//! Command handlers. Each writes its report to `out` so tests can capture
//! it.

use std::io::Write;
use std::path::Path;

use bnd_registry::{capitalize, AttributeName, BindingRegistry, RegistrySnapshot};
use bnd_resolve::{GetterCall, MultiAttributeSetter, Resolver, SetterCall};
use bnd_types::TypeRef;
use serde_json::json;

use crate::error::CliError;

/// How rendered calls refer to the surrounding generated code.
#[derive(Debug, Clone)]
pub struct Expressions {
    pub component: Option<String>,
    pub view: String,
}

impl Expressions {
    fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }
}

/// Value expressions for a call: `oldName` placeholders first when the
/// call needs old values.
fn value_exprs(names: &[&str], with_old: bool) -> Vec<String> {
    let old = names.iter().map(|name| format!("old{}", capitalize(name)));
    let new = names.iter().map(|name| (*name).to_owned());
    if with_old {
        old.chain(new).collect()
    } else {
        new.collect()
    }
}

fn as_refs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

/// Encode `registry` as a snapshot at `output`.
pub fn snapshot(
    registry: &BindingRegistry,
    output: &Path,
    out: &mut impl Write,
) -> Result<(), CliError> {
    RegistrySnapshot::from_registry(registry)?.write(output)?;
    writeln!(out, "wrote {} facts to {}", registry.len(), output.display())?;
    Ok(())
}

pub fn setter(
    resolver: &Resolver<'_>,
    attribute: &str,
    view_type: Option<&TypeRef>,
    value_type: &TypeRef,
    exprs: &Expressions,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let call = resolver.resolve_setter(attribute, view_type, value_type)?;
    let values = value_exprs(&["value"], call.requires_old_value());
    let rendered = call.to_java(exprs.component(), &exprs.view, &as_refs(&values))?;

    if as_json {
        let report = json!({
            "kind": setter_kind(&call),
            "call": rendered,
            "min_api": call.min_api(),
            "requires_old_value": call.requires_old_value(),
            "parameter_types": call.parameter_types().iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{rendered};")?;
        writeln!(out, "  min api: {}", call.min_api())?;
        if let Some(accessor) = exprs.component().and_then(|c| call.adapter_accessor(c)) {
            writeln!(out, "  adapter holder: {accessor}")?;
        }
    }
    Ok(())
}

fn setter_kind(call: &SetterCall) -> &'static str {
    match call {
        SetterCall::Dummy { .. } => "dummy",
        SetterCall::Adapter { .. } => "adapter",
        SetterCall::NativeMethod { .. } => "method",
    }
}

pub fn getter(
    resolver: &Resolver<'_>,
    attribute: &str,
    view_type: &TypeRef,
    value_type: Option<&TypeRef>,
    exprs: &Expressions,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let call = resolver.resolve_getter(attribute, view_type, value_type)?;
    let rendered = call.to_java(exprs.component(), &exprs.view)?;
    let event = match call.event() {
        Some(event) => {
            let values = value_exprs(&["listener"], event.requires_old_value());
            Some(event.to_java(exprs.component(), &exprs.view, &as_refs(&values))?)
        }
        None => None,
    };

    if as_json {
        let report = json!({
            "kind": getter_kind(&call),
            "call": rendered,
            "min_api": call.min_api(),
            "return_type": call.return_type().map(ToString::to_string),
            "event_attribute": call.event_attribute().map(AttributeName::as_str),
            "event_call": event,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{rendered};")?;
        if let Some(ty) = call.return_type() {
            writeln!(out, "  returns: {ty}")?;
        }
        if let (Some(attribute), Some(event)) = (call.event_attribute(), event) {
            writeln!(out, "  event `{attribute}`: {event};")?;
        }
    }
    Ok(())
}

fn getter_kind(call: &GetterCall) -> &'static str {
    match call {
        GetterCall::Binder { .. } => "binder",
        GetterCall::InverseAdapter { .. } => "adapter",
        GetterCall::InverseNative { .. } => "method",
    }
}

pub fn multi(
    resolver: &Resolver<'_>,
    bindings: &[(String, TypeRef)],
    view_type: &TypeRef,
    exprs: &Expressions,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let attributes: Vec<&str> = bindings.iter().map(|(name, _)| name.as_str()).collect();
    let value_types: Vec<TypeRef> = bindings.iter().map(|(_, ty)| ty.clone()).collect();
    let calls = resolver.resolve_multi_attribute_setters(&attributes, view_type, &value_types);

    let mut rendered = Vec::with_capacity(calls.len());
    for call in &calls {
        rendered.push(render_multi(call, exprs)?);
    }
    let consumed: Vec<AttributeName> = calls
        .iter()
        .flat_map(|call| call.attributes().into_iter().cloned())
        .collect();
    let leftover: Vec<&str> = attributes
        .iter()
        .copied()
        .filter(|a| !consumed.contains(&AttributeName::new(a)))
        .collect();

    if as_json {
        let report = json!({
            "calls": rendered,
            "unconsumed": leftover,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        for (call, line) in calls.iter().zip(&rendered) {
            let names: Vec<&str> = call
                .attributes()
                .into_iter()
                .map(AttributeName::as_str)
                .collect();
            writeln!(out, "{line};")?;
            writeln!(out, "  consumes: {}", names.join(", "))?;
        }
        if !leftover.is_empty() {
            writeln!(out, "unconsumed: {}", leftover.join(", "))?;
        }
    }
    Ok(())
}

fn render_multi(call: &MultiAttributeSetter, exprs: &Expressions) -> Result<String, CliError> {
    let names: Vec<&str> = call
        .attributes()
        .into_iter()
        .map(AttributeName::local_name)
        .collect();
    let values = value_exprs(&names, call.requires_old_value());
    Ok(call.to_java(exprs.component(), &exprs.view, &as_refs(&values))?)
}

/// List every fact in `registry`, one per line, grouped by table.
pub fn dump(registry: &BindingRegistry, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "# {} facts", registry.len())?;
    for (attribute, key, adapter) in registry.all_adapters() {
        writeln!(out, "adapter {attribute} {key} -> {adapter}")?;
    }
    for (key, adapter) in registry.multi_value_adapters() {
        writeln!(out, "multi {key} -> {adapter}")?;
    }
    for (attribute, class, method) in registry.all_renamed_methods() {
        writeln!(out, "renamed {attribute} on {class} -> {}", method.method)?;
    }
    for (from, to, conversion) in registry.conversions() {
        writeln!(out, "conversion {from} -> {to} via {conversion}")?;
    }
    for (attribute, key, inverse) in registry.all_inverse_adapters() {
        writeln!(out, "inverse-adapter {attribute} {key} -> {inverse}")?;
    }
    for (attribute, class, inverse) in registry.all_inverse_methods() {
        writeln!(out, "inverse-method {attribute} on {class} -> {inverse}")?;
    }
    for (name, owner) in registry.untaggable_types() {
        writeln!(out, "untaggable {name} (declared by {owner})")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap command output")]
mod tests;
