//! Candidate ranking.
//!
//! Pure functions over a [`TypeUniverse`] and a [`BindingRegistry`]: given
//! the same registry and universe they always rank candidates the same way.
//!
//! # Parameter quality
//!
//! When several setters could accept a value, the parameter reached most
//! directly wins. From best to worst:
//!
//! 1. the exact type
//! 2. boxing or unboxing
//! 3. implicit primitive widening (narrower targets first)
//! 4. a supertype (more specific supertypes first)
//! 5. a registered conversion
//! 6. a cast from `java.lang.Object`

use std::cmp::Ordering;

use bnd_registry::{BindingRegistry, MethodDescriptor};
use bnd_types::{TypeRef, TypeUniverse};

use crate::{MultiAttributeSetter, SlotMatch};

/// Whether `param` accepts `arg` better than the current best `old`.
///
/// `better_view` is set when the candidate's view type is at least as
/// specific as the current best's; without it, a candidate must strictly
/// improve on the value match.
pub fn is_better_parameter(
    universe: &dyn TypeUniverse,
    registry: &BindingRegistry,
    arg: &TypeRef,
    param: &TypeRef,
    old: Option<&TypeRef>,
    better_view: bool,
) -> bool {
    if !better_view && old == Some(arg) {
        return false;
    }
    if arg == param {
        return true;
    }
    if old == Some(arg) {
        return false;
    }
    if !better_view && old.is_some_and(|old| universe.is_boxing_conversion(old, arg)) {
        return false;
    }
    if universe.is_boxing_conversion(param, arg) {
        return true;
    }

    let old_level = old.and_then(|old| universe.implicit_conversion_level(old));
    if universe.is_implicit_conversion(arg, param) {
        let level = universe.implicit_conversion_level(param);
        return match (old_level, level) {
            (None, _) => true,
            (Some(old_level), Some(level)) => level < old_level,
            (Some(_), None) => false,
        };
    }
    if old_level.is_some() {
        return false;
    }

    if universe.is_assignable_from(param, arg) {
        return old.map_or(true, |old| universe.is_assignable_from(old, param));
    }
    if find_conversion(universe, registry, arg, param).is_some() {
        return true;
    }
    if old.is_some_and(|old| find_conversion(universe, registry, arg, old).is_some()) {
        return false;
    }
    arg.is_object() && !param.is_primitive()
}

/// First registered conversion taking `from` and producing `to`.
///
/// Conversions to `java.lang.Object` are never needed and never returned.
pub fn find_conversion<'r>(
    universe: &dyn TypeUniverse,
    registry: &'r BindingRegistry,
    from: &TypeRef,
    to: &TypeRef,
) -> Option<&'r MethodDescriptor> {
    if to.is_object() {
        return None;
    }
    registry
        .conversions()
        .find(|(convert_from, convert_to, method)| {
            let Some(convert_from) = universe.find_type(convert_from) else {
                tracing::debug!(type_name = convert_from, %method, "unknown conversion source type");
                return false;
            };
            if !can_use(universe, from, &convert_from) {
                return false;
            }
            let Some(convert_to) = universe.find_type(convert_to) else {
                tracing::debug!(type_name = convert_to, %method, "unknown conversion target type");
                return false;
            };
            can_use(universe, &convert_to, to)
        })
        .map(|(_, _, method)| method)
}

/// Whether a value of type `from` may be passed where `to` is expected
/// without a further conversion.
fn can_use(universe: &dyn TypeUniverse, from: &TypeRef, to: &TypeRef) -> bool {
    let (from, to) = (universe.erase(from), universe.erase(to));
    from == to
        || universe.is_boxing_conversion(&from, &to)
        || universe.is_assignable_from(&to, &from)
}

/// Order multi-attribute candidates best first.
///
/// Both candidates must have been matched against the same query.
pub fn compare_multi_setters(
    universe: &dyn TypeUniverse,
    a: &MultiAttributeSetter,
    b: &MultiAttributeSetter,
) -> Ordering {
    // More consumed attributes first.
    let by_count = b.supplied_count().cmp(&a.supplied_count());
    if by_count != Ordering::Equal {
        return by_count;
    }

    let (view_a, view_b) = (universe.erase(&a.view_type), universe.erase(&b.view_type));
    if view_a != view_b {
        if universe.is_assignable_from(&view_a, &view_b) {
            return Ordering::Greater;
        }
        if universe.is_assignable_from(&view_b, &view_a) {
            return Ordering::Less;
        }
    }

    let names_a = a.key.sorted_slots();
    let names_b = b.key.sorted_slots();
    let by_names = names_a
        .iter()
        .map(|(name, _)| name)
        .cmp(names_b.iter().map(|(name, _)| name));
    if by_names != Ordering::Equal {
        return by_names;
    }

    for (&(_, slot_a), &(_, slot_b)) in names_a.iter().zip(&names_b) {
        let (Some(slot_a), Some(slot_b)) = (a.slots.get(slot_a), b.slots.get(slot_b)) else {
            continue;
        };
        let (type_a, type_b) = (&slot_a.parameter_type, &slot_b.parameter_type);
        if type_a == type_b {
            continue;
        }
        let by_slot = compare_slot(
            universe,
            slot_a.matched.as_ref(),
            type_a,
            slot_b.matched.as_ref(),
            type_b,
        );
        if by_slot != Ordering::Equal {
            return by_slot;
        }
    }
    Ordering::Equal
}

fn compare_slot(
    universe: &dyn TypeUniverse,
    match_a: Option<&SlotMatch>,
    type_a: &TypeRef,
    match_b: Option<&SlotMatch>,
    type_b: &TypeRef,
) -> Ordering {
    // A cast loses to anything, then a conversion, then boxing.
    let penalty = |m: Option<&SlotMatch>| match m {
        Some(SlotMatch::Cast) => 3,
        Some(SlotMatch::Converted(_)) => 2,
        Some(SlotMatch::Boxing) => 1,
        _ => 0,
    };
    let by_kind = penalty(match_a).cmp(&penalty(match_b));
    if by_kind != Ordering::Equal {
        return by_kind;
    }

    match (type_a.is_primitive(), type_b.is_primitive()) {
        (true, true) => {
            let level_a = universe.implicit_conversion_level(type_a);
            let level_b = universe.implicit_conversion_level(type_b);
            return level_a.cmp(&level_b);
        }
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    if universe.is_assignable_from(type_a, type_b) {
        Ordering::Greater
    } else if universe.is_assignable_from(type_b, type_a) {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}
