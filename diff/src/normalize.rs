//! Property normalization ahead of comparison.
//!
//! Absent, empty and "none" values all mean "the property's default", and
//! numeric text with no fractional part (`"17"`, `"+5"`, `"17.0"`) means the
//! number. Both sides are normalized the same way, so
//! an absent quantity compares equal to an explicit 1.

use catalog::{TrackedProperty, TypeRules};
use level::LevelObject;

/// A property value before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    Absent,
    Number(i64),
    Text(&'a str),
}

/// Normalizes one value of `property`.
///
/// Text that is neither empty, "none" nor a whole number has no numeric
/// meaning and falls back to the default as well.
#[must_use]
pub fn normalize_value(rules: &TypeRules, property: TrackedProperty, value: RawValue<'_>) -> i64 {
    let default = rules.property_default(property);
    match value {
        RawValue::Absent => default,
        RawValue::Number(n) => n,
        RawValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() || text.eq_ignore_ascii_case("none") {
                default
            } else {
                text.parse()
                    .ok()
                    .or_else(|| whole_number(text))
                    .unwrap_or(default)
            }
        }
    }
}

/// 2^63, the first float past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn whole_number(text: &str) -> Option<i64> {
    let value: f64 = text.parse().ok()?;
    let whole = value.is_finite() && value.fract() == 0.0;
    (whole && (-I64_BOUND..I64_BOUND).contains(&value)).then(|| value as i64)
}

/// Reads a property off an enriched object.
#[must_use]
pub fn raw_property(object: &LevelObject, property: TrackedProperty) -> RawValue<'static> {
    let number = |value: Option<u8>| value.map_or(RawValue::Absent, |v| RawValue::Number(i64::from(v)));
    match property {
        TrackedProperty::Quality => RawValue::Number(i64::from(object.record.quality)),
        TrackedProperty::Owner => RawValue::Number(i64::from(object.owner.value())),
        TrackedProperty::Enchanted => RawValue::Number(i64::from(object.enchanted)),
        TrackedProperty::Quantity => object
            .quantity
            .map_or(RawValue::Absent, |q| RawValue::Number(i64::from(q))),
        TrackedProperty::Hp => number(object.hp()),
        TrackedProperty::Level => number(object.npc_level()),
        TrackedProperty::Attitude => number(object.attitude().map(|a| a.raw())),
    }
}

/// Normalized value of `property` on `object`.
#[must_use]
pub fn property_value(rules: &TypeRules, object: &LevelObject, property: TrackedProperty) -> i64 {
    normalize_value(rules, property, raw_property(object, property))
}
