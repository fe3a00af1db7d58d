//! Default value resolution for translation misses.

use serde_json::Value;

use super::exchange::exchange_params;
use super::normalize::normalize_relaxed_json;
use crate::provider::Interpolate;
use crate::types::{
    DefaultValue,
    InterpolationParams,
};

/// Computes the text shown when a key lookup misses.
///
/// # Resolution order
/// 1. No default, or an empty one: `miss_value`
/// 2. Text:
///    - a relaxed object literal with an entry for `active_language` yields that entry
///    - anything else (not an object, or no entry for the language) is used literally
/// 3. Per-language map: the entry for `active_language`, else `miss_value`
///
/// Whatever text is chosen from a default goes through [`exchange_params`]
/// and then `interpolator`. An interpolator that produces nothing yields `""`.
///
/// # Arguments
/// * `defaults` - Author supplied default
/// * `active_language` - Language currently displayed
/// * `params` - Interpolation parameters
/// * `miss_value` - Unresolved key, or the serialized inline query
/// * `interpolator` - Shared placeholder substitution
#[must_use]
pub fn resolve_default(
    defaults: Option<&DefaultValue>,
    active_language: &str,
    params: Option<&InterpolationParams>,
    miss_value: &str,
    interpolator: &dyn Interpolate,
) -> String {
    let render = |template: &str| {
        interpolator.interpolate(&exchange_params(template), params).unwrap_or_default()
    };

    match defaults {
        None => miss_value.to_string(),
        Some(defaults) if defaults.is_empty() => miss_value.to_string(),
        Some(DefaultValue::Text(text)) => language_entry(text, active_language).map_or_else(
            || {
                tracing::debug!("Using literal default for language {active_language}");
                render(text.as_str())
            },
            |entry| render(entry.as_str()),
        ),
        Some(DefaultValue::PerLanguage(map)) => map.get(active_language).map_or_else(
            || {
                tracing::debug!("No default for language {active_language}, using miss value");
                miss_value.to_string()
            },
            |entry| render(entry.as_str()),
        ),
    }
}

/// Entry for `language` when `text` is a relaxed object literal.
fn language_entry(text: &str, language: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(&normalize_relaxed_json(text)).ok()?;
    match parsed.as_object()?.get(language)? {
        Value::String(entry) => Some(entry.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
