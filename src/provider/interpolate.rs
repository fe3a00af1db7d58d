//! `{{ name }}` placeholder substitution.

use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};
use serde_json::Value;

use crate::types::InterpolationParams;

#[allow(clippy::expect_used)]
static TEMPLATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s?(?P<name>[^{}\s]*)\s?\}\}").expect("valid interpolation pattern")
});

/// Shared placeholder substitution primitive.
pub trait Interpolate: Send + Sync {
    /// Substitutes `params` into `template`.
    ///
    /// `None` means the interpolator produced nothing for this template.
    fn interpolate(&self, template: &str, params: Option<&InterpolationParams>) -> Option<String>;
}

/// Substitutes `{{name}}` and `{{nested.name}}` tokens.
///
/// A name is looked up as a whole key first and then as a dotted path.
/// Tokens without a displayable value become empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultInterpolator;

impl Interpolate for DefaultInterpolator {
    fn interpolate(&self, template: &str, params: Option<&InterpolationParams>) -> Option<String> {
        let Some(params) = params else {
            return Some(template.to_string());
        };

        let result = TEMPLATE_TOKEN.replace_all(template, |caps: &Captures<'_>| {
            caps.name("name")
                .and_then(|name| lookup(params, name.as_str()))
                .map(display_value)
                .unwrap_or_default()
        });
        Some(result.into_owned())
    }
}

fn lookup<'a>(params: &'a InterpolationParams, name: &str) -> Option<&'a Value> {
    if let Some(value) = params.get(name) {
        return Some(value);
    }

    let mut segments = name.split('.');
    let first = params.get(segments.next()?)?;
    segments.try_fold(first, |current, segment| current.as_object()?.get(segment))
}

/// Display form of a parameter value; containers and null display as nothing.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> InterpolationParams {
        value.as_object().cloned().unwrap()
    }

    #[rstest]
    #[case::simple("Hello {{p1}}", json!({"p1": "world"}), "Hello world")]
    #[case::spaced("Hello {{ p1 }}", json!({"p1": "world"}), "Hello world")]
    #[case::number("{{n}} items", json!({"n": 3}), "3 items")]
    #[case::boolean("flag={{b}}", json!({"b": true}), "flag=true")]
    #[case::nested("Hi {{user.name}}", json!({"user": {"name": "Ali"}}), "Hi Ali")]
    #[case::dotted_key_first("{{a.b}}", json!({"a.b": "flat", "a": {"b": "deep"}}), "flat")]
    #[case::missing("Hello {{p2}}", json!({"p1": "world"}), "Hello ")]
    #[case::null("[{{p1}}]", json!({"p1": null}), "[]")]
    #[case::repeated("{{p}}-{{p}}", json!({"p": "x"}), "x-x")]
    fn interpolates(#[case] template: &str, #[case] values: Value, #[case] expected: &str) {
        let result = DefaultInterpolator.interpolate(template, Some(&params(values)));

        assert_that!(result, some(eq(expected)));
    }

    #[rstest]
    fn without_params_returns_template() {
        let result = DefaultInterpolator.interpolate("Hello {{p1}}", None);

        assert_that!(result, some(eq("Hello {{p1}}")));
    }

    #[rstest]
    fn single_braces_are_not_tokens() {
        let result = DefaultInterpolator.interpolate("Hello {p1}", Some(&params(json!({"p1": "x"}))));

        assert_that!(result, some(eq("Hello {p1}")));
    }
}
