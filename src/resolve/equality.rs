//! Structural equality and last-input memoization.

use serde_json::{
    Number,
    Value,
};

/// Value-level equality of two binding inputs.
///
/// Objects match when they have the same keys and equal values under every
/// key. Numbers compare by value, so `1` and `1.0` are the same input.
/// Two integers compare exactly, even above the `f64` precision limit.
#[must_use]
pub fn unchanged(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| b.get(key).is_some_and(|other| unchanged(value, other)))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| unchanged(x, y))
        }
        (Value::Number(a), Value::Number(b)) => same_number(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

/// Integers by exact value; a float on either side compares as `f64`.
fn same_number(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x.total_cmp(&y).is_eq())
    } else {
        a.as_i64().map_or_else(|| a.as_u64() == b.as_u64(), |x| b.as_i64() == Some(x))
    }
}

/// Remembers the inputs of the last computation and its result.
///
/// A hit requires inputs that are [`unchanged`] from the remembered ones.
#[derive(Debug, Clone, Default)]
pub struct EqualityCache<T> {
    /// Inputs of the last computation, `None` once forgotten
    inputs: Option<Value>,
    /// Last computed (or delivered) value
    value: T,
}

impl<T> EqualityCache<T> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { inputs: None, value }
    }

    /// Cached value when `inputs` match the remembered ones.
    #[must_use]
    pub fn hit(&self, inputs: &Value) -> Option<&T> {
        let hit = self.inputs.as_ref().is_some_and(|last| unchanged(last, inputs));
        if hit {
            tracing::trace!("Inputs unchanged, reusing cached value");
        }
        hit.then_some(&self.value)
    }

    /// Records new inputs together with the value computed for them.
    pub fn remember(&mut self, inputs: Value, value: T) {
        self.inputs = Some(inputs);
        self.value = value;
    }

    /// Drops the remembered inputs so the next call recomputes.
    ///
    /// The last value stays readable until then.
    pub fn forget(&mut self) {
        self.inputs = None;
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::same_string(json!("test"), json!("test"), true)]
    #[case::different_string(json!("test"), json!("other"), false)]
    #[case::fresh_equal_objects(json!({"p1": "v", "n": 1}), json!({"n": 1, "p1": "v"}), true)]
    #[case::integer_and_float(json!({"n": 1}), json!({"n": 1.0}), true)]
    #[case::negative_integers(json!(-3), json!(-3), true)]
    #[case::negative_and_positive(json!(-1), json!(1), false)]
    #[case::integers_above_f64_precision(
        json!({"n": 9_007_199_254_740_992_u64}),
        json!({"n": 9_007_199_254_740_993_u64}),
        false
    )]
    #[case::largest_integers(json!(u64::MAX), json!(u64::MAX - 1), false)]
    #[case::nested_equal(json!({"a": {"b": [1, 2]}}), json!({"a": {"b": [1, 2]}}), true)]
    #[case::nested_differs(json!({"a": {"b": "x"}}), json!({"a": {"b": "y"}}), false)]
    #[case::extra_key(json!({"a": 1}), json!({"a": 1, "b": 2}), false)]
    #[case::missing_key(json!({"a": 1, "b": 2}), json!({"a": 1, "c": 2}), false)]
    #[case::null_vs_absent(json!({"a": null}), json!({}), false)]
    #[case::string_vs_object(json!("{}"), json!({}), false)]
    #[case::nulls(json!(null), json!(null), true)]
    fn unchanged_cases(#[case] a: Value, #[case] b: Value, #[case] expected: bool) {
        assert_that!(unchanged(&a, &b), eq(expected));
        assert_that!(unchanged(&b, &a), eq(expected));
    }

    #[rstest]
    fn cache_hits_only_for_equal_inputs() {
        let mut cache = EqualityCache::new(String::new());
        cache.remember(json!(["test", {"p1": "v"}]), "Value".to_string());

        assert_that!(cache.hit(&json!(["test", {"p1": "v"}])), some(eq("Value")));
        assert_that!(cache.hit(&json!(["test", {"p1": "w"}])), none());
    }

    #[rstest]
    fn empty_cache_never_hits() {
        let cache = EqualityCache::new(0_u8);

        assert_that!(cache.hit(&json!(null)), none());
    }

    #[rstest]
    fn forget_keeps_value_but_misses() {
        let mut cache = EqualityCache::new(String::new());
        cache.remember(json!("test"), "Value".to_string());

        cache.forget();

        assert_that!(cache.hit(&json!("test")), none());
        assert_that!(cache.value(), eq("Value"));
    }
}
