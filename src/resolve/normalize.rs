//! Relaxed object literal normalization.
//!
//! Templates carry objects such as `{n:1}`, `{'n':1}` or `{n:'v'}`. These
//! rewrites turn them into strict JSON (`{"n":1}`, `{"n":"v"}`) for
//! `serde_json`. This is a best-effort text rewrite, not a grammar: nested
//! quotes, non-word keys and values containing `'` may come out invalid, and
//! callers must treat a parse failure as "not an object literal".

use std::sync::LazyLock;

use regex::Regex;

/// `key:` or `'key':`
#[allow(clippy::expect_used)]
static RELAXED_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(')?(\w+)(')?(\s)?:").expect("valid key pattern"));

/// `: 'value'`
#[allow(clippy::expect_used)]
static RELAXED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\s)?(')(.*?)(')").expect("valid value pattern"));

/// Rewrites a relaxed object literal into strict JSON text.
///
/// Never fails; the output may still be invalid JSON for input outside the
/// relaxed grammar (unquoted word keys, single-quoted values).
#[must_use]
pub fn normalize_relaxed_json(text: &str) -> String {
    let quoted_keys = RELAXED_KEY.replace_all(text, "\"${2}\":");
    RELAXED_VALUE.replace_all(&quoted_keys, ":\"${3}\"").into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::{
        Value,
        json,
    };

    use super::*;

    #[rstest]
    #[case::unquoted_number("{n:1}", json!({"n": 1}))]
    #[case::quoted_key("{'n':1}", json!({"n": 1}))]
    #[case::single_quoted_value("{n:'v'}", json!({"n": "v"}))]
    #[case::spaces("{ p1: 'Param 1' }", json!({"p1": "Param 1"}))]
    #[case::per_language(
        "{en: 'Hello, [p1]', fa: 'سلام, [p1]'}",
        json!({"en": "Hello, [p1]", "fa": "سلام, [p1]"})
    )]
    #[case::placeholders(
        "{ en: 'Hello [{ p1 }]', fa: 'سلام [{ p1 }]' }",
        json!({"en": "Hello [{ p1 }]", "fa": "سلام [{ p1 }]"})
    )]
    #[case::already_strict(r#"{"n":"v"}"#, json!({"n": "v"}))]
    #[case::mixed("{a: 1, 'b': 'two', c: true}", json!({"a": 1, "b": "two", "c": true}))]
    fn normalized_text_parses(#[case] input: &str, #[case] expected: Value) {
        let normalized = normalize_relaxed_json(input);

        let parsed: Value = serde_json::from_str(&normalized).unwrap();
        assert_that!(parsed, eq(&expected));
    }

    #[rstest]
    #[case::plain_text("Default Value")]
    #[case::text_with_colon("Time: now")]
    #[case::placeholder_text("Default Value [{ p1 }]")]
    fn plain_text_does_not_parse_as_object(#[case] input: &str) {
        let normalized = normalize_relaxed_json(input);

        let parsed = serde_json::from_str::<Value>(&normalized);
        assert_that!(parsed.is_ok_and(|v| v.is_object()), eq(false));
    }

    #[rstest]
    fn text_without_colons_is_untouched() {
        assert_that!(normalize_relaxed_json("Hello world"), eq("Hello world"));
    }
}
