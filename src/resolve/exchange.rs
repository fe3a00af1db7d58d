//! Placeholder exchange for author supplied defaults.

use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

/// Alternatives are tried left to right at each position, so text already in
/// `{{...}}` form is consumed before the single-brace rule can see it.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<done>\{\{[^{}]*\}\})|\[\{\s*(?P<markup>\w+)\s*\}\]|\{\s*(?P<brace>\w+)\s*\}|\[\s*(?P<bracket>\w+)\s*\]",
    )
    .expect("valid placeholder pattern")
});

/// Rewrites author placeholders into the interpolation syntax `{{name}}`.
///
/// Recognized forms:
/// - `{name}`
/// - `[{ name }]`
/// - `[name]`
///
/// Existing `{{name}}` tokens are left as they are.
///
/// Any bracketed word counts as a placeholder, so literal text such as
/// `Press [Enter]` becomes `Press {{Enter}}` and interpolates to `Press `
/// unless a parameter named `Enter` exists. Bracketed text that is not a
/// single word (`[Enter key]`) is kept.
///
/// # Examples
/// ```
/// use translate_fallback::resolve::exchange_params;
///
/// assert_eq!(exchange_params("Hello {p1}"), "Hello {{p1}}");
/// assert_eq!(exchange_params("Hello [{ p1 }]"), "Hello {{p1}}");
/// assert_eq!(exchange_params("Hello {{p1}}"), "Hello {{p1}}");
/// ```
#[must_use]
pub fn exchange_params(text: &str) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            ["markup", "brace", "bracket"]
                .iter()
                .find_map(|group| caps.name(group))
                .map_or_else(
                    || caps.get(0).map_or_else(String::new, |m| m.as_str().to_string()),
                    |name| format!("{{{{{}}}}}", name.as_str()),
                )
        })
        .into_owned()
}
