//! Translation key resolution.

/// Joins an enclosing-scope prefix and a key into a catalog lookup path.
///
/// The prefix is prepended verbatim; callers include their own separator
/// (`"test."` + `"test"` is `"test.test"`).
#[must_use]
pub fn resolve_key(key: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}{key}"),
        _ => key.to_string(),
    }
}
