//! Core types shared by the resolver and the bindings.

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

/// Named values substituted into `{{name}}` placeholders.
pub type InterpolationParams = Map<String, Value>;

/// Author supplied fallback for a translation miss.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Literal text, or a relaxed object literal such as `{en: 'Hi', fa: 'سلام'}`.
    Text(String),
    /// Language code to fallback text.
    PerLanguage(BTreeMap<String, String>),
}

impl DefaultValue {
    /// Empty text and empty maps count as "no default".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::PerLanguage(map) => map.is_empty(),
        }
    }

    /// Value-level view used for change detection.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::PerLanguage(map) => Value::Object(
                map.iter().map(|(lang, text)| (lang.clone(), Value::String(text.clone()))).collect(),
            ),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<BTreeMap<String, String>> for DefaultValue {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::PerLanguage(map)
    }
}

/// Interpolation parameters as handed to a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsInput {
    /// Already structured
    Map(InterpolationParams),
    /// Relaxed object literal text, e.g. `{p1: 'value'}`
    Relaxed(String),
}

impl ParamsInput {
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Map(map) => Value::Object(map.clone()),
            Self::Relaxed(text) => Value::String(text.clone()),
        }
    }
}

impl From<InterpolationParams> for ParamsInput {
    fn from(map: InterpolationParams) -> Self {
        Self::Map(map)
    }
}

impl From<&str> for ParamsInput {
    fn from(text: &str) -> Self {
        Self::Relaxed(text.to_string())
    }
}

/// What the pipe was asked to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateQuery {
    /// Catalog key, prefixed by the enclosing scope
    Key(String),
    /// Per-language literal used in place of a key
    Inline(BTreeMap<String, String>),
}

impl TranslateQuery {
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Key(key) => Value::String(key.clone()),
            Self::Inline(map) => DefaultValue::PerLanguage(map.clone()).to_value(),
        }
    }
}
