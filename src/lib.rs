//! translate-fallback
//!
//! 翻訳キーの解決、言語ごとのデフォルト値へのフォールバック、パラメータ補間

pub mod binding;
pub mod config;
pub mod context;
pub mod error;
pub mod prefix;
pub mod provider;
pub mod resolve;
#[cfg(test)]
mod test_utils;
pub mod types;

pub use binding::{
    TranslateDirective,
    TranslatePipe,
};
pub use context::TranslateContext;
pub use error::{
    ProviderError,
    TranslateError,
};
pub use prefix::PrefixScope;
pub use provider::{
    Translation,
    TranslationProvider,
};
pub use types::{
    DefaultValue,
    InterpolationParams,
    ParamsInput,
    TranslateQuery,
};
