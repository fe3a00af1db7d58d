//! The external translation provider capability.
//!
//! Catalog storage, loading and language negotiation live behind this trait;
//! the resolver and the bindings only read from it.

mod interpolate;

use futures::stream::BoxStream;
use tokio::sync::broadcast;

pub use interpolate::{
    DefaultInterpolator,
    Interpolate,
    display_value,
};

use crate::error::ProviderError;
use crate::types::InterpolationParams;

/// Result of a catalog lookup. On a miss the delivered value is the key itself.
pub enum Translation {
    /// Available right away
    Ready(String),
    /// Delivered later, possibly more than once
    Pending(BoxStream<'static, Result<String, ProviderError>>),
}

impl std::fmt::Debug for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.debug_tuple("Pending").field(&"<BoxStream>").finish(),
        }
    }
}

/// Change notifications emitted by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Catalog entries for `lang` were added or replaced
    TranslationChanged {
        /// Affected language
        lang: String,
    },
    /// The active language switched
    LanguageChanged {
        /// New active language
        lang: String,
    },
    /// The fallback language switched
    FallbackLanguageChanged {
        /// New fallback language
        lang: String,
    },
}

/// Translation provider injected into the bindings.
pub trait TranslationProvider: Send + Sync {
    /// Looks up `key`, interpolating `params` into the catalog entry.
    fn get(&self, key: &str, params: Option<&InterpolationParams>) -> Translation;

    /// Currently active language code.
    fn current_language(&self) -> String;

    /// Shared interpolation primitive used for defaults.
    fn interpolate(&self, template: &str, params: Option<&InterpolationParams>) -> Option<String> {
        DefaultInterpolator.interpolate(template, params)
    }

    /// New receiver for change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

/// Adapts a provider to the [`Interpolate`] seam of the resolver.
pub(crate) struct ProviderInterpolator<'a>(pub(crate) &'a dyn TranslationProvider);

impl Interpolate for ProviderInterpolator<'_> {
    fn interpolate(&self, template: &str, params: Option<&InterpolationParams>) -> Option<String> {
        self.0.interpolate(template, params)
    }
}
