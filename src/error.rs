use thiserror::Error;

/// Errors surfaced to callers of the bindings.
///
/// Malformed *defaults* never show up here: they fall back to literal text.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Relaxed parameter text that is still not valid JSON after normalization
    #[error("Wrong parameter in TranslatePipe. Expected a valid Object, received: {input}")]
    MalformedParameterSyntax {
        /// Parameter text as written by the author
        input: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
    /// Parameter text that parses, but not to an object
    #[error("Wrong parameter in TranslatePipe. Expected an Object, received: {input}")]
    ParameterNotObject {
        /// Parameter text as written by the author
        input: String,
    },
    /// A binding was created outside a Tokio runtime
    #[error("Translation bindings must be created inside a Tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Failure reported by a translation provider while delivering a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The catalog for the language could not be loaded
    #[error("Failed to load translations for '{lang}': {message}")]
    Load {
        /// Language whose catalog failed
        lang: String,
        /// Provider specific description
        message: String,
    },
    /// The provider stopped before delivering a value
    #[error("Translation provider closed")]
    Closed,
}
