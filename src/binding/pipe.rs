//! Template filter binding.

use std::collections::BTreeMap;
use std::sync::{
    Arc,
    Mutex,
};

use futures::StreamExt;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::lock;
use super::subscription::{
    Subscriptions,
    on_prefix_change,
    on_provider_event,
};
use crate::error::TranslateError;
use crate::prefix::PrefixScope;
use crate::provider::{
    ProviderEvent,
    ProviderInterpolator,
    Translation,
    TranslationProvider,
};
use crate::resolve::{
    EqualityCache,
    parse_params,
    resolve_default,
    resolve_key,
};
use crate::types::{
    DefaultValue,
    InterpolationParams,
    ParamsInput,
    TranslateQuery,
};

/// One resolution request, replayed on change events.
#[derive(Debug, Clone)]
struct Request {
    /// Raw inputs as compared by the cache
    inputs: Value,
    /// Key or inline literal to translate
    query: TranslateQuery,
    /// Fallback on a miss
    defaults: Option<DefaultValue>,
    /// Parsed interpolation parameters
    params: Option<InterpolationParams>,
}

/// Mutable part of a pipe, guarded by one lock.
#[derive(Debug)]
struct PipeState {
    /// Last inputs and the value shown for them
    cache: EqualityCache<String>,
    /// Latest request, if any
    request: Option<Request>,
    /// Number of the latest request; older deliveries are dropped
    sequence: u64,
    /// Stream task of the latest pending request
    in_flight: Option<AbortHandle>,
}

/// State reachable from listener tasks.
struct PipeShared {
    /// Source of translations and language events
    provider: Arc<dyn TranslationProvider>,
    /// Enclosing scope, if any
    prefix: Option<Arc<PrefixScope>>,
    /// Runtime running listener and stream tasks
    runtime: Handle,
    state: Mutex<PipeState>,
    /// Published after every new value
    updates: watch::Sender<String>,
}

/// Translates a key (or an inline per-language literal) for display.
///
/// `transform` is cheap to call on every render: structurally equal inputs
/// return the cached value without touching the provider.
pub struct TranslatePipe {
    /// State shared with listener tasks
    shared: Arc<PipeShared>,
    /// Listeners of the latest request
    subscriptions: Subscriptions,
}

impl TranslatePipe {
    /// Binds to `provider`, resolving keys inside `prefix` when given.
    ///
    /// # Errors
    /// [`TranslateError::NoRuntime`] outside a Tokio runtime.
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        prefix: Option<Arc<PrefixScope>>,
    ) -> Result<Self, TranslateError> {
        let runtime = Handle::try_current()?;
        let (updates, _) = watch::channel(String::new());
        let shared = PipeShared {
            provider,
            prefix,
            runtime,
            state: Mutex::new(PipeState {
                cache: EqualityCache::new(String::new()),
                request: None,
                sequence: 0,
                in_flight: None,
            }),
            updates,
        };
        Ok(Self { shared: Arc::new(shared), subscriptions: Subscriptions::new() })
    }

    /// Translates `key`, falling back to `defaults` on a miss.
    ///
    /// An empty key is returned as is.
    pub fn transform(
        &mut self,
        key: &str,
        defaults: Option<DefaultValue>,
        params: Option<ParamsInput>,
    ) -> Result<String, TranslateError> {
        if key.is_empty() {
            return Ok(String::new());
        }
        self.run(TranslateQuery::Key(key.to_string()), defaults, params)
    }

    /// Shows the entry of `literal` for the active language.
    ///
    /// Without an entry the serialized literal is shown.
    pub fn transform_inline(
        &mut self,
        literal: BTreeMap<String, String>,
        params: Option<ParamsInput>,
    ) -> Result<String, TranslateError> {
        self.run(TranslateQuery::Inline(literal), None, params)
    }

    /// Serves equal inputs from the cache, otherwise records and resolves them.
    fn run(
        &mut self,
        query: TranslateQuery,
        defaults: Option<DefaultValue>,
        params: Option<ParamsInput>,
    ) -> Result<String, TranslateError> {
        let inputs = Value::Array(vec![
            query.to_value(),
            params.as_ref().map_or(Value::Null, ParamsInput::to_value),
            defaults.as_ref().map_or(Value::Null, DefaultValue::to_value),
        ]);

        {
            let state = lock(&self.shared.state);
            if let Some(value) = state.cache.hit(&inputs) {
                return Ok(value.clone());
            }
        }

        let params = parse_params(params.as_ref())?;
        let request = Request { inputs, query, defaults, params };
        {
            let mut state = lock(&self.shared.state);
            let shown = state.cache.value().clone();
            state.cache.remember(request.inputs.clone(), shown);
            state.request = Some(request);
        }
        self.shared.resolve();

        self.subscriptions.dispose();
        self.subscribe();

        Ok(self.value())
    }

    /// Listens for provider events and prefix changes.
    fn subscribe(&mut self) {
        let shared = Arc::clone(&self.shared);
        self.subscriptions.push(on_provider_event(
            &self.shared.runtime,
            self.shared.provider.as_ref(),
            move |event| shared.on_event(event),
        ));

        if let Some(scope) = &self.shared.prefix {
            let shared = Arc::clone(&self.shared);
            self.subscriptions.push(on_prefix_change(&self.shared.runtime, scope, move || {
                tracing::debug!("Prefix changed, re-resolving");
                shared.refresh();
            }));
        }
    }

    /// Value currently displayed.
    #[must_use]
    pub fn value(&self) -> String {
        lock(&self.shared.state).cache.value().clone()
    }

    /// Notified with every newly resolved value.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<String> {
        self.shared.updates.subscribe()
    }

    /// Releases all subscriptions and any pending request. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.subscriptions.dispose();
        if let Some(task) = lock(&self.shared.state).in_flight.take() {
            task.abort();
        }
    }
}

impl Drop for TranslatePipe {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for TranslatePipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatePipe")
            .field("value", &self.value())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl PipeShared {
    /// Re-resolves on events that can change the displayed value.
    fn on_event(self: &Arc<Self>, event: &ProviderEvent) {
        match event {
            ProviderEvent::TranslationChanged { lang } => {
                if *lang == self.provider.current_language() {
                    self.refresh();
                }
            }
            ProviderEvent::LanguageChanged { .. } | ProviderEvent::FallbackLanguageChanged { .. } => {
                self.refresh();
            }
        }
    }

    /// Forgets the cached inputs and resolves the latest request again.
    fn refresh(self: &Arc<Self>) {
        {
            let mut state = lock(&self.state);
            if state.request.is_none() {
                return;
            }
            state.cache.forget();
        }
        self.resolve();
    }

    /// Issues the latest request under a new sequence number.
    fn resolve(self: &Arc<Self>) {
        let (sequence, request) = {
            let mut state = lock(&self.state);
            let Some(request) = state.request.clone() else {
                return;
            };
            state.sequence += 1;
            if let Some(task) = state.in_flight.take() {
                task.abort();
            }
            (state.sequence, request)
        };

        match &request.query {
            TranslateQuery::Inline(literal) => {
                let miss = serde_json::to_string(literal).unwrap_or_default();
                let lang = self.provider.current_language();
                let value = resolve_default(
                    Some(&DefaultValue::PerLanguage(literal.clone())),
                    &lang,
                    request.params.as_ref(),
                    &miss,
                    &ProviderInterpolator(self.provider.as_ref()),
                );
                self.deliver(sequence, &request, value);
            }
            TranslateQuery::Key(key) => {
                let prefix = self.prefix.as_ref().map(|scope| scope.prefix());
                let path = resolve_key(key, prefix.as_deref());
                tracing::debug!("Resolving {path:?} (request #{sequence})");

                match self.provider.get(&path, request.params.as_ref()) {
                    Translation::Ready(value) => self.on_translation(sequence, &request, &path, value),
                    Translation::Pending(mut stream) => {
                        let shared = Arc::clone(self);
                        let request = request.clone();
                        let task = self.runtime.spawn(async move {
                            while let Some(item) = stream.next().await {
                                match item {
                                    Ok(value) => shared.on_translation(sequence, &request, &path, value),
                                    Err(error) => {
                                        tracing::warn!("Translation of {path:?} failed: {error}");
                                    }
                                }
                            }
                        });
                        let mut state = lock(&self.state);
                        if state.sequence == sequence {
                            state.in_flight = Some(task.abort_handle());
                        } else {
                            task.abort();
                        }
                    }
                }
            }
        }
    }

    /// Shows a delivered translation, or the default when it is a miss.
    fn on_translation(&self, sequence: u64, request: &Request, path: &str, value: String) {
        let display = if value == path {
            let lang = self.provider.current_language();
            resolve_default(
                request.defaults.as_ref(),
                &lang,
                request.params.as_ref(),
                path,
                &ProviderInterpolator(self.provider.as_ref()),
            )
        } else {
            value
        };
        self.deliver(sequence, request, display);
    }

    /// Stores and publishes `value` unless a newer request superseded it.
    ///
    /// Publishing happens under the state lock so watchers see values in the
    /// same order as `value()`.
    fn deliver(&self, sequence: u64, request: &Request, value: String) {
        let mut state = lock(&self.state);
        if state.sequence != sequence {
            tracing::trace!("Dropping stale delivery #{sequence} (latest #{})", state.sequence);
            return;
        }
        state.cache.remember(request.inputs.clone(), value.clone());
        self.updates.send_replace(value);
    }
}
