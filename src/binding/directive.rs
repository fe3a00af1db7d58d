//! Element text binding.
//!
//! The element's original content doubles as the default: markup such as
//! `<span translate="greeting">{en: 'Hello', fa: 'سلام'}</span>` shows the
//! entry for the active language until the catalog has one.

use std::sync::{
    Arc,
    Mutex,
};

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::lock;
use super::subscription::{
    Subscriptions,
    on_prefix_change,
    on_provider_event,
};
use crate::config::AdapterSettings;
use crate::error::TranslateError;
use crate::prefix::PrefixScope;
use crate::provider::{
    ProviderInterpolator,
    Translation,
    TranslationProvider,
};
use crate::resolve::{
    resolve_default,
    resolve_key,
};
use crate::types::{
    DefaultValue,
    InterpolationParams,
};

/// Inputs and request bookkeeping of a directive.
#[derive(Debug, Default)]
struct DirectiveState {
    /// Key bound to the element, if any
    key: Option<String>,
    /// Interpolation parameters
    values: Option<InterpolationParams>,
    /// Number of the latest lookup; older deliveries are dropped
    sequence: u64,
    /// Stream task of the latest pending lookup
    in_flight: Option<AbortHandle>,
}

/// State reachable from listener tasks.
struct DirectiveShared {
    /// Source of translations and language events
    provider: Arc<dyn TranslationProvider>,
    /// Enclosing scope, if any
    prefix: Option<Arc<PrefixScope>>,
    /// Runtime running listener and stream tasks
    runtime: Handle,
    /// Prefix of the text shown when the provider fails
    not_found_message: String,
    /// Element content captured at creation
    defaults: DefaultValue,
    state: Mutex<DirectiveState>,
    /// Current element content
    content: watch::Sender<String>,
}

/// Replaces the content of one element with the translation of its key.
pub struct TranslateDirective {
    /// State shared with listener tasks
    shared: Arc<DirectiveShared>,
    /// Active listeners
    subscriptions: Subscriptions,
}

impl TranslateDirective {
    /// Binds to an element whose current content is `initial_content`.
    ///
    /// # Errors
    /// [`TranslateError::NoRuntime`] outside a Tokio runtime.
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        prefix: Option<Arc<PrefixScope>>,
        initial_content: &str,
        settings: &AdapterSettings,
    ) -> Result<Self, TranslateError> {
        let runtime = Handle::try_current()?;
        let captured =
            if settings.trim_markup_defaults { initial_content.trim() } else { initial_content };
        let (content, _) = watch::channel(initial_content.to_string());
        let shared = DirectiveShared {
            provider,
            prefix,
            runtime,
            not_found_message: settings.not_found_message.clone(),
            defaults: DefaultValue::Text(captured.to_string()),
            state: Mutex::new(DirectiveState::default()),
            content,
        };
        Ok(Self { shared: Arc::new(shared), subscriptions: Subscriptions::new() })
    }

    /// Starts listening for catalog, language and prefix changes.
    pub fn on_init(&mut self) {
        self.subscriptions.dispose();

        let shared = Arc::clone(&self.shared);
        self.subscriptions.push(on_provider_event(
            &self.shared.runtime,
            self.shared.provider.as_ref(),
            move |event| {
                tracing::debug!("Provider event {event:?}, re-translating");
                shared.translate();
            },
        ));

        if let Some(scope) = &self.shared.prefix {
            let shared = Arc::clone(&self.shared);
            self.subscriptions.push(on_prefix_change(&self.shared.runtime, scope, move || {
                shared.translate();
            }));
        }
    }

    /// Applies new inputs and translates again.
    pub fn set_inputs(&mut self, key: Option<&str>, values: Option<InterpolationParams>) {
        {
            let mut state = lock(&self.shared.state);
            state.key = key.map(str::to_string);
            state.values = values;
        }
        self.shared.translate();
    }

    /// Current element content.
    #[must_use]
    pub fn content(&self) -> String {
        self.shared.content.borrow().clone()
    }

    /// Notified on every content change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<String> {
        self.shared.content.subscribe()
    }

    /// Releases every subscription and pending lookup. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.subscriptions.dispose();
        if let Some(task) = lock(&self.shared.state).in_flight.take() {
            task.abort();
        }
    }
}

impl Drop for TranslateDirective {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for TranslateDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslateDirective")
            .field("content", &self.content())
            .field("defaults", &self.shared.defaults)
            .finish_non_exhaustive()
    }
}

impl DirectiveShared {
    /// Looks up the current key under a new sequence number.
    fn translate(self: &Arc<Self>) {
        let (sequence, key, values) = {
            let mut state = lock(&self.state);
            state.sequence += 1;
            if let Some(task) = state.in_flight.take() {
                task.abort();
            }
            (state.sequence, state.key.clone().unwrap_or_default(), state.values.clone())
        };

        if key.is_empty() {
            self.apply_default(sequence, values.as_ref(), "");
            return;
        }

        let prefix = self.prefix.as_ref().map(|scope| scope.prefix());
        let path = resolve_key(&key, prefix.as_deref());
        match self.provider.get(&path, values.as_ref()) {
            Translation::Ready(value) => self.on_translation(sequence, values.as_ref(), &path, value),
            Translation::Pending(mut stream) => {
                let shared = Arc::clone(self);
                let task = self.runtime.spawn(async move {
                    while let Some(item) = stream.next().await {
                        match item {
                            Ok(value) => shared.on_translation(sequence, values.as_ref(), &path, value),
                            Err(error) => {
                                tracing::warn!("Translation of {path:?} failed: {error}");
                                let message = format!("{}[{path}]", shared.not_found_message);
                                shared.render(sequence, message);
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

    /// Shows a delivered translation, or the default when it is a miss.
    fn on_translation(
        &self,
        sequence: u64,
        values: Option<&InterpolationParams>,
        path: &str,
        value: String,
    ) {
        if value == path {
            self.apply_default(sequence, values, path);
        } else {
            self.render(sequence, value);
        }
    }

    /// Renders the captured default for the active language.
    fn apply_default(&self, sequence: u64, values: Option<&InterpolationParams>, miss_value: &str) {
        let lang = self.provider.current_language();
        let text = resolve_default(
            Some(&self.defaults),
            &lang,
            values,
            miss_value,
            &ProviderInterpolator(self.provider.as_ref()),
        );
        self.render(sequence, text);
    }

    /// Replaces the content unless a newer lookup superseded `sequence`.
    fn render(&self, sequence: u64, text: String) {
        let state = lock(&self.state);
        if state.sequence != sequence {
            tracing::trace!("Dropping stale delivery #{sequence} (latest #{})", state.sequence);
            return;
        }
        self.content.send_replace(text);
    }
}
