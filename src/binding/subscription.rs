//! Scoped change subscriptions of a binding.

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::AbortHandle;

use crate::prefix::PrefixScope;
use crate::provider::{
    ProviderEvent,
    TranslationProvider,
};

/// Listener tasks owned by one binding instance.
///
/// Every task is aborted by [`Subscriptions::dispose`], which may be called
/// any number of times. Dropping the set disposes it.
#[derive(Debug, Default)]
pub struct Subscriptions {
    /// Running listener tasks
    handles: Vec<AbortHandle>,
}

impl Subscriptions {
    #[must_use]
    pub const fn new() -> Self {
        Self { handles: Vec::new() }
    }

    pub fn push(&mut self, handle: AbortHandle) {
        self.handles.push(handle);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Aborts every listener. A no-op once empty.
    pub fn dispose(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        tracing::trace!("Releasing {} subscriptions", self.handles.len());
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Runs `handler` for every provider event until the provider goes away.
///
/// The receiver is created before this returns, so events sent afterwards
/// are never missed.
pub(crate) fn on_provider_event<F>(
    runtime: &Handle,
    provider: &dyn TranslationProvider,
    handler: F,
) -> AbortHandle
where
    F: Fn(&ProviderEvent) + Send + 'static,
{
    let mut receiver = provider.subscribe();
    runtime
        .spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => handler(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("Missed {skipped} provider events, catching up");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
        .abort_handle()
}

/// Runs `handler` after every change of the scope prefix.
pub(crate) fn on_prefix_change<F>(runtime: &Handle, scope: &PrefixScope, handler: F) -> AbortHandle
where
    F: Fn() + Send + 'static,
{
    let mut receiver = scope.subscribe();
    runtime
        .spawn(async move {
            while receiver.changed().await.is_ok() {
                handler();
            }
        })
        .abort_handle()
}
