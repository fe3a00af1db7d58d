//! Key prefix owned by an enclosing scope.

use tokio::sync::watch;

use crate::config::AdapterSettings;

/// Prefix prepended to every key resolved inside a scope.
///
/// Bindings hold it through an `Arc` and re-resolve when it changes.
#[derive(Debug)]
pub struct PrefixScope {
    /// Current prefix; receivers see every change
    sender: watch::Sender<String>,
}

impl PrefixScope {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let (sender, _) = watch::channel(prefix.into());
        Self { sender }
    }

    /// Top-level scope starting at the configured root prefix.
    #[must_use]
    pub fn from_settings(settings: &AdapterSettings) -> Self {
        Self::new(settings.root_prefix.clone())
    }

    #[must_use]
    pub fn prefix(&self) -> String {
        self.sender.borrow().clone()
    }

    /// Replaces the prefix, notifying subscribers only on an actual change.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        let changed = self.sender.send_if_modified(|current| {
            if *current == prefix {
                false
            } else {
                *current = prefix.clone();
                true
            }
        });
        if changed {
            tracing::debug!("Prefix changed to {prefix:?}");
        }
    }

    /// Stream of prefix changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for PrefixScope {
    fn default() -> Self {
        Self::new(String::new())
    }
}
