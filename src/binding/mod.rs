//! Presentation bindings wired to provider and prefix change events.

mod directive;
mod pipe;
mod subscription;

use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError,
};

pub use directive::TranslateDirective;
pub use pipe::TranslatePipe;
pub use subscription::Subscriptions;

/// Binding state stays usable even if a listener panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
