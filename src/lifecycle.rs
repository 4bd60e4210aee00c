//! Handles for everything a feature registers with the host.
//!
//! A [`Subscription`] behaves like a gloo-timers handle: dropping it cancels
//! the underlying listener, timer or frame request, and [`Subscription::forget`]
//! keeps it alive for the rest of the page.

use std::rc::Rc;

use log::debug;

use crate::visibility::Watcher;

#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Leaks the subscription so it is never cancelled.
    ///
    /// The cancel closure usually owns the JS callback, so it must be leaked
    /// rather than dropped.
    pub fn forget(mut self) {
        if let Some(cancel) = self.cancel.take() {
            std::mem::forget(cancel);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Everything one feature registered, torn down together.
#[must_use = "dropping a Disposer tears the feature down"]
pub struct Disposer<E> {
    feature: &'static str,
    subscriptions: Vec<Subscription>,
    watchers: Vec<Rc<dyn Watcher<E>>>,
}

impl<E> Disposer<E> {
    pub fn new(feature: &'static str) -> Self {
        Self {
            feature,
            subscriptions: Vec::new(),
            watchers: Vec::new(),
        }
    }

    pub fn feature(&self) -> &'static str {
        self.feature
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn push_watcher(&mut self, watcher: Rc<dyn Watcher<E>>) {
        self.watchers.push(watcher);
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty() && self.watchers.is_empty()
    }

    pub fn dispose(self) {
        debug!("Disposing {}", self.feature);
        // Drop does the work.
    }

    pub fn forget(mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.forget();
        }
        // Watchers stay connected as long as nobody calls disconnect.
        std::mem::forget(std::mem::take(&mut self.watchers));
    }
}

impl<E> Drop for Disposer<E> {
    fn drop(&mut self) {
        for watcher in self.watchers.drain(..) {
            watcher.disconnect();
        }
        self.subscriptions.clear();
    }
}
