//! Viewport visibility detection.
//!
//! Features never talk to `IntersectionObserver` directly. They ask a
//! [`Visibility`] for a [`Watcher`], which reports batches of [`Entry`]s. The
//! host picks the implementation once at startup: the observer-backed one in
//! `web::observer`, or [`AlwaysVisible`] when the browser has no intersection
//! support.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct WatchOptions {
    /// Fraction of the target that must be visible to count as intersecting.
    pub threshold: f64,
    /// CSS margin applied to the viewport, e.g. `0px 0px -50px 0px`.
    pub root_margin: String,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: "0px".to_string(),
        }
    }
}

/// One element's visibility change.
#[derive(Debug, Clone)]
pub struct Entry<E> {
    pub target: E,
    pub is_intersecting: bool,
    pub ratio: f64,
}

pub type OnChange<E> = Box<dyn FnMut(Vec<Entry<E>>)>;

pub trait Watcher<E> {
    fn observe(&self, target: &E);
    fn unobserve(&self, target: &E);
    fn disconnect(&self);
}

pub trait Visibility<E> {
    /// Whether this implementation tracks the real viewport.
    fn is_native(&self) -> bool;

    fn watch(&self, options: &WatchOptions, on_change: OnChange<E>) -> Rc<dyn Watcher<E>>;
}

/// Fallback that reports every target as fully visible the moment it is
/// observed, so nothing waiting for a reveal stays hidden.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysVisible;

struct ImmediateWatcher<E> {
    on_change: RefCell<OnChange<E>>,
}

impl<E: Clone> Watcher<E> for ImmediateWatcher<E> {
    fn observe(&self, target: &E) {
        let entry = Entry {
            target: target.clone(),
            is_intersecting: true,
            ratio: 1.0,
        };
        (self.on_change.borrow_mut())(vec![entry]);
    }

    fn unobserve(&self, _target: &E) {}

    fn disconnect(&self) {}
}

impl<E: Clone + 'static> Visibility<E> for AlwaysVisible {
    fn is_native(&self) -> bool {
        false
    }

    fn watch(&self, _options: &WatchOptions, on_change: OnChange<E>) -> Rc<dyn Watcher<E>> {
        Rc::new(ImmediateWatcher {
            on_change: RefCell::new(on_change),
        })
    }
}
