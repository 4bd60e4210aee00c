//! Scroll-triggered fade-in for cards and section headers.
//!
//! Every matching element is tagged once, in document order, with the pending
//! class and a stagger delay of `index * stagger_ms`. When the watcher reports
//! it intersecting, it gains the visible class and its delay becomes the
//! `animation-delay`. The transition is add-only: once visible, an element is
//! never touched again by this module.

use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use log::{debug, info};

use crate::config::RevealConfig;
use crate::dom::{Document, Element};
use crate::env::Env;
use crate::lifecycle::Disposer;
use crate::visibility::{Entry, WatchOptions, Watcher};

/// Attribute holding the stagger delay in milliseconds.
pub const DELAY_ATTRIBUTE: &str = "data-delay";

pub fn stagger_delay(index: usize, stagger_ms: u32) -> u64 {
    index as u64 * u64::from(stagger_ms)
}

pub fn init<D: Document>(doc: &D, env: &Env<D::Element>, config: &RevealConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("reveal");

    let elements = doc.query_all(&config.selector);
    if elements.is_empty() {
        debug!("No revealable elements on this page");
        return disposer;
    }

    let options = WatchOptions {
        threshold: config.threshold,
        root_margin: config.root_margin.clone(),
    };

    // The callback needs the watcher to unobserve, and the watcher needs the
    // callback to exist first.
    let slot: Rc<OnceCell<Weak<dyn Watcher<D::Element>>>> = Rc::new(OnceCell::new());
    let on_change = {
        let slot = slot.clone();
        let visible_class = config.visible_class.clone();
        move |entries: Vec<Entry<D::Element>>| {
            for entry in entries {
                if !entry.is_intersecting {
                    continue;
                }
                if reveal(&entry.target, &visible_class) {
                    if let Some(watcher) = slot.get().and_then(Weak::upgrade) {
                        watcher.unobserve(&entry.target);
                    }
                }
            }
        }
    };
    let watcher = env.visibility.watch(&options, Box::new(on_change));
    let _ = slot.set(Rc::downgrade(&watcher));
    disposer.push_watcher(watcher.clone());

    for (index, element) in elements.iter().enumerate() {
        element.add_class(&config.pending_class);
        element.set_attribute(
            DELAY_ATTRIBUTE,
            &stagger_delay(index, config.stagger_ms).to_string(),
        );
        watcher.observe(element);
    }

    info!(
        "Reveal engine watching {} elements (native: {})",
        elements.len(),
        env.visibility.is_native()
    );
    disposer
}

/// Applies the visible state. Returns false when it was already applied.
fn reveal<E: Element>(element: &E, visible_class: &str) -> bool {
    if element.has_class(visible_class) {
        return false;
    }
    element.add_class(visible_class);
    if let Some(delay) = element.attribute(DELAY_ATTRIBUTE) {
        element.set_style("animation-delay", &format!("{}ms", delay));
    }
    true
}
