use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{js_sys, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use super::document::WebElement;
use crate::visibility::{AlwaysVisible, Entry, OnChange, Visibility, WatchOptions, Watcher};

/// Picks the observer-backed implementation when the browser has one.
pub fn detect(window: &Window) -> Rc<dyn Visibility<WebElement>> {
    let native = js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
    if native {
        Rc::new(ObserverVisibility)
    } else {
        debug!("IntersectionObserver missing, everything counts as visible");
        Rc::new(AlwaysVisible)
    }
}

pub struct ObserverVisibility;

struct ObserverWatcher {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Watcher<WebElement> for ObserverWatcher {
    fn observe(&self, target: &WebElement) {
        self.observer.observe(target.raw());
    }

    fn unobserve(&self, target: &WebElement) {
        self.observer.unobserve(target.raw());
    }

    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Visibility<WebElement> for ObserverVisibility {
    fn is_native(&self) -> bool {
        true
    }

    fn watch(&self, options: &WatchOptions, on_change: OnChange<WebElement>) -> Rc<dyn Watcher<WebElement>> {
        let on_change = Rc::new(RefCell::new(on_change));

        let callback = {
            let on_change = on_change.clone();
            Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, _: IntersectionObserver| {
                    let batch = entries
                        .iter()
                        .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                        .map(|entry| Entry {
                            target: WebElement::new(entry.target()),
                            is_intersecting: entry.is_intersecting(),
                            ratio: entry.intersection_ratio(),
                        })
                        .collect();
                    (on_change.borrow_mut())(batch);
                },
            )
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => Rc::new(ObserverWatcher {
                observer,
                _callback: callback,
            }),
            Err(err) => {
                warn!("IntersectionObserver rejected {:?}: {:?}", options, err);
                AlwaysVisible.watch(
                    options,
                    Box::new(move |batch: Vec<Entry<WebElement>>| (on_change.borrow_mut())(batch)),
                )
            }
        }
    }
}
