//! Deferred image loading and preload hints for critical stylesheets.

use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use log::{debug, info};

use crate::config::AssetsConfig;
use crate::dom::{Document, Element};
use crate::env::Env;
use crate::lifecycle::Disposer;
use crate::visibility::{Entry, WatchOptions, Watcher};

pub fn init<D: Document>(doc: &D, env: &Env<D::Element>, config: &AssetsConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("assets");

    if env.visibility.is_native() {
        watch_lazy_images(doc, env, config, &mut disposer);
    } else {
        debug!("No intersection support, leaving lazy images to the browser");
    }

    for href in &config.preload_styles {
        let Some(link) = doc.create_element("link") else {
            continue;
        };
        link.set_attribute("rel", "preload");
        link.set_attribute("href", href);
        link.set_attribute("as", "style");
        doc.append_to_head(&link);
    }

    disposer
}

fn watch_lazy_images<D: Document>(
    doc: &D,
    env: &Env<D::Element>,
    config: &AssetsConfig,
    disposer: &mut Disposer<D::Element>,
) {
    let images = doc.query_all(&config.lazy_image_selector);
    if images.is_empty() {
        return;
    }

    let slot: Rc<OnceCell<Weak<dyn Watcher<D::Element>>>> = Rc::new(OnceCell::new());
    let on_change = {
        let slot = slot.clone();
        let lazy_class = config.lazy_class.clone();
        move |entries: Vec<Entry<D::Element>>| {
            for entry in entries.into_iter().filter(|e| e.is_intersecting) {
                let image = entry.target;
                if let Some(source) = image.attribute("data-src").or_else(|| image.attribute("src")) {
                    image.set_attribute("src", &source);
                }
                image.remove_class(&lazy_class);
                if let Some(watcher) = slot.get().and_then(Weak::upgrade) {
                    watcher.unobserve(&image);
                }
            }
        }
    };

    let watcher = env
        .visibility
        .watch(&WatchOptions::default(), Box::new(on_change));
    let _ = slot.set(Rc::downgrade(&watcher));
    for image in &images {
        watcher.observe(image);
    }
    disposer.push_watcher(watcher);
    info!("Deferring {} images until visible", images.len());
}
