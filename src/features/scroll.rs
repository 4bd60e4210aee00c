//! Smooth scrolling for in-page anchors.

use log::{debug, info};

use crate::config::ScrollConfig;
use crate::dom::{Document, DomEvent, Element};
use crate::lifecycle::Disposer;

/// Scroll offset that puts a target just below the fixed header.
pub fn scroll_target(offset_top: f64, header_offset: f64) -> f64 {
    (offset_top - header_offset).max(0.0)
}

pub fn init<D: Document>(doc: &D, config: &ScrollConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("scroll");
    let anchors = doc.query_all(&config.anchor_selector);

    for anchor in &anchors {
        let doc = doc.clone();
        let link = anchor.clone();
        let header_offset = config.header_offset_px;
        disposer.push(anchor.listen(
            "click",
            Box::new(move |event: &DomEvent<D::Element>| {
                event.prevent_default();
                let Some(fragment) = link.attribute("href") else {
                    return;
                };
                if fragment.len() <= 1 {
                    return;
                }
                let Some(target) = doc.query(&fragment) else {
                    debug!("No element for anchor {}", fragment);
                    return;
                };
                doc.smooth_scroll_to(scroll_target(target.offset_top(), header_offset));
                doc.push_fragment(&fragment);
            }),
        ));
    }

    info!("Smooth scrolling wired for {} anchors", anchors.len());
    disposer
}
