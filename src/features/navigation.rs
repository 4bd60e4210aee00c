//! Mobile menu, sticky navbar state and active-section highlighting.

use std::rc::Rc;

use log::{debug, info};

use crate::config::NavigationConfig;
use crate::dom::{Document, DomEvent, Element, Surface};
use crate::lifecycle::Disposer;

/// Vertical extent of a page section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Index of the first span containing `y`, in document order.
pub fn section_at(spans: &[Span], y: f64) -> Option<usize> {
    spans.iter().position(|span| span.contains(y))
}

pub fn init<D: Document>(doc: &D, config: &NavigationConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("navigation");
    let links = Rc::new(doc.query_all(&config.link_selector));

    match (doc.by_id(&config.toggle_id), doc.by_id(&config.menu_id)) {
        (Some(toggle), Some(menu)) => wire_menu(doc, config, &links, toggle, menu, &mut disposer),
        _ => debug!("Navigation toggle or menu missing, mobile menu disabled"),
    }

    if let Some(navbar) = doc.query(&config.navbar_selector) {
        let threshold = config.scrolled_after_px;
        let class = config.scrolled_class.clone();
        let doc_handle = doc.clone();
        disposer.push(doc.listen(
            Surface::Window,
            "scroll",
            Box::new(move |_: &DomEvent<D::Element>| {
                if doc_handle.scroll_y() > threshold {
                    navbar.add_class(&class);
                } else {
                    navbar.remove_class(&class);
                }
            }),
        ));
    }

    let sections = Rc::new(doc.query_all(&config.section_selector));
    if !sections.is_empty() && !links.is_empty() {
        let highlight = {
            let doc = doc.clone();
            let links = links.clone();
            let sections = sections.clone();
            let offset = config.highlight_offset_px;
            let class = config.active_class.clone();
            move || highlight_section(&doc, &links, &sections, offset, &class)
        };
        highlight();
        disposer.push(doc.listen(
            Surface::Window,
            "scroll",
            Box::new(move |_: &DomEvent<D::Element>| highlight()),
        ));
    }

    info!(
        "Navigation wired: {} links, {} sections",
        links.len(),
        sections.len()
    );
    disposer
}

fn wire_menu<D: Document>(
    doc: &D,
    config: &NavigationConfig,
    links: &Rc<Vec<D::Element>>,
    toggle: D::Element,
    menu: D::Element,
    disposer: &mut Disposer<D::Element>,
) {
    let class = config.open_class.clone();

    let close = {
        let toggle = toggle.clone();
        let menu = menu.clone();
        let class = class.clone();
        Rc::new(move || {
            menu.remove_class(&class);
            toggle.remove_class(&class);
        })
    };

    disposer.push(toggle.listen("click", {
        let toggle = toggle.clone();
        let menu = menu.clone();
        Box::new(move |_: &DomEvent<D::Element>| {
            menu.toggle_class(&class);
            toggle.toggle_class(&class);
        })
    }));

    for link in links.iter() {
        let close = close.clone();
        disposer.push(link.listen("click", Box::new(move |_: &DomEvent<D::Element>| close())));
    }

    disposer.push(doc.listen(
        Surface::Document,
        "click",
        Box::new(move |event: &DomEvent<D::Element>| {
            let inside = event
                .target()
                .map(|target| toggle.contains(target) || menu.contains(target))
                .unwrap_or(false);
            if !inside {
                close();
            }
        }),
    ));
}

fn highlight_section<D: Document>(
    doc: &D,
    links: &[D::Element],
    sections: &[D::Element],
    offset: f64,
    class: &str,
) {
    let spans: Vec<Span> = sections
        .iter()
        .map(|s| Span {
            top: s.offset_top(),
            height: s.offset_height(),
        })
        .collect();
    let Some(index) = section_at(&spans, doc.scroll_y() + offset) else {
        return;
    };
    let Some(id) = sections[index].attribute("id") else {
        return;
    };
    let href = format!("#{}", id);
    for link in links {
        link.remove_class(class);
    }
    for link in links {
        if link.attribute("href").as_deref() == Some(href.as_str()) {
            link.add_class(class);
        }
    }
}
