//! The slice of the DOM the landing features need.
//!
//! `web::WebDocument` implements these traits over web-sys; tests use the
//! in-memory document from `testing`.

use std::cell::Cell;

use crate::lifecycle::Subscription;

/// A DOM event as seen by a feature handler.
pub struct DomEvent<E> {
    target: Option<E>,
    default_prevented: Cell<bool>,
}

impl<E> DomEvent<E> {
    pub fn new(target: Option<E>) -> Self {
        Self {
            target,
            default_prevented: Cell::new(false),
        }
    }

    pub fn target(&self) -> Option<&E> {
        self.target.as_ref()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type Handler<E> = Box<dyn FnMut(&DomEvent<E>)>;

/// Global event targets that are not elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Window,
    Document,
}

pub trait Element: Clone + 'static {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    fn toggle_class(&self, class: &str) {
        if self.has_class(class) {
            self.remove_class(class);
        } else {
            self.add_class(class);
        }
    }

    /// Inline style property, empty when unset.
    fn style(&self, property: &str) -> String;
    fn set_style(&self, property: &str, value: &str);

    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    fn query(&self, selector: &str) -> Option<Self>;

    /// Whether `other` is this element or one of its descendants.
    fn contains(&self, other: &Self) -> bool;
    fn same_node(&self, other: &Self) -> bool;
    fn is_connected(&self) -> bool;

    fn offset_top(&self) -> f64;
    fn offset_height(&self) -> f64;
    fn scroll_height(&self) -> f64;

    fn append_child(&self, child: &Self);
    fn remove(&self);

    fn listen(&self, event: &str, handler: Handler<Self>) -> Subscription;
}

pub trait Document: Clone + 'static {
    type Element: Element;

    fn by_id(&self, id: &str) -> Option<Self::Element>;
    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn create_element(&self, tag: &str) -> Option<Self::Element>;

    fn append_to_body(&self, element: &Self::Element);
    fn append_to_head(&self, element: &Self::Element);

    fn scroll_y(&self) -> f64;
    /// Animated scroll of the window to a vertical offset.
    fn smooth_scroll_to(&self, top: f64);
    /// Updates the address bar fragment without navigating.
    fn push_fragment(&self, fragment: &str);

    /// Installs a stylesheet once and returns the class name to apply.
    fn install_styles(&self, key: &str, css: &str) -> Option<String>;

    fn listen(&self, surface: Surface, event: &str, handler: Handler<Self::Element>)
        -> Subscription;
}
