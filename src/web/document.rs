use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{EventTarget, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::dom::{Document, DomEvent, Element, Handler, Surface};
use crate::error::{LandingError, Result};
use crate::lifecycle::Subscription;

#[derive(Clone, Debug)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        WebElement(element)
    }

    pub fn raw(&self) -> &web_sys::Element {
        &self.0
    }

    fn html(&self) -> Option<&HtmlElement> {
        self.0.dyn_ref::<HtmlElement>()
    }
}

fn listen_on(target: &EventTarget, event: &str, mut handler: Handler<WebElement>) -> Subscription {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let target = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(WebElement);
        let dom_event = DomEvent::new(target);
        handler(&dom_event);
        if dom_event.default_prevented() {
            event.prevent_default();
        }
    });

    if let Err(err) = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
        warn!("Could not listen for {}: {:?}", event, err);
        return Subscription::noop();
    }

    let target = target.clone();
    let event = event.to_string();
    Subscription::new(move || {
        let _ = target.remove_event_listener_with_callback(&event, callback.as_ref().unchecked_ref());
    })
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn style(&self, property: &str) -> String {
        self.html()
            .and_then(|html| html.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(html) = self.html() else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            warn!("Could not set {} to {}: {:?}", property, value, err);
        }
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn contains(&self, other: &Self) -> bool {
        let node: &web_sys::Node = other.0.as_ref();
        self.0.contains(Some(node))
    }

    fn same_node(&self, other: &Self) -> bool {
        let node: &web_sys::Node = other.0.as_ref();
        self.0.is_same_node(Some(node))
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    fn offset_top(&self) -> f64 {
        self.html().map(|h| f64::from(h.offset_top())).unwrap_or(0.0)
    }

    fn offset_height(&self) -> f64 {
        self.html().map(|h| f64::from(h.offset_height())).unwrap_or(0.0)
    }

    fn scroll_height(&self) -> f64 {
        f64::from(self.0.scroll_height())
    }

    fn append_child(&self, child: &Self) {
        if let Err(err) = self.0.append_child(&child.0) {
            warn!("Could not append child: {:?}", err);
        }
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn listen(&self, event: &str, handler: Handler<Self>) -> Subscription {
        listen_on(&self.0, event, handler)
    }
}

#[derive(Clone, Debug)]
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(LandingError::MissingGlobal("window"))?;
        let document = window
            .document()
            .ok_or(LandingError::MissingGlobal("document"))?;
        Ok(WebDocument { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn raw(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    /// Text of the inline JSON configuration block, if the page has one.
    pub fn config_json(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)
            .and_then(|script| script.text_content())
            .filter(|json| !json.trim().is_empty())
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query(&self, selector: &str) -> Option<WebElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(WebElement)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            warn!("Invalid selector {}", selector);
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement)
            .collect()
    }

    fn create_element(&self, tag: &str) -> Option<WebElement> {
        self.document.create_element(tag).ok().map(WebElement)
    }

    fn append_to_body(&self, element: &WebElement) {
        match self.document.body() {
            Some(body) => {
                let _ = body.append_child(element.raw());
            }
            None => warn!("No body to append to"),
        }
    }

    fn append_to_head(&self, element: &WebElement) {
        match self.document.head() {
            Some(head) => {
                let _ = head.append_child(element.raw());
            }
            None => warn!("No head to append to"),
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn push_fragment(&self, fragment: &str) {
        let pushed = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(fragment)));
        if let Err(err) = pushed {
            warn!("Could not update history: {:?}", err);
        }
    }

    fn install_styles(&self, key: &str, css: &str) -> Option<String> {
        match stylist::Style::create(key.to_string(), css) {
            Ok(style) => Some(style.get_class_name().to_string()),
            Err(err) => {
                warn!("{}", LandingError::from(err));
                None
            }
        }
    }

    fn listen(&self, surface: Surface, event: &str, handler: Handler<WebElement>) -> Subscription {
        match surface {
            Surface::Window => listen_on(&self.window, event, handler),
            Surface::Document => listen_on(&self.document, event, handler),
        }
    }
}
