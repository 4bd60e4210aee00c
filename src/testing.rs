//! In-memory host for feature tests: a small element tree with a selector
//! matcher, a virtual clock, and visibility that fires only when told to.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::rc::{Rc, Weak};
use std::str::Chars;

use chrono::{DateTime, TimeZone, Utc};

use crate::dom::{Document, DomEvent, Element, Handler, Surface};
use crate::env::{Env, Jitter, Scheduler};
use crate::lifecycle::Subscription;
use crate::visibility::{AlwaysVisible, Entry, OnChange, Visibility, WatchOptions, Watcher};

type SharedHandler = Rc<RefCell<Handler<FakeElement>>>;

#[derive(Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    children: Vec<FakeElement>,
    parent: Option<Weak<RefCell<Node>>>,
    listeners: Vec<(u64, String, SharedHandler)>,
    offset_top: f64,
    offset_height: f64,
    scroll_height: f64,
    is_root: bool,
    writes: usize,
}

#[derive(Clone)]
pub struct FakeElement(Rc<RefCell<Node>>);

thread_local! {
    static NEXT_LISTENER: Cell<u64> = const { Cell::new(1) };
}

fn next_listener_id() -> u64 {
    NEXT_LISTENER.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        FakeElement(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            ..Node::default()
        })))
    }

    pub fn with_class(self, class: &str) -> Self {
        for class in class.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.set_attribute("id", id);
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_geometry(self, top: f64, height: f64) -> Self {
        {
            let mut node = self.0.borrow_mut();
            node.offset_top = top;
            node.offset_height = height;
        }
        self
    }

    pub fn with_scroll_height(self, height: f64) -> Self {
        self.0.borrow_mut().scroll_height = height;
        self
    }

    /// Appends `child` and hands it back, for building trees inline.
    pub fn child(&self, child: FakeElement) -> FakeElement {
        self.append_child(&child);
        child
    }

    pub fn children(&self) -> Vec<FakeElement> {
        self.0.borrow().children.clone()
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// Number of class, style, text and attribute writes so far.
    pub fn writes(&self) -> usize {
        self.0.borrow().writes
    }

    fn parent(&self) -> Option<FakeElement> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(FakeElement)
    }

    fn descendants(&self, out: &mut Vec<FakeElement>) {
        for child in self.children() {
            out.push(child.clone());
            child.descendants(out);
        }
    }

    fn handlers_for(&self, event: &str) -> Vec<SharedHandler> {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(_, _, handler)| handler.clone())
            .collect()
    }

    fn matches(&self, selector: &Selector) -> bool {
        let Some((last, ancestors)) = selector.compounds.split_last() else {
            return false;
        };
        if !last.matches(self) {
            return false;
        }
        let mut remaining = ancestors.iter().rev().peekable();
        let mut current = self.parent();
        while let Some(wanted) = remaining.peek() {
            match current {
                Some(element) => {
                    if wanted.matches(&element) {
                        remaining.next();
                    }
                    current = element.parent();
                }
                None => return false,
            }
        }
        true
    }
}

impl Element for FakeElement {
    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        node.writes += 1;
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        node.writes += 1;
        node.classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn style(&self, property: &str) -> String {
        self.0
            .borrow()
            .styles
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        node.writes += 1;
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn text(&self) -> String {
        let node = self.0.borrow();
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&child.text());
        }
        text
    }

    fn set_text(&self, text: &str) {
        let mut node = self.0.borrow_mut();
        node.writes += 1;
        node.text = text.to_string();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let node = self.0.borrow();
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        node.writes += 1;
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn query(&self, selector: &str) -> Option<Self> {
        let selectors = parse_selector_list(selector);
        let mut all = Vec::new();
        self.descendants(&mut all);
        all.into_iter()
            .find(|el| selectors.iter().any(|s| el.matches(s)))
    }

    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(element) = current {
            if element.same_node(self) {
                return true;
            }
            current = element.parent();
        }
        false
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn is_connected(&self) -> bool {
        let mut current = self.clone();
        loop {
            if current.0.borrow().is_root {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn offset_top(&self) -> f64 {
        self.0.borrow().offset_top
    }

    fn offset_height(&self) -> f64 {
        self.0.borrow().offset_height
    }

    fn scroll_height(&self) -> f64 {
        self.0.borrow().scroll_height
    }

    fn append_child(&self, child: &Self) {
        child.remove();
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
    }

    fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| !c.same_node(self));
        }
        self.0.borrow_mut().parent = None;
    }

    fn listen(&self, event: &str, handler: Handler<Self>) -> Subscription {
        let id = next_listener_id();
        self.0
            .borrow_mut()
            .listeners
            .push((id, event.to_string(), Rc::new(RefCell::new(handler))));
        let node = Rc::downgrade(&self.0);
        Subscription::new(move || {
            if let Some(node) = node.upgrade() {
                node.borrow_mut().listeners.retain(|(other, _, _)| *other != id);
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum AttrTest {
    Present,
    Equals(String),
    StartsWith(String),
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, AttrTest)>,
}

impl Compound {
    fn matches(&self, element: &FakeElement) -> bool {
        let node = element.0.borrow();
        if node.is_root && self.tag.as_deref() != Some("html") {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attributes.get("id") != Some(id) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        self.attributes.iter().all(|(name, test)| {
            let value = node.attributes.get(name);
            match (test, value) {
                (AttrTest::Present, value) => value.is_some(),
                (AttrTest::Equals(expected), Some(value)) => value == expected,
                (AttrTest::StartsWith(prefix), Some(value)) => value.starts_with(prefix.as_str()),
                (_, None) => false,
            }
        })
    }
}

struct Selector {
    compounds: Vec<Compound>,
}

fn parse_selector_list(input: &str) -> Vec<Selector> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Selector {
            compounds: s.split_whitespace().map(parse_compound).collect(),
        })
        .collect()
}

fn parse_compound(input: &str) -> Compound {
    let mut compound = Compound::default();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                compound.classes.push(read_name(&mut chars));
            }
            '#' => {
                chars.next();
                compound.id = Some(read_name(&mut chars));
            }
            '[' => {
                chars.next();
                let name = read_name(&mut chars);
                let mut op = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '=' || c == '^' {
                        op.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let mut value = String::new();
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                    if c != '"' && c != '\'' {
                        value.push(c);
                    }
                }
                let test = match op.as_str() {
                    "=" => AttrTest::Equals(value),
                    "^=" => AttrTest::StartsWith(value),
                    _ => AttrTest::Present,
                };
                compound.attributes.push((name, test));
            }
            _ => {
                compound.tag = Some(read_name(&mut chars));
                if compound.tag.as_deref() == Some("") {
                    // Unsupported syntax, make sure nothing matches.
                    chars.next();
                    compound.tag = Some("\0".to_string());
                }
            }
        }
    }
    compound
}

fn read_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

struct DocState {
    root: FakeElement,
    head: FakeElement,
    body: FakeElement,
    scroll_y: Cell<f64>,
    scrolls: RefCell<Vec<f64>>,
    history: RefCell<Vec<String>>,
    stylesheets: RefCell<Vec<(String, String)>>,
    listeners: RefCell<Vec<(u64, Surface, String, SharedHandler)>>,
}

#[derive(Clone)]
pub struct FakeDocument(Rc<DocState>);

impl FakeDocument {
    pub fn new() -> Self {
        let root = FakeElement::new("html");
        root.0.borrow_mut().is_root = true;
        let head = root.child(FakeElement::new("head"));
        let body = root.child(FakeElement::new("body"));
        FakeDocument(Rc::new(DocState {
            root,
            head,
            body,
            scroll_y: Cell::new(0.0),
            scrolls: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            stylesheets: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    pub fn body(&self) -> FakeElement {
        self.0.body.clone()
    }

    pub fn head(&self) -> FakeElement {
        self.0.head.clone()
    }

    /// Scroll targets requested so far.
    pub fn scrolls(&self) -> Vec<f64> {
        self.0.scrolls.borrow().clone()
    }

    /// Fragments pushed to history so far.
    pub fn history(&self) -> Vec<String> {
        self.0.history.borrow().clone()
    }

    pub fn stylesheet_count(&self) -> usize {
        self.0.stylesheets.borrow().len()
    }

    /// Moves the window and fires its scroll listeners.
    pub fn scroll_window(&self, y: f64) {
        self.0.scroll_y.set(y);
        self.dispatch_surface(Surface::Window, "scroll", None);
    }

    /// Dispatches a bubbling click; returns whether default was prevented.
    pub fn click(&self, target: &FakeElement) -> bool {
        let event = DomEvent::new(Some(target.clone()));
        let mut current = Some(target.clone());
        while let Some(element) = current {
            for handler in element.handlers_for("click") {
                (handler.borrow_mut())(&event);
            }
            current = element.parent();
        }
        if target.is_connected() {
            for handler in self.surface_handlers(Surface::Document, "click") {
                (handler.borrow_mut())(&event);
            }
        }
        event.default_prevented()
    }

    fn surface_handlers(&self, surface: Surface, event: &str) -> Vec<SharedHandler> {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|(_, s, name, _)| *s == surface && name == event)
            .map(|(_, _, _, handler)| handler.clone())
            .collect()
    }

    fn dispatch_surface(&self, surface: Surface, event: &str, target: Option<FakeElement>) {
        let event_value = DomEvent::new(target);
        for handler in self.surface_handlers(surface, event) {
            (handler.borrow_mut())(&event_value);
        }
    }
}

impl Document for FakeDocument {
    type Element = FakeElement;

    fn by_id(&self, id: &str) -> Option<FakeElement> {
        self.query(&format!("#{}", id))
    }

    fn query(&self, selector: &str) -> Option<FakeElement> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        let selectors = parse_selector_list(selector);
        let mut all = Vec::new();
        self.0.root.descendants(&mut all);
        all.into_iter()
            .filter(|el| selectors.iter().any(|s| el.matches(s)))
            .collect()
    }

    fn create_element(&self, tag: &str) -> Option<FakeElement> {
        Some(FakeElement::new(tag))
    }

    fn append_to_body(&self, element: &FakeElement) {
        self.0.body.append_child(element);
    }

    fn append_to_head(&self, element: &FakeElement) {
        self.0.head.append_child(element);
    }

    fn scroll_y(&self) -> f64 {
        self.0.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.0.scrolls.borrow_mut().push(top);
        self.0.scroll_y.set(top);
    }

    fn push_fragment(&self, fragment: &str) {
        self.0.history.borrow_mut().push(fragment.to_string());
    }

    fn install_styles(&self, key: &str, css: &str) -> Option<String> {
        let mut sheets = self.0.stylesheets.borrow_mut();
        if !sheets.iter().any(|(k, _)| k == key) {
            sheets.push((key.to_string(), css.to_string()));
        }
        Some(key.to_string())
    }

    fn listen(&self, surface: Surface, event: &str, handler: Handler<FakeElement>) -> Subscription {
        let id = next_listener_id();
        self.0.listeners.borrow_mut().push((
            id,
            surface,
            event.to_string(),
            Rc::new(RefCell::new(handler)),
        ));
        let state = Rc::downgrade(&self.0);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.listeners.borrow_mut().retain(|(other, ..)| *other != id);
            }
        })
    }
}

/// Animation frames land on multiples of this many milliseconds.
pub const FRAME_MS: f64 = 16.0;

enum TimerFn {
    Once(Box<dyn FnOnce()>),
    Repeat(Rc<RefCell<Box<dyn FnMut()>>>),
}

struct Timer {
    id: u64,
    due: f64,
    period: f64,
    callback: TimerFn,
}

struct Clock {
    now: f64,
    wall: DateTime<Utc>,
    next_id: u64,
    timers: Vec<Timer>,
    frames: Vec<(u64, Box<dyn FnOnce(f64)>)>,
}

#[derive(Clone)]
pub struct FakeScheduler(Rc<RefCell<Clock>>);

impl FakeScheduler {
    pub fn new(wall: DateTime<Utc>) -> Self {
        FakeScheduler(Rc::new(RefCell::new(Clock {
            now: 0.0,
            wall,
            next_id: 1,
            timers: Vec::new(),
            frames: Vec::new(),
        })))
    }

    pub fn set_wall_clock(&self, wall: DateTime<Utc>) {
        self.0.borrow_mut().wall = wall;
    }

    pub fn pending_frames(&self) -> usize {
        self.0.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.0.borrow().timers.len()
    }

    fn register(&self) -> (u64, Weak<RefCell<Clock>>) {
        let mut clock = self.0.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        (id, Rc::downgrade(&self.0))
    }

    /// Runs the next animation frame only.
    pub fn run_frame(&self) {
        let at = {
            let clock = self.0.borrow();
            next_frame_time(clock.now)
        };
        self.advance_to(at);
    }

    pub fn advance(&self, millis: f64) {
        let target = self.0.borrow().now + millis;
        self.advance_to(target);
    }

    fn advance_to(&self, target: f64) {
        loop {
            let (timer_due, frame_due) = {
                let clock = self.0.borrow();
                let timer_due = clock
                    .timers
                    .iter()
                    .map(|t| t.due)
                    .fold(f64::INFINITY, f64::min);
                let frame_due = if clock.frames.is_empty() {
                    f64::INFINITY
                } else {
                    next_frame_time(clock.now)
                };
                (timer_due, frame_due)
            };
            let next = timer_due.min(frame_due);
            if next > target {
                break;
            }
            self.0.borrow_mut().now = next;
            if timer_due <= frame_due {
                self.fire_timer(timer_due);
            } else {
                let frames = std::mem::take(&mut self.0.borrow_mut().frames);
                for (_, frame) in frames {
                    frame(next);
                }
            }
        }
        self.0.borrow_mut().now = target;
    }

    fn fire_timer(&self, due: f64) {
        let callback = {
            let mut clock = self.0.borrow_mut();
            let Some(index) = clock.timers.iter().position(|t| t.due == due) else {
                return;
            };
            if clock.timers[index].period > 0.0 {
                let timer = &mut clock.timers[index];
                timer.due += timer.period;
                match &timer.callback {
                    TimerFn::Repeat(callback) => TimerFn::Repeat(callback.clone()),
                    TimerFn::Once(_) => return,
                }
            } else {
                clock.timers.remove(index).callback
            }
        };
        match callback {
            TimerFn::Once(callback) => callback(),
            TimerFn::Repeat(callback) => (callback.borrow_mut())(),
        }
    }
}

fn next_frame_time(now: f64) -> f64 {
    ((now / FRAME_MS).floor() + 1.0) * FRAME_MS
}

fn cancel_timer(clock: &Weak<RefCell<Clock>>, id: u64) {
    let Some(clock) = clock.upgrade() else {
        return;
    };
    // Callbacks are dropped after the borrow ends, their captures may cancel
    // other handles on the way out.
    let (timers, frames) = {
        let mut clock = clock.borrow_mut();
        let (gone_timers, kept): (Vec<Timer>, Vec<Timer>) =
            std::mem::take(&mut clock.timers).into_iter().partition(|t| t.id == id);
        clock.timers = kept;
        let (gone_frames, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut clock.frames)
            .into_iter()
            .partition(|(other, _)| *other == id);
        clock.frames = kept;
        (gone_timers, gone_frames)
    };
    drop(timers);
    drop(frames);
}

impl Scheduler for FakeScheduler {
    fn now(&self) -> f64 {
        self.0.borrow().now
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        self.0.borrow().wall
    }

    fn timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Subscription {
        let (id, clock) = self.register();
        let due = self.now() + f64::from(millis);
        self.0.borrow_mut().timers.push(Timer {
            id,
            due,
            period: 0.0,
            callback: TimerFn::Once(callback),
        });
        Subscription::new(move || cancel_timer(&clock, id))
    }

    fn interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> Subscription {
        let (id, clock) = self.register();
        let period = f64::from(millis.max(1));
        let due = self.now() + period;
        self.0.borrow_mut().timers.push(Timer {
            id,
            due,
            period,
            callback: TimerFn::Repeat(Rc::new(RefCell::new(callback))),
        });
        Subscription::new(move || cancel_timer(&clock, id))
    }

    fn next_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Subscription {
        let (id, clock) = self.register();
        self.0.borrow_mut().frames.push((id, callback));
        Subscription::new(move || cancel_timer(&clock, id))
    }
}

struct ManualWatcher {
    options: WatchOptions,
    observed: RefCell<Vec<FakeElement>>,
    on_change: RefCell<OnChange<FakeElement>>,
    connected: Cell<bool>,
}

impl Watcher<FakeElement> for ManualWatcher {
    fn observe(&self, target: &FakeElement) {
        let mut observed = self.observed.borrow_mut();
        if !observed.iter().any(|el| el.same_node(target)) {
            observed.push(target.clone());
        }
    }

    fn unobserve(&self, target: &FakeElement) {
        self.observed.borrow_mut().retain(|el| !el.same_node(target));
    }

    fn disconnect(&self) {
        self.connected.set(false);
        self.observed.borrow_mut().clear();
    }
}

/// Visibility that only reports what a test tells it to.
#[derive(Default)]
pub struct ManualVisibility {
    watchers: RefCell<Vec<Rc<ManualWatcher>>>,
}

impl ManualVisibility {
    /// Delivers one batch per watcher for the observed subset of `targets`,
    /// with the flags a real observer would report.
    pub fn report(&self, targets: &[FakeElement], is_intersecting: bool, ratio: f64) {
        let watchers = self.watchers.borrow().clone();
        for watcher in watchers {
            if !watcher.connected.get() {
                continue;
            }
            let batch: Vec<Entry<FakeElement>> = targets
                .iter()
                .filter(|t| watcher.observed.borrow().iter().any(|el| el.same_node(t)))
                .map(|t| Entry {
                    target: t.clone(),
                    is_intersecting,
                    ratio,
                })
                .collect();
            if !batch.is_empty() {
                (watcher.on_change.borrow_mut())(batch);
            }
        }
    }

    /// Targets fully in view.
    pub fn enter(&self, targets: &[FakeElement]) {
        self.report(targets, true, 1.0);
    }

    /// Targets scrolled out of view.
    pub fn leave(&self, targets: &[FakeElement]) {
        self.report(targets, false, 0.0);
    }

    pub fn observed_count(&self) -> usize {
        self.watchers
            .borrow()
            .iter()
            .map(|w| w.observed.borrow().len())
            .sum()
    }

    pub fn options(&self) -> Vec<WatchOptions> {
        self.watchers
            .borrow()
            .iter()
            .map(|w| w.options.clone())
            .collect()
    }
}

impl Visibility<FakeElement> for ManualVisibility {
    fn is_native(&self) -> bool {
        true
    }

    fn watch(
        &self,
        options: &WatchOptions,
        on_change: OnChange<FakeElement>,
    ) -> Rc<dyn Watcher<FakeElement>> {
        let watcher = Rc::new(ManualWatcher {
            options: options.clone(),
            observed: RefCell::new(Vec::new()),
            on_change: RefCell::new(on_change),
            connected: Cell::new(true),
        });
        self.watchers.borrow_mut().push(watcher.clone());
        watcher
    }
}

/// Jitter that always returns the same value, capped below `upper`.
pub struct FixedJitter(pub u32);

impl Jitter for FixedJitter {
    fn sample(&mut self, upper: u32) -> u32 {
        self.0.min(upper.saturating_sub(1))
    }
}

pub struct TestHost {
    pub doc: FakeDocument,
    pub scheduler: FakeScheduler,
    pub visibility: Rc<ManualVisibility>,
    pub env: Env<FakeElement>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_jitter(FixedJitter(0))
    }

    pub fn with_jitter(jitter: impl Jitter + 'static) -> Self {
        let scheduler = FakeScheduler::new(Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap());
        let visibility = Rc::new(ManualVisibility::default());
        let env = Env {
            scheduler: Rc::new(scheduler.clone()),
            visibility: visibility.clone(),
            jitter: Rc::new(RefCell::new(jitter)),
        };
        TestHost {
            doc: FakeDocument::new(),
            scheduler,
            visibility,
            env,
        }
    }

    /// Same host, but without intersection support.
    pub fn without_observer() -> Self {
        let mut host = Self::new();
        host.env.visibility = Rc::new(AlwaysVisible);
        host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_cover_the_page_contract() {
        let doc = FakeDocument::new();
        let body = doc.body();
        let card = body.child(FakeElement::new("div").with_class("pricing-card"));
        let button = card.child(FakeElement::new("a").with_class("btn").with_attr("href", "#pricing"));
        let link = body.child(
            FakeElement::new("a")
                .with_class("nav-link")
                .with_attr("href", "#about"),
        );
        let section = body.child(FakeElement::new("section").with_id("about"));
        body.child(FakeElement::new("section"));

        assert_eq!(doc.query_all(".pricing-card .btn").len(), 1);
        assert!(doc.query(".pricing-card .btn").unwrap().same_node(&button));
        assert_eq!(doc.query_all("a[href^=\"#\"]").len(), 2);
        assert!(doc.query(".nav-link[href=\"#about\"]").unwrap().same_node(&link));
        assert_eq!(doc.query_all("section[id]").len(), 1);
        assert!(doc.by_id("about").unwrap().same_node(&section));
        assert_eq!(doc.query_all(".pricing-card, .nav-link").len(), 2);
        assert!(card.contains(&button));
        assert!(!button.contains(&card));
    }

    #[test]
    fn timers_frames_and_cancellation() {
        let scheduler = FakeScheduler::new(Utc::now());
        let log = Rc::new(RefCell::new(Vec::new()));

        let kept = {
            let log = log.clone();
            scheduler.timeout(100, Box::new(move || log.borrow_mut().push("timeout")))
        };
        let cancelled = {
            let log = log.clone();
            scheduler.timeout(50, Box::new(move || log.borrow_mut().push("cancelled")))
        };
        let ticks = {
            let log = log.clone();
            scheduler.interval(40, Box::new(move || log.borrow_mut().push("tick")))
        };
        {
            let log = log.clone();
            scheduler
                .next_frame(Box::new(move |_| log.borrow_mut().push("frame")))
                .forget();
        }
        drop(cancelled);

        scheduler.advance(100.0);
        assert_eq!(*log.borrow(), vec!["frame", "tick", "tick", "timeout"]);

        drop(ticks);
        kept.forget();
        scheduler.advance(1000.0);
        assert_eq!(log.borrow().len(), 4);
    }
}
