use chrono::{DateTime, Utc};
use gloo_timers::callback::{Interval, Timeout};
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{js_sys, Window};

use crate::env::Scheduler;
use crate::lifecycle::Subscription;

/// Browser timers and animation frames.
pub struct WebScheduler {
    window: Window,
}

impl WebScheduler {
    pub fn new(window: Window) -> Self {
        WebScheduler { window }
    }
}

impl Scheduler for WebScheduler {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Subscription {
        let timeout = Timeout::new(millis, callback);
        Subscription::new(move || drop(timeout))
    }

    fn interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> Subscription {
        let interval = Interval::new(millis, callback);
        Subscription::new(move || drop(interval))
    }

    fn next_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Subscription {
        let frame = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match self.window.request_animation_frame(frame.unchecked_ref()) {
            Ok(id) => {
                let window = self.window.clone();
                Subscription::new(move || {
                    let _ = window.cancel_animation_frame(id);
                })
            }
            Err(err) => {
                warn!("Animation frame refused: {:?}", err);
                Subscription::noop()
            }
        }
    }
}
