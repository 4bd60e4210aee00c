//! Simulated "seats filled" counter.
//!
//! The count grows with whole days since the course announcement, plus a small
//! random jitter that is re-sampled on every refresh, so two refreshes can move
//! the number in either direction. The displayed value eases toward each new
//! target over a fixed duration.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};

use crate::config::SeatsConfig;
use crate::dom::{Document, Element};
use crate::env::{Env, Jitter, Scheduler};
use crate::lifecycle::{Disposer, Subscription};

/// Whole days from `start` (midnight UTC) to `now`, negative before it.
pub fn days_since(start: NaiveDate, now: DateTime<Utc>) -> i64 {
    now.date_naive().signed_duration_since(start).num_days()
}

/// `min(base + floor(days * rate), max)`, with days before the start treated as zero.
pub fn base_seats(days: i64, config: &SeatsConfig) -> u32 {
    let grown = (days.max(0) as f64 * config.seats_per_day).floor();
    let total = f64::from(config.base_seats) + grown;
    total.min(f64::from(config.max_seats)) as u32
}

pub fn target_count(config: &SeatsConfig, now: DateTime<Utc>, jitter: &mut dyn Jitter) -> u32 {
    let base = base_seats(days_since(config.start_date, now), config);
    (base + jitter.sample(config.jitter_span)).min(config.max_seats)
}

/// Integer at the start of `text`, the way `parseInt` reads it: leading
/// whitespace, an optional sign, then digits. Saturates instead of overflowing.
pub fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

pub fn ease_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

/// One run of the number animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: i64,
    pub to: i64,
    pub started_at: f64,
    pub duration: f64,
}

impl Tween {
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: f64) -> i64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let eased = ease_out_quart(t);
        let (from, to) = (self.from as f64, self.to as f64);
        (from + (to - from) * eased).floor() as i64
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

struct Counter<E> {
    element: E,
    scheduler: Rc<dyn Scheduler>,
    duration: f64,
    tween: Cell<Option<Tween>>,
    frame: RefCell<Option<Subscription>>,
}

impl<E: Element> Counter<E> {
    fn displayed(&self) -> i64 {
        leading_integer(&self.element.text()).unwrap_or(0)
    }

    fn animate_to(self: &Rc<Self>, to: u32) {
        let superseded = self.frame.borrow_mut().take();
        if let Some(frame) = superseded {
            frame.cancel();
        }
        self.tween.set(Some(Tween {
            from: self.displayed(),
            to: i64::from(to),
            started_at: self.scheduler.now(),
            duration: self.duration,
        }));
        self.request_frame();
    }

    fn request_frame(self: &Rc<Self>) {
        let this: Weak<Self> = Rc::downgrade(self);
        let frame = self.scheduler.next_frame(Box::new(move |timestamp| {
            if let Some(this) = this.upgrade() {
                this.on_frame(timestamp);
            }
        }));
        // Replacing the handle of a frame that already ran is harmless.
        *self.frame.borrow_mut() = Some(frame);
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        let Some(tween) = self.tween.get() else {
            return;
        };
        self.element.set_text(&tween.value_at(timestamp).to_string());
        if tween.is_finished(timestamp) {
            self.tween.set(None);
            self.frame.borrow_mut().take();
        } else {
            self.request_frame();
        }
    }
}

pub fn init<D: Document>(doc: &D, env: &Env<D::Element>, config: &SeatsConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("seats");

    let Some(element) = doc.by_id(&config.counter_id) else {
        debug!("No seat counter on this page");
        return disposer;
    };
    let fill = doc.query(&config.fill_selector);
    let urgency = doc.query(&config.urgency_selector);

    let counter = Rc::new(Counter {
        element,
        scheduler: env.scheduler.clone(),
        duration: f64::from(config.animation_ms),
        tween: Cell::new(None),
        frame: RefCell::new(None),
    });

    let refresh = {
        let config = config.clone();
        let env = env.clone();
        move || {
            let count = {
                let mut jitter = env.jitter.borrow_mut();
                target_count(&config, env.scheduler.wall_clock(), &mut *jitter)
            };
            debug!("Seat count refreshed to {}", count);
            counter.animate_to(count);

            if let Some(fill) = &fill {
                let percent = f64::from(count) * 100.0 / f64::from(config.total_seats.max(1));
                fill.set_style("width", &format!("{}%", percent));
            }
            if let Some(urgency) = &urgency {
                let remaining = config.total_seats.saturating_sub(count);
                urgency.set_text(&format!("Only {} seats remaining", remaining));
            }
        }
    };

    refresh();
    disposer.push(env.scheduler.interval(config.refresh_ms, Box::new(refresh)));

    info!("Seat counter refreshing every {}ms", config.refresh_ms);
    disposer
}
