//! Host capabilities handed to every feature at init.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::lifecycle::Subscription;
use crate::visibility::Visibility;

pub trait Scheduler {
    /// Monotonic milliseconds, same clock as animation frame timestamps.
    fn now(&self) -> f64;

    fn wall_clock(&self) -> DateTime<Utc>;

    fn timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Subscription;

    fn interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> Subscription;

    /// Runs `callback` before the next repaint with the frame timestamp.
    fn next_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Subscription;
}

/// Random source for the seat counter jitter.
pub trait Jitter {
    /// Uniform integer in `0..upper`; `0` when `upper` is zero.
    fn sample(&mut self, upper: u32) -> u32;
}

impl<R: Rng + ?Sized> Jitter for R {
    fn sample(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.gen_range(0..upper)
    }
}

/// Everything a feature may use besides the document itself.
pub struct Env<E> {
    pub scheduler: Rc<dyn Scheduler>,
    pub visibility: Rc<dyn Visibility<E>>,
    pub jitter: Rc<RefCell<dyn Jitter>>,
}

impl<E> Clone for Env<E> {
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            visibility: self.visibility.clone(),
            jitter: self.jitter.clone(),
        }
    }
}
