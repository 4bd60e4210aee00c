//! Replays the progress-bar fill whenever a bar scrolls into view.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};

use crate::config::ProgressConfig;
use crate::dom::{Document, Element};
use crate::env::Env;
use crate::lifecycle::{Disposer, Subscription};
use crate::visibility::{Entry, WatchOptions};

struct Restore {
    width: String,
    done: Rc<Cell<bool>>,
    handle: Subscription,
}

pub fn init<D: Document>(doc: &D, env: &Env<D::Element>, config: &ProgressConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("progress");
    let bars = doc.query_all(&config.selector);
    if bars.is_empty() {
        debug!("No progress bars on this page");
        return disposer;
    }

    // One pending restore per bar, a replay replaces it.
    let pending: Rc<RefCell<Vec<Option<Restore>>>> =
        Rc::new(RefCell::new(bars.iter().map(|_| None).collect()));

    let on_change = {
        let bars = bars.clone();
        let pending = pending.clone();
        let scheduler = env.scheduler.clone();
        let default_width = config.default_width.clone();
        let delay = config.restore_delay_ms;
        move |entries: Vec<Entry<D::Element>>| {
            for entry in entries.into_iter().filter(|e| e.is_intersecting) {
                let Some(index) = bars.iter().position(|bar| bar.same_node(&entry.target)) else {
                    continue;
                };
                let bar = entry.target;
                let mut slots = pending.borrow_mut();
                let width = match &slots[index] {
                    // Mid-replay the bar reads 0%, keep aiming for the old width.
                    Some(restore) if !restore.done.get() => restore.width.clone(),
                    _ => {
                        let current = bar.style("width");
                        if current.is_empty() {
                            default_width.clone()
                        } else {
                            current
                        }
                    }
                };
                if let Some(previous) = slots[index].take() {
                    previous.handle.cancel();
                }
                bar.set_style("width", "0%");
                let done = Rc::new(Cell::new(false));
                let handle = {
                    let done = done.clone();
                    let width = width.clone();
                    scheduler.timeout(
                        delay,
                        Box::new(move || {
                            done.set(true);
                            bar.set_style("width", &width);
                        }),
                    )
                };
                slots[index] = Some(Restore {
                    width,
                    done,
                    handle,
                });
            }
        }
    };

    let options = WatchOptions {
        threshold: config.threshold,
        ..WatchOptions::default()
    };
    let watcher = env.visibility.watch(&options, Box::new(on_change));
    for bar in &bars {
        watcher.observe(bar);
    }
    disposer.push_watcher(watcher);
    disposer.push(Subscription::new(move || {
        pending.borrow_mut().clear();
    }));

    info!("Progress bars watched: {}", bars.len());
    disposer
}
