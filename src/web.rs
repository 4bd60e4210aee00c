//! Browser host: web-sys backed [`Document`](crate::dom::Document), gloo
//! timers and `IntersectionObserver`.

use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::config::{LandingConfig, CONFIG_ELEMENT_ID};
use crate::env::Env;
use crate::error::Result;

mod document;
mod observer;
mod scheduler;

pub use document::{WebDocument, WebElement};
pub use observer::{detect as detect_visibility, ObserverVisibility};
pub use scheduler::WebScheduler;

/// Reads the inline JSON block, falling back to defaults when it is absent
/// or malformed.
pub fn load_config(doc: &WebDocument) -> LandingConfig {
    let Some(json) = doc.config_json(CONFIG_ELEMENT_ID) else {
        return LandingConfig::default();
    };
    match LandingConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            warn!("Ignoring page config: {}", err);
            LandingConfig::default()
        }
    }
}

pub fn host_env(doc: &WebDocument) -> Env<WebElement> {
    Env {
        scheduler: Rc::new(WebScheduler::new(doc.window().clone())),
        visibility: detect_visibility(doc.window()),
        jitter: Rc::new(RefCell::new(StdRng::from_entropy())),
    }
}

fn run(doc: &WebDocument) {
    let config = load_config(doc);
    let env = host_env(doc);
    crate::init(doc, &env, &config).forget();
}

/// Wires the page now, or once the DOM has been parsed.
pub fn start() -> Result<()> {
    let doc = WebDocument::new()?;
    if !doc.is_loading() {
        run(&doc);
        return Ok(());
    }

    info!("Waiting for DOMContentLoaded");
    let ready = doc.clone();
    let on_ready = Closure::once_into_js(move || run(&ready));
    doc.raw()
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        .map_err(|err| {
            error!("Could not wait for the DOM: {:?}", err);
            err
        })?;
    Ok(())
}
