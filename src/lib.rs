//! Client-side interactivity for the course landing page.
//!
//! The page is rendered by the server; this crate only enhances it. Each
//! feature in [`features`] is wired against the [`dom::Document`] and the host
//! capabilities in [`env::Env`], so the same code runs over web-sys in the
//! browser ([`web`]) and over an in-memory document in tests.

use log::info;

pub mod config;
pub mod dom;
pub mod env;
pub mod error;
pub mod features;
pub mod lifecycle;
pub mod visibility;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

use config::LandingConfig;
use dom::Document;
use env::Env;
use lifecycle::Disposer;

/// All wired features of one page.
#[must_use = "dropping Landing tears every feature down"]
pub struct Landing<E> {
    disposers: Vec<Disposer<E>>,
}

impl<E> Landing<E> {
    pub fn features(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.disposers.iter().map(Disposer::feature)
    }

    pub fn dispose(self) {
        for disposer in self.disposers {
            disposer.dispose();
        }
    }

    /// Keeps every feature running for the rest of the page's life.
    pub fn forget(self) {
        for disposer in self.disposers {
            disposer.forget();
        }
    }
}

/// Wires every feature, in the order the page expects: menu handlers run
/// before the smooth-scroll handler on the same link.
pub fn init<D: Document>(doc: &D, env: &Env<D::Element>, config: &LandingConfig) -> Landing<D::Element> {
    let disposers = vec![
        features::navigation::init(doc, &config.navigation),
        features::reveal::init(doc, env, &config.reveal),
        features::accordion::init(doc, &config.accordion),
        features::seats::init(doc, env, &config.seats),
        features::scroll::init(doc, &config.scroll),
        features::progress::init(doc, env, &config.progress),
        features::assets::init(doc, env, &config.assets),
        features::toast::init(doc, env, &config.toast),
    ];
    info!("Landing page ready ({} features)", disposers.len());
    Landing { disposers }
}
