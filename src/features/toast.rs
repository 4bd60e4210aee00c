//! Pricing card press feedback and "plan selected" toast.
//!
//! The buttons link out to a chat app, so nothing here prevents default
//! navigation. Each click builds its own toast; several can be on screen at
//! once.

use std::rc::Rc;

use log::{debug, info};

use crate::config::ToastConfig;
use crate::dom::{Document, DomEvent, Element};
use crate::env::{Env, Scheduler};
use crate::lifecycle::Disposer;

pub const TOAST_CLASS: &str = "pricing-toast";

const TOAST_STYLES: &str = r#"
    position: fixed;
    top: 20px;
    right: 20px;
    background: white;
    border: 2px solid #facc15;
    border-radius: 12px;
    padding: 1rem;
    box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2);
    z-index: 10000;
    animation: slideInRight 0.5s ease;

    .toast-content {
        display: flex;
        align-items: center;
        gap: 1rem;
    }

    .toast-icon {
        font-size: 1.5rem;
    }

    .toast-text strong {
        color: #0a192f;
        display: block;
        margin-bottom: 0.25rem;
    }

    .toast-text p {
        color: #6b7280;
        margin: 0;
        font-size: 0.9rem;
    }

    @keyframes slideInRight {
        from {
            transform: translateX(100%);
            opacity: 0;
        }
        to {
            transform: translateX(0);
            opacity: 1;
        }
    }

    @keyframes slideOutRight {
        from {
            transform: translateX(0);
            opacity: 1;
        }
        to {
            transform: translateX(100%);
            opacity: 0;
        }
    }
"#;

pub fn init<D: Document>(doc: &D, env: &Env<D::Element>, config: &ToastConfig) -> Disposer<D::Element> {
    let mut disposer = Disposer::new("toast");
    let mut wired = 0;

    for card in doc.query_all(&config.card_selector) {
        let Some(button) = card.query(&config.button_selector) else {
            debug!("Pricing card without a button skipped");
            continue;
        };
        let doc = doc.clone();
        let scheduler = env.scheduler.clone();
        let config = config.clone();
        disposer.push(button.listen(
            "click",
            Box::new(move |_: &DomEvent<D::Element>| {
                press(&card, scheduler.as_ref(), &config);
                show(&doc, &scheduler, &card, &config);
            }),
        ));
        wired += 1;
    }

    info!("Pricing toast wired for {} cards", wired);
    disposer
}

fn press<E: Element>(card: &E, scheduler: &dyn Scheduler, config: &ToastConfig) {
    card.set_style("transform", &config.press_transform);
    let card = card.clone();
    scheduler
        .timeout(config.press_ms, Box::new(move || card.set_style("transform", "")))
        .forget();
}

fn show<D: Document>(doc: &D, scheduler: &Rc<dyn Scheduler>, card: &D::Element, config: &ToastConfig) {
    let plan = card
        .query(&config.title_selector)
        .map(|title| title.text().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Plan".to_string());

    let Some(toast) = build(doc, &plan, &config.message) else {
        debug!("Could not build toast for {}", plan);
        return;
    };
    doc.append_to_body(&toast);
    debug!("Showing toast for {}", plan);

    let exit_ms = config.exit_ms;
    let exit_animation = format!("slideOutRight {}s ease", f64::from(exit_ms) / 1000.0);
    let later = scheduler.clone();
    scheduler
        .timeout(
            config.visible_ms,
            Box::new(move || {
                toast.set_style("animation", &exit_animation);
                later
                    .timeout(
                        exit_ms,
                        Box::new(move || {
                            if toast.is_connected() {
                                toast.remove();
                            }
                        }),
                    )
                    .forget();
            }),
        )
        .forget();
}

fn build<D: Document>(doc: &D, plan: &str, message: &str) -> Option<D::Element> {
    let toast = doc.create_element("div")?;
    toast.add_class(TOAST_CLASS);
    if let Some(class) = doc.install_styles(TOAST_CLASS, TOAST_STYLES) {
        toast.add_class(&class);
    }

    let content = doc.create_element("div")?;
    content.add_class("toast-content");
    let icon = doc.create_element("div")?;
    icon.add_class("toast-icon");
    icon.set_text("📱");
    let text = doc.create_element("div")?;
    text.add_class("toast-text");
    let title = doc.create_element("strong")?;
    title.set_text(&format!("{} Selected!", plan));
    let body = doc.create_element("p")?;
    body.set_text(message);

    text.append_child(&title);
    text.append_child(&body);
    content.append_child(&icon);
    content.append_child(&text);
    toast.append_child(&content);
    Some(toast)
}
