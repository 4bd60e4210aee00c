use chrono::NaiveDate;
use log::Level;
use serde::Deserialize;

use crate::error::Result;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Id of the optional `<script type="application/json">` block that
/// overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "landing-config";

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LandingConfig {
    pub reveal: RevealConfig,
    pub navigation: NavigationConfig,
    pub accordion: AccordionConfig,
    pub seats: SeatsConfig,
    pub scroll: ScrollConfig,
    pub progress: ProgressConfig,
    pub toast: ToastConfig,
    pub assets: AssetsConfig,
}

impl LandingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub selector: String,
    pub stagger_ms: u32,
    pub threshold: f64,
    pub root_margin: String,
    pub pending_class: String,
    pub visible_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".testimonial-card, .timeline-card, .pricing-card, .trust-point, .faq-item, .section-header"
                .to_string(),
            stagger_ms: 100,
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            pending_class: "fade-in".to_string(),
            visible_class: "visible".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    pub toggle_id: String,
    pub menu_id: String,
    pub link_selector: String,
    pub navbar_selector: String,
    pub section_selector: String,
    pub open_class: String,
    pub active_class: String,
    pub scrolled_class: String,
    pub scrolled_after_px: f64,
    pub highlight_offset_px: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            toggle_id: "nav-toggle".to_string(),
            menu_id: "nav-menu".to_string(),
            link_selector: ".nav-link".to_string(),
            navbar_selector: ".navbar".to_string(),
            section_selector: "section[id]".to_string(),
            open_class: "active".to_string(),
            active_class: "active".to_string(),
            scrolled_class: "scrolled".to_string(),
            scrolled_after_px: 50.0,
            highlight_offset_px: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccordionConfig {
    pub item_selector: String,
    pub question_selector: String,
    pub answer_selector: String,
    pub open_class: String,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            item_selector: ".faq-item".to_string(),
            question_selector: ".faq-question".to_string(),
            answer_selector: ".faq-answer".to_string(),
            open_class: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeatsConfig {
    pub counter_id: String,
    pub fill_selector: String,
    pub urgency_selector: String,
    /// Course announcement date, day zero of the progression.
    pub start_date: NaiveDate,
    pub base_seats: u32,
    pub seats_per_day: f64,
    pub max_seats: u32,
    /// Jitter is drawn from `0..jitter_span`.
    pub jitter_span: u32,
    pub total_seats: u32,
    pub refresh_ms: u32,
    pub animation_ms: u32,
}

impl Default for SeatsConfig {
    fn default() -> Self {
        Self {
            counter_id: "seats-filled".to_string(),
            fill_selector: ".progress-fill".to_string(),
            urgency_selector: ".urgency-text".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or_default(),
            base_seats: 13,
            seats_per_day: 0.3,
            max_seats: 47,
            jitter_span: 3,
            total_seats: 100,
            refresh_ms: 5 * 60 * 1000,
            animation_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    pub anchor_selector: String,
    /// Fixed navbar height plus breathing room.
    pub header_offset_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            anchor_selector: "a[href^=\"#\"]".to_string(),
            header_offset_px: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressConfig {
    pub selector: String,
    pub threshold: f64,
    pub default_width: String,
    pub restore_delay_ms: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            selector: ".progress-fill".to_string(),
            threshold: 0.5,
            default_width: "13%".to_string(),
            restore_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToastConfig {
    pub card_selector: String,
    pub button_selector: String,
    pub title_selector: String,
    pub message: String,
    pub press_transform: String,
    pub press_ms: u32,
    pub visible_ms: u32,
    pub exit_ms: u32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            card_selector: ".pricing-card".to_string(),
            button_selector: ".btn".to_string(),
            title_selector: "h3".to_string(),
            message: "Opening WhatsApp...".to_string(),
            press_transform: "scale(0.98)".to_string(),
            press_ms: 150,
            visible_ms: 2000,
            exit_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetsConfig {
    pub lazy_image_selector: String,
    pub lazy_class: String,
    pub preload_styles: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            lazy_image_selector: "img[loading=\"lazy\"]".to_string(),
            lazy_class: "lazy".to_string(),
            preload_styles: vec![
                "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700;800&display=swap"
                    .to_string(),
            ],
        }
    }
}
