//! Scroll-driven behaviors: header state, scroll-to-top button, smooth
//! anchor scrolling.

use tracing::debug;

use crate::config::{FeedbackSettings, Settings};
use crate::page::{Document, NodeId, ScrollBehavior, SharedDocument};

use super::menu::closest_tag;

pub const TO_TOP_CLASS: &str = "btn-scroll-top";

const SCROLLED_CLASS: &str = "scrolled";
const VISIBLE_CLASS: &str = "visible";

/// Threshold-crossing class toggles applied on every scroll event.
#[derive(Debug, Clone)]
pub struct ScrollEffects {
    header_threshold: f64,
    to_top_threshold: f64,
}

impl ScrollEffects {
    pub fn new(settings: &Settings) -> Self {
        Self {
            header_threshold: settings.header_scroll_threshold,
            to_top_threshold: settings.to_top_visible_threshold,
        }
    }

    /// Record the new offset and toggle the threshold classes. Elements are
    /// looked up per event so fragments mounted later are still covered.
    pub fn apply(&self, doc: &mut Document, y: f64) {
        doc.set_scroll_y(y);
        if let Some(header) = doc.first_by_tag("header") {
            doc.set_class(header, SCROLLED_CLASS, y > self.header_threshold);
        }
        if let Some(button) = doc.first_by_class(TO_TOP_CLASS) {
            doc.set_class(button, VISIBLE_CLASS, y > self.to_top_threshold);
        }
    }
}

/// Scroll-to-top control with cosmetic press feedback.
#[derive(Debug)]
pub struct ScrollTopButton {
    button: NodeId,
    feedback: FeedbackSettings,
}

impl ScrollTopButton {
    /// Bind to the page's scroll-to-top button, if present.
    pub async fn mount(doc: &SharedDocument, settings: &Settings) -> Option<Self> {
        let button = doc.read().await.first_by_class(TO_TOP_CLASS)?;
        debug!("Scroll-to-top button mounted");
        Some(Self {
            button,
            feedback: settings.to_top_feedback.clone(),
        })
    }

    pub fn contains(&self, doc: &Document, target: NodeId) -> bool {
        doc.contains(self.button, target)
    }

    /// Smooth-scroll back to the top of the page.
    pub fn activate(&self, doc: &mut Document) {
        doc.scroll_to(0.0, ScrollBehavior::Smooth);
    }

    pub fn press(&self, doc: &mut Document) {
        doc.set_style(self.button, "transform", &self.feedback.press_transform);
    }

    pub fn release(&self, doc: &mut Document) {
        doc.set_style(self.button, "transform", &self.feedback.release_transform);
    }

    pub fn clear_feedback(&self, doc: &mut Document) {
        doc.set_style(self.button, "transform", "");
    }
}

/// Handle a click that may target a same-page anchor link. Returns true
/// when the default jump was replaced with a smooth scroll.
pub fn handle_anchor_click(doc: &mut Document, target: NodeId, anchor_offset: f64) -> bool {
    let Some(anchor) = closest_tag(doc, target, "a") else {
        return false;
    };
    let Some(href) = doc.attr(anchor, "href") else {
        return false;
    };
    // Only same-page anchors, and never the bare "#".
    let Some(id) = href.strip_prefix('#') else {
        return false;
    };
    if id.is_empty() {
        return false;
    }
    let id = id.to_string();
    let Some(section) = doc.element_by_id(&id) else {
        return false;
    };
    let top = doc.offset_top(section) - anchor_offset;
    doc.scroll_to(top, ScrollBehavior::Smooth);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ScrollRequest;

    fn scroll_page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let header = doc.append_element(doc.root(), "header");
        let button = doc.append_element(doc.root(), "button");
        doc.add_class(button, TO_TOP_CLASS);
        (doc, header, button)
    }

    #[test]
    fn threshold_classes_follow_offset() {
        let (mut doc, header, button) = scroll_page();
        let effects = ScrollEffects::new(&Settings::default());

        effects.apply(&mut doc, 150.0);
        assert!(doc.has_class(header, "scrolled"));
        assert!(!doc.has_class(button, "visible"));

        effects.apply(&mut doc, 350.0);
        assert!(doc.has_class(header, "scrolled"));
        assert!(doc.has_class(button, "visible"));

        effects.apply(&mut doc, 50.0);
        assert!(!doc.has_class(header, "scrolled"));
        assert!(!doc.has_class(button, "visible"));
    }

    #[test]
    fn anchor_click_scrolls_with_offset() {
        let mut doc = Document::new();
        let link = doc.append_element(doc.root(), "a");
        doc.set_attr(link, "href", "#contact");
        let section = doc.append_element(doc.root(), "section");
        doc.set_id(section, "contact");
        doc.set_offset_top(section, 1200.0);

        assert!(handle_anchor_click(&mut doc, link, 80.0));
        assert_eq!(
            doc.last_scroll(),
            Some(ScrollRequest {
                top: 1120.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn bare_hash_and_external_links_are_ignored() {
        let mut doc = Document::new();
        let bare = doc.append_element(doc.root(), "a");
        doc.set_attr(bare, "href", "#");
        let external = doc.append_element(doc.root(), "a");
        doc.set_attr(external, "href", "about.html");

        assert!(!handle_anchor_click(&mut doc, bare, 80.0));
        assert!(!handle_anchor_click(&mut doc, external, 80.0));
        assert_eq!(doc.last_scroll(), None);
    }

    #[test]
    fn click_inside_anchor_child_resolves_to_anchor() {
        let mut doc = Document::new();
        let link = doc.append_element(doc.root(), "a");
        doc.set_attr(link, "href", "#top-section");
        let icon = doc.append_element(link, "span");
        let section = doc.append_element(doc.root(), "div");
        doc.set_id(section, "top-section");
        doc.set_offset_top(section, 500.0);

        assert!(handle_anchor_click(&mut doc, icon, 80.0));
        assert_eq!(doc.scroll_y(), 420.0);
    }
}
