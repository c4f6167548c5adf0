//! Mobile navigation menu toggle.

use tracing::{debug, warn};

use crate::page::{Document, NodeId, SharedDocument};

pub const MENU_BUTTON_CLASS: &str = "mobile-menu-btn";
pub const NAV_LINKS_CLASS: &str = "nav-links";

const OPEN_CLASS: &str = "active";
const OPEN_GLYPH: &str = "✕";
const CLOSED_GLYPH: &str = "☰";

/// Toggle behavior for the hamburger button and nav list.
#[derive(Debug)]
pub struct MobileMenu {
    button: NodeId,
    nav: NodeId,
    narrow_max: u32,
}

impl MobileMenu {
    /// Bind to the menu elements mounted with the header. Returns None
    /// (and disables the feature) when either is missing.
    pub async fn mount(doc: &SharedDocument, narrow_max: u32) -> Option<Self> {
        let d = doc.read().await;
        let button = d.first_by_class(MENU_BUTTON_CLASS);
        let nav = d.first_by_class(NAV_LINKS_CLASS);
        match (button, nav) {
            (Some(button), Some(nav)) => {
                debug!("Mobile menu mounted");
                Some(Self {
                    button,
                    nav,
                    narrow_max,
                })
            }
            _ => {
                warn!("Mobile menu elements not found, feature disabled");
                None
            }
        }
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.nav, OPEN_CLASS)
    }

    /// Open or close the menu, keeping button state and glyph in sync.
    pub fn toggle(&self, doc: &mut Document) {
        let open = doc.toggle_class(self.nav, OPEN_CLASS);
        doc.set_class(self.button, OPEN_CLASS, open);
        doc.set_text(self.button, if open { OPEN_GLYPH } else { CLOSED_GLYPH });
    }

    pub fn close(&self, doc: &mut Document) {
        doc.remove_class(self.nav, OPEN_CLASS);
        doc.remove_class(self.button, OPEN_CLASS);
        doc.set_text(self.button, CLOSED_GLYPH);
    }

    fn is_narrow(&self, doc: &Document) -> bool {
        doc.viewport_width() <= self.narrow_max
    }

    /// Route a click. Returns true when the click hit the trigger and must
    /// not propagate further (otherwise the outside-click rule below would
    /// immediately close the menu it just opened).
    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> bool {
        if doc.contains(self.button, target) {
            self.toggle(doc);
            return true;
        }

        if doc.contains(self.nav, target) {
            // A nav link tap on a narrow viewport closes the menu; the
            // click still reaches anchor handling.
            if self.is_narrow(doc) && closest_tag(doc, target, "a").is_some() {
                self.close(doc);
            }
            return false;
        }

        if self.is_open(doc) && self.is_narrow(doc) {
            self.close(doc);
        }
        false
    }
}

/// Nearest self-or-ancestor element with the given tag.
pub(crate) fn closest_tag(doc: &Document, node: NodeId, tag: &str) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(n) = current {
        if doc.tag(n) == tag {
            return Some(n);
        }
        current = doc.parent(n);
    }
    None
}
