//! Page-wide enhancement: fragment bootstrap and event routing.

mod menu;
mod scroll;

pub use menu::{MobileMenu, MENU_BUTTON_CLASS, NAV_LINKS_CLASS};
pub use scroll::{ScrollEffects, ScrollTopButton, TO_TOP_CLASS};

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::fragments::{FragmentFetcher, FragmentKind, FragmentLoader, LoadOutcome};
use crate::page::{Event, Key, NodeId, SharedDocument};
use crate::slider::Slider;

/// Orchestrates fragment loading and owns the per-page components.
///
/// Construction wires nothing; `bootstrap` performs the ordered load and
/// mounts, after which host events flow through `dispatch`.
pub struct Enhancer {
    doc: SharedDocument,
    settings: Settings,
    loader: FragmentLoader,
    scroll_fx: ScrollEffects,
    menu: Option<MobileMenu>,
    to_top: Option<ScrollTopButton>,
    slider: Option<Slider>,
}

impl Enhancer {
    pub fn new(
        doc: SharedDocument,
        fetcher: Arc<dyn FragmentFetcher>,
        settings: Settings,
    ) -> Self {
        let loader = FragmentLoader::new(
            doc.clone(),
            fetcher,
            settings.fragments.clone(),
            settings.page_path.clone(),
        );
        let scroll_fx = ScrollEffects::new(&settings);
        Self {
            doc,
            settings,
            loader,
            scroll_fx,
            menu: None,
            to_top: None,
            slider: None,
        }
    }

    /// Load all fragments in registry order and mount the components.
    ///
    /// Strictly sequential: each fragment fully resolves (markup or
    /// fallback, plus post-processing) before the next begins, the menu
    /// mounts as soon as its header exists, and the global components mount
    /// only after every fragment has settled — listeners never bind to
    /// elements that are not there yet.
    pub async fn bootstrap(&mut self) -> Vec<(String, LoadOutcome)> {
        let specs = self.loader.fragments().to_vec();
        let mut outcomes = Vec::with_capacity(specs.len());
        for spec in specs {
            let outcome = self.loader.load(&spec.name).await;
            if spec.kind == FragmentKind::Header {
                self.menu = MobileMenu::mount(&self.doc, self.settings.narrow_viewport_px).await;
            }
            outcomes.push((spec.name, outcome));
        }

        self.to_top = ScrollTopButton::mount(&self.doc, &self.settings).await;
        self.slider = Slider::mount(self.doc.clone(), self.settings.slider.clone()).await;

        info!(
            "Page bootstrapped: {} fragment(s), menu={}, slider={}",
            outcomes.len(),
            self.menu.is_some(),
            self.slider.is_some()
        );
        outcomes
    }

    /// Route one host event.
    pub async fn dispatch(&self, event: Event) {
        match event {
            Event::Click { target } => self.on_click(target).await,
            Event::Scroll { y } => {
                let mut doc = self.doc.write().await;
                self.scroll_fx.apply(&mut doc, y);
            }
            Event::KeyDown { key } => self.on_key(key).await,
            Event::PointerEnter { target } => {
                if let Some(slider) = &self.slider {
                    if slider.is_hover_region(target).await {
                        slider.pause().await;
                    }
                }
            }
            Event::PointerLeave { target } => {
                if let Some(slider) = &self.slider {
                    if slider.is_hover_region(target).await {
                        slider.resume().await;
                    }
                }
                if let Some(to_top) = &self.to_top {
                    let mut doc = self.doc.write().await;
                    if to_top.contains(&doc, target) {
                        to_top.clear_feedback(&mut doc);
                    }
                }
            }
            Event::PointerDown { target } => {
                if let Some(to_top) = &self.to_top {
                    let mut doc = self.doc.write().await;
                    if to_top.contains(&doc, target) {
                        to_top.press(&mut doc);
                    }
                }
            }
            Event::PointerUp { target } => {
                if let Some(to_top) = &self.to_top {
                    let mut doc = self.doc.write().await;
                    if to_top.contains(&doc, target) {
                        to_top.release(&mut doc);
                    }
                }
            }
            Event::Resize { width } => {
                self.doc.write().await.set_viewport_width(width);
            }
        }
    }

    async fn on_click(&self, target: NodeId) {
        {
            let mut doc = self.doc.write().await;
            if let Some(menu) = &self.menu {
                // Trigger clicks are consumed here and never reach the
                // outside-click or anchor handling below.
                if menu.handle_click(&mut doc, target) {
                    return;
                }
            }
            if let Some(to_top) = &self.to_top {
                if to_top.contains(&doc, target) {
                    to_top.activate(&mut doc);
                    return;
                }
            }
            scroll::handle_anchor_click(&mut doc, target, self.settings.anchor_offset_px);
        }

        if let Some(slider) = &self.slider {
            slider.handle_click(target).await;
        }
    }

    async fn on_key(&self, key: Key) {
        if !self.settings.keyboard_navigation {
            return;
        }
        let Some(slider) = &self.slider else {
            return;
        };
        match key {
            Key::ArrowLeft => {
                slider.prev().await;
            }
            Key::ArrowRight => {
                slider.next().await;
            }
            Key::Other(_) => {}
        }
    }

    /// Cancel every pending timer. Idempotent.
    pub async fn shutdown(&self) {
        if let Some(slider) = &self.slider {
            slider.shutdown().await;
        }
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    pub fn slider(&self) -> Option<&Slider> {
        self.slider.as_ref()
    }

    pub fn doc(&self) -> &SharedDocument {
        &self.doc
    }
}
