//! Autoplaying slider with manual navigation and a progress indicator.
//!
//! Elements are located by class convention; pages without a slider get no
//! slider, and nothing else changes.

mod autoplay;

pub use autoplay::TaskHandle;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::SliderSettings;
use crate::page::{NodeId, SharedDocument};

use autoplay::AutoplayTasks;

pub const TRACK_CLASS: &str = "slider-track";
pub const SLIDE_CLASS: &str = "slider-slide";
pub const ARROW_CLASS: &str = "slider-arrow";
pub const PREV_CLASS: &str = "prev";
pub const NEXT_CLASS: &str = "next";
pub const DOT_CLASS: &str = "dot";
pub const PROGRESS_CLASS: &str = "progress-bar";

const ACTIVE_CLASS: &str = "active";

#[derive(Debug)]
struct SliderState {
    current: usize,
    total: usize,
    /// Start of the last slide transition. Navigation is locked until one
    /// transition window has elapsed; requests inside the window are
    /// dropped, not queued.
    transition_started: Option<Instant>,
    autoplay_on: bool,
    progress: f64,
}

impl SliderState {
    fn locked(&self, window: std::time::Duration) -> bool {
        self.transition_started
            .map_or(false, |started| started.elapsed() < window)
    }
}

/// A navigation request.
#[derive(Debug, Clone, Copy)]
enum Nav {
    Next,
    Prev,
    Index(usize),
}

struct SliderInner {
    doc: SharedDocument,
    settings: SliderSettings,
    track: NodeId,
    slides: Vec<NodeId>,
    prev_btn: Option<NodeId>,
    next_btn: Option<NodeId>,
    dots: Vec<NodeId>,
    progress_bar: Option<NodeId>,
    state: Mutex<SliderState>,
    tasks: Mutex<AutoplayTasks>,
}

impl SliderInner {
    /// Apply a navigation request. Returns false when the request was
    /// dropped (transition lock or out-of-range index).
    async fn navigate(&self, nav: Nav) -> bool {
        let current = {
            let mut state = self.state.lock().await;
            if state.locked(self.settings.transition()) {
                debug!("Navigation dropped mid-transition");
                return false;
            }
            let total = state.total;
            let target = match nav {
                Nav::Next => (state.current + 1) % total,
                Nav::Prev => (state.current + total - 1) % total,
                Nav::Index(i) if i < total => i,
                Nav::Index(i) => {
                    warn!("Slide index {} out of range ({} slides)", i, total);
                    return false;
                }
            };
            state.current = target;
            state.transition_started = Some(Instant::now());
            state.progress = 0.0;
            target
        };
        self.render(current).await;
        true
    }

    /// Write the current position to the page: track offset, dot states,
    /// progress reset.
    async fn render(&self, current: usize) {
        let mut doc = self.doc.write().await;
        doc.set_style(
            self.track,
            "transform",
            &format!("translateX(-{}%)", current * 100),
        );
        for (i, &dot) in self.dots.iter().enumerate() {
            doc.set_class(dot, ACTIVE_CLASS, i == current);
        }
        if let Some(bar) = self.progress_bar {
            doc.set_style(bar, "width", "0%");
        }
    }
}

/// Slider bound to the page's track/arrow/dot/progress elements.
pub struct Slider {
    inner: Arc<SliderInner>,
}

impl Slider {
    /// Bind to the page's slider elements and start autoplay.
    ///
    /// Returns None when the track is absent or holds no slides, so pages
    /// without a slider cost nothing.
    pub async fn mount(doc: SharedDocument, settings: SliderSettings) -> Option<Slider> {
        let (track, slides, prev_btn, next_btn, dots, progress_bar) = {
            let d = doc.read().await;
            let track = match d.first_by_class(TRACK_CLASS) {
                Some(track) => track,
                None => {
                    debug!("No slider track on this page");
                    return None;
                }
            };
            let slides = d.all_by_class(SLIDE_CLASS);
            if slides.is_empty() {
                debug!("Slider track without slides, skipping");
                return None;
            }
            let arrows = d.all_by_class(ARROW_CLASS);
            let prev_btn = arrows.iter().copied().find(|&a| d.has_class(a, PREV_CLASS));
            let next_btn = arrows.iter().copied().find(|&a| d.has_class(a, NEXT_CLASS));
            let dots = d.all_by_class(DOT_CLASS);
            let progress_bar = d.first_by_class(PROGRESS_CLASS);
            (track, slides, prev_btn, next_btn, dots, progress_bar)
        };

        let total = slides.len();
        let inner = Arc::new(SliderInner {
            doc,
            settings,
            track,
            slides,
            prev_btn,
            next_btn,
            dots,
            progress_bar,
            state: Mutex::new(SliderState {
                current: 0,
                total,
                transition_started: None,
                autoplay_on: false,
                progress: 0.0,
            }),
            tasks: Mutex::new(AutoplayTasks::default()),
        });

        // Initial positioning counts as a transition, matching the visual
        // settle window on page load.
        {
            let mut state = inner.state.lock().await;
            state.transition_started = Some(Instant::now());
        }
        inner.render(0).await;
        Arc::clone(&inner).start_autoplay().await;

        debug!("Slider mounted with {} slides", total);
        Some(Slider { inner })
    }

    /// Advance one slide, wrapping past the end. Restarts the autoplay
    /// countdown on success.
    pub async fn next(&self) -> bool {
        self.navigate_manual(Nav::Next).await
    }

    /// Go back one slide, wrapping before the start.
    pub async fn prev(&self) -> bool {
        self.navigate_manual(Nav::Prev).await
    }

    /// Jump to a slide. Out-of-range indexes are rejected.
    pub async fn go_to(&self, index: usize) -> bool {
        self.navigate_manual(Nav::Index(index)).await
    }

    async fn navigate_manual(&self, nav: Nav) -> bool {
        let moved = self.inner.navigate(nav).await;
        if moved {
            Arc::clone(&self.inner).start_autoplay().await;
        }
        moved
    }

    /// Stop autoplay (pointer entered the slider).
    pub async fn pause(&self) {
        self.inner.stop_autoplay().await;
    }

    /// Restart autoplay (pointer left the slider).
    pub async fn resume(&self) {
        Arc::clone(&self.inner).start_autoplay().await;
    }

    /// Cancel all pending timers. The slider stays navigable manually.
    pub async fn shutdown(&self) {
        self.inner.stop_autoplay().await;
    }

    /// Route a click on the arrows or dots. Returns true when the click
    /// belonged to the slider.
    pub async fn handle_click(&self, target: NodeId) -> bool {
        let nav = {
            let doc = self.inner.doc.read().await;
            if self
                .inner
                .prev_btn
                .map_or(false, |b| doc.contains(b, target))
            {
                Some(Nav::Prev)
            } else if self
                .inner
                .next_btn
                .map_or(false, |b| doc.contains(b, target))
            {
                Some(Nav::Next)
            } else {
                self.inner
                    .dots
                    .iter()
                    .position(|&d| doc.contains(d, target))
                    .map(Nav::Index)
            }
        };
        match nav {
            Some(nav) => {
                self.navigate_manual(nav).await;
                true
            }
            None => false,
        }
    }

    /// Whether `target` lies in the hover-pause region (the track or a
    /// descendant).
    pub async fn is_hover_region(&self, target: NodeId) -> bool {
        let doc = self.inner.doc.read().await;
        doc.contains(self.inner.track, target)
    }

    pub async fn current_index(&self) -> usize {
        self.inner.state.lock().await.current
    }

    pub fn slide_count(&self) -> usize {
        self.inner.slides.len()
    }

    pub async fn is_transitioning(&self) -> bool {
        self.inner
            .state
            .lock()
            .await
            .locked(self.inner.settings.transition())
    }

    pub async fn autoplay_active(&self) -> bool {
        self.inner.state.lock().await.autoplay_on
    }

    /// Progress toward the next automatic advance, in percent.
    pub async fn progress(&self) -> f64 {
        self.inner.state.lock().await.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{self, Document};

    use std::time::Duration;

    fn slider_page(slides: usize) -> SharedDocument {
        let mut doc = Document::new();
        let section = doc.append_element(doc.root(), "section");
        let track = doc.append_element(section, "div");
        doc.add_class(track, TRACK_CLASS);
        for _ in 0..slides {
            let slide = doc.append_element(track, "div");
            doc.add_class(slide, SLIDE_CLASS);
        }
        let prev = doc.append_element(section, "button");
        doc.add_class(prev, ARROW_CLASS);
        doc.add_class(prev, PREV_CLASS);
        let next = doc.append_element(section, "button");
        doc.add_class(next, ARROW_CLASS);
        doc.add_class(next, NEXT_CLASS);
        for _ in 0..slides {
            let dot = doc.append_element(section, "span");
            doc.add_class(dot, DOT_CLASS);
        }
        let bar = doc.append_element(section, "div");
        doc.add_class(bar, PROGRESS_CLASS);
        page::shared(doc)
    }

    async fn settle() {
        // Clear the initial transition window.
        tokio::time::advance(Duration::from_millis(900)).await;
    }

    #[tokio::test]
    async fn mount_without_track_is_none() {
        let doc = page::shared(Document::new());
        assert!(Slider::mount(doc, SliderSettings::default()).await.is_none());
    }

    #[tokio::test]
    async fn mount_with_empty_track_is_none() {
        let mut doc = Document::new();
        let track = doc.append_element(doc.root(), "div");
        doc.add_class(track, TRACK_CLASS);
        assert!(Slider::mount(page::shared(doc), SliderSettings::default())
            .await
            .is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn wraps_in_both_directions() {
        let doc = slider_page(3);
        let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();
        settle().await;

        assert!(slider.next().await);
        settle().await;
        assert!(slider.next().await);
        settle().await;
        assert_eq!(slider.current_index().await, 2);
        assert!(slider.next().await);
        settle().await;
        assert_eq!(slider.current_index().await, 0);

        assert!(slider.prev().await);
        settle().await;
        assert_eq!(slider.current_index().await, 2);

        slider.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_during_transition_is_dropped() {
        let doc = slider_page(3);
        let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();
        settle().await;

        assert!(slider.next().await);
        assert_eq!(slider.current_index().await, 1);

        // Inside the 800ms window every request is dropped.
        assert!(!slider.next().await);
        assert!(!slider.prev().await);
        assert!(!slider.go_to(2).await);
        assert_eq!(slider.current_index().await, 1);

        tokio::time::advance(Duration::from_millis(700)).await;
        assert!(!slider.next().await);

        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(slider.next().await);
        assert_eq!(slider.current_index().await, 2);

        slider.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_jump_is_rejected() {
        let doc = slider_page(3);
        let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();
        settle().await;

        assert!(!slider.go_to(3).await);
        assert_eq!(slider.current_index().await, 0);
        assert!(slider.go_to(2).await);
        assert_eq!(slider.current_index().await, 2);

        slider.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn render_updates_track_and_dots() {
        let doc = slider_page(3);
        let slider = Slider::mount(doc.clone(), SliderSettings::default())
            .await
            .unwrap();
        settle().await;

        slider.next().await;
        let d = doc.read().await;
        let track = d.first_by_class(TRACK_CLASS).unwrap();
        assert_eq!(d.style(track, "transform"), Some("translateX(-100%)"));
        let dots = d.all_by_class(DOT_CLASS);
        assert!(!d.has_class(dots[0], "active"));
        assert!(d.has_class(dots[1], "active"));
        assert!(!d.has_class(dots[2], "active"));
        drop(d);

        slider.shutdown().await;
    }
}
