//! Slider timing properties under a paused clock.

use std::sync::Arc;
use std::time::Duration;

use siteshell::config::{Settings, SliderSettings};
use siteshell::enhance::Enhancer;
use siteshell::fragments::{FetchError, FragmentFetcher};
use siteshell::page::{self, Document, Event, NodeId, SharedDocument};
use siteshell::slider::{Slider, DOT_CLASS, SLIDE_CLASS, TRACK_CLASS};

fn slider_page(slides: usize) -> (SharedDocument, Vec<NodeId>) {
    let mut doc = Document::new();
    let section = doc.append_element(doc.root(), "section");
    let track = doc.append_element(section, "div");
    doc.add_class(track, TRACK_CLASS);
    let mut slide_ids = Vec::new();
    for _ in 0..slides {
        let slide = doc.append_element(track, "div");
        doc.add_class(slide, SLIDE_CLASS);
        slide_ids.push(slide);
    }
    for _ in 0..slides {
        let dot = doc.append_element(section, "span");
        doc.add_class(dot, DOT_CLASS);
    }
    (page::shared(doc), slide_ids)
}

async fn advance(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn autoplay_advances_after_the_full_interval() {
    let (doc, _) = slider_page(3);
    let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();

    advance(5900).await;
    assert_eq!(slider.current_index().await, 0);

    advance(200).await;
    assert_eq!(slider.current_index().await, 1);

    slider.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn manual_navigation_resets_the_countdown() {
    let (doc, _) = slider_page(3);
    let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();
    advance(900).await;

    // t=900: manual advance, countdown restarts from here.
    assert!(slider.next().await);
    assert_eq!(slider.current_index().await, 1);

    // t=5900: the original 6000ms mark passes with no automatic advance.
    advance(5000).await;
    assert_eq!(slider.current_index().await, 1);

    // Second manual advance; again nothing fires at the previous marks.
    assert!(slider.next().await);
    advance(1100).await;
    assert_eq!(slider.current_index().await, 2);

    // Full interval after the last manual advance, autoplay resumes.
    advance(4950).await;
    assert_eq!(slider.current_index().await, 0);

    slider.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn hover_pause_blocks_automatic_advances() {
    let (doc, _) = slider_page(3);
    let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();
    advance(900).await;

    slider.pause().await;
    assert!(!slider.autoplay_active().await);

    advance(20_000).await;
    assert_eq!(slider.current_index().await, 0);

    slider.resume().await;
    assert!(slider.autoplay_active().await);
    advance(6100).await;
    assert_eq!(slider.current_index().await, 1);

    slider.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn progress_tracks_the_autoplay_interval() {
    let (doc, _) = slider_page(3);
    let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();

    // Half the interval: progress sits at about half.
    advance(3000).await;
    let progress = slider.progress().await;
    assert!((progress - 50.0).abs() < 1.0, "progress was {}", progress);

    // Manual navigation resets the bar.
    assert!(slider.next().await);
    assert!(slider.progress().await < 1.0);

    slider.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_timers() {
    let (doc, _) = slider_page(3);
    let slider = Slider::mount(doc, SliderSettings::default()).await.unwrap();
    advance(900).await;

    slider.shutdown().await;
    advance(60_000).await;
    assert_eq!(slider.current_index().await, 0);
    assert!(!slider.autoplay_active().await);

    // Manual navigation still works after shutdown, and restarts autoplay.
    assert!(slider.next().await);
    assert_eq!(slider.current_index().await, 1);

    slider.shutdown().await;
}

/// Fetcher that always fails, forcing fallback fragments.
struct OfflineFetcher;

#[async_trait::async_trait]
impl FragmentFetcher for OfflineFetcher {
    async fn fetch(&self, _path: &str) -> Result<String, FetchError> {
        Err(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

#[tokio::test(start_paused = true)]
async fn pointer_events_pause_and_resume_through_dispatch() {
    let (doc, slides) = {
        let mut doc = Document::new();
        let header = doc.append_element(doc.root(), "div");
        doc.set_id(header, "header-container");
        let footer = doc.append_element(doc.root(), "div");
        doc.set_id(footer, "footer-container");
        let track = doc.append_element(doc.root(), "div");
        doc.add_class(track, TRACK_CLASS);
        let mut slides = Vec::new();
        for _ in 0..3 {
            let slide = doc.append_element(track, "div");
            doc.add_class(slide, SLIDE_CLASS);
            slides.push(slide);
        }
        (page::shared(doc), slides)
    };

    let mut enhancer = Enhancer::new(doc, Arc::new(OfflineFetcher), Settings::default());
    enhancer.bootstrap().await;
    advance(900).await;

    enhancer
        .dispatch(Event::PointerEnter { target: slides[0] })
        .await;
    assert!(!enhancer.slider().unwrap().autoplay_active().await);

    advance(20_000).await;
    assert_eq!(enhancer.slider().unwrap().current_index().await, 0);

    enhancer
        .dispatch(Event::PointerLeave { target: slides[0] })
        .await;
    advance(6100).await;
    assert_eq!(enhancer.slider().unwrap().current_index().await, 1);

    enhancer.shutdown().await;
}
