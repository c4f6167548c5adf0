//! Shared fragment registry and loading.

pub mod fallback;
mod fetch;

pub use fetch::{FetchError, FragmentFetcher, HttpFetcher};

use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::page::{Document, NodeId, SharedDocument};

/// Element id the footer year is written into.
pub const YEAR_ELEMENT_ID: &str = "current-year";

/// Class marking the nav link for the current page.
pub const ACTIVE_LINK_CLASS: &str = "active";

/// Kind-specific post-processing a fragment receives after mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    Header,
    Footer,
    /// No post-processing.
    Plain,
}

/// A named fragment and where it mounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentSpec {
    pub name: String,
    pub container_id: String,
    pub source_path: String,
    pub kind: FragmentKind,
    /// Markup mounted instead of the built-in fallback when the fetch fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_html: Option<String>,
}

impl FragmentSpec {
    pub fn header() -> Self {
        Self {
            name: "header".to_string(),
            container_id: "header-container".to_string(),
            source_path: "components/header.html".to_string(),
            kind: FragmentKind::Header,
            fallback_html: None,
        }
    }

    pub fn footer() -> Self {
        Self {
            name: "footer".to_string(),
            container_id: "footer-container".to_string(),
            source_path: "components/footer.html".to_string(),
            kind: FragmentKind::Footer,
            fallback_html: None,
        }
    }
}

/// The fixed default registry: header then footer.
pub fn default_fragments() -> Vec<FragmentSpec> {
    vec![FragmentSpec::header(), FragmentSpec::footer()]
}

/// What happened to a single fragment load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetched and mounted.
    Loaded,
    /// Fetch failed; fallback markup mounted instead.
    Fallback,
    /// Name not in the registry; nothing was fetched or mutated.
    Unknown,
    /// Registry entry exists but its container is absent from the page.
    MissingContainer,
}

/// Fetches fragments and mounts them into their containers.
pub struct FragmentLoader {
    doc: SharedDocument,
    fetcher: Arc<dyn FragmentFetcher>,
    fragments: Vec<FragmentSpec>,
    page_path: String,
}

impl FragmentLoader {
    pub fn new(
        doc: SharedDocument,
        fetcher: Arc<dyn FragmentFetcher>,
        fragments: Vec<FragmentSpec>,
        page_path: String,
    ) -> Self {
        Self {
            doc,
            fetcher,
            fragments,
            page_path,
        }
    }

    /// The registry, in load order.
    pub fn fragments(&self) -> &[FragmentSpec] {
        &self.fragments
    }

    /// Load one fragment by name.
    ///
    /// Resolves only after the container content is replaced (markup or
    /// fallback) and kind-specific post-processing has run. Unknown names
    /// are ignored without a fetch.
    pub async fn load(&self, name: &str) -> LoadOutcome {
        let Some(spec) = self.fragments.iter().find(|f| f.name == name) else {
            debug!("Unknown fragment '{}', skipping", name);
            return LoadOutcome::Unknown;
        };

        let (markup, outcome) = match self.fetcher.fetch(&spec.source_path).await {
            Ok(body) => (body, LoadOutcome::Loaded),
            Err(err) => {
                error!("Failed to load fragment '{}': {}", spec.name, err);
                let markup = spec
                    .fallback_html
                    .clone()
                    .unwrap_or_else(|| fallback::builtin(spec.kind).to_string());
                (markup, LoadOutcome::Fallback)
            }
        };

        let mut doc = self.doc.write().await;
        if !doc.mount_html(&spec.container_id, &markup) {
            warn!(
                "Container #{} for fragment '{}' not found, skipping",
                spec.container_id, spec.name
            );
            return LoadOutcome::MissingContainer;
        }
        self.post_process(&mut doc, spec);
        outcome
    }

    /// Kind-specific follow-up, run for fetched and fallback markup alike
    /// so a degraded page still gets a working nav and year.
    fn post_process(&self, doc: &mut Document, spec: &FragmentSpec) {
        let Some(container) = doc.element_by_id(&spec.container_id) else {
            return;
        };
        match spec.kind {
            FragmentKind::Header => {
                let activated = doc.activate_embedded_scripts(container);
                if activated > 0 {
                    debug!("Activated {} embedded script(s) from header", activated);
                }
                self.mark_active_link(doc, container);
            }
            FragmentKind::Footer => {
                if let Some(year_el) = doc.element_by_id(YEAR_ELEMENT_ID) {
                    doc.set_text(year_el, &Utc::now().year().to_string());
                }
            }
            FragmentKind::Plain => {}
        }
    }

    fn mark_active_link(&self, doc: &mut Document, container: NodeId) {
        for link in doc.all_by_tag_in(container, "a") {
            let matches = doc
                .attr(link, "href")
                .map(|href| href_matches(href, &self.page_path))
                .unwrap_or(false);
            doc.set_class(link, ACTIVE_LINK_CLASS, matches);
        }
    }
}

/// Whether a nav link's href points at the current page. Compares the
/// full path first, then final path segments, ignoring query and hash.
fn href_matches(href: &str, page_path: &str) -> bool {
    let href = href.split(['?', '#']).next().unwrap_or("");
    if href.is_empty() {
        return false;
    }
    if href == page_path {
        return true;
    }
    let href_file = href.rsplit('/').next().unwrap_or(href);
    let page_file = page_path.rsplit('/').next().unwrap_or(page_path);
    !href_file.is_empty() && href_file == page_file
}
