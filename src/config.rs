//! Engine settings with file-based overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fragments::{default_fragments, FragmentSpec};

/// Default viewport width (logical px) at or below which the page counts
/// as narrow for mobile-menu behavior.
pub const DEFAULT_NARROW_VIEWPORT_PX: u32 = 768;

/// Slider timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderSettings {
    /// Milliseconds between automatic advances.
    #[serde(default = "default_autoplay_interval_ms")]
    pub autoplay_interval_ms: u64,
    /// Milliseconds a slide transition takes; navigation is locked for
    /// exactly this window.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Milliseconds between progress-bar ticks.
    #[serde(default = "default_progress_tick_ms")]
    pub progress_tick_ms: u64,
    /// Progress percentage added per tick. The defaults reach 100% in one
    /// autoplay interval.
    #[serde(default = "default_progress_step")]
    pub progress_step: f64,
}

fn default_autoplay_interval_ms() -> u64 {
    6000
}

fn default_transition_ms() -> u64 {
    800
}

fn default_progress_tick_ms() -> u64 {
    30
}

fn default_progress_step() -> f64 {
    0.5
}

impl Default for SliderSettings {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: default_autoplay_interval_ms(),
            transition_ms: default_transition_ms(),
            progress_tick_ms: default_progress_tick_ms(),
            progress_step: default_progress_step(),
        }
    }
}

impl SliderSettings {
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }
}

/// Cosmetic transform feedback for the scroll-to-top button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSettings {
    /// Transform applied while the button is pressed.
    #[serde(default = "default_press_transform")]
    pub press_transform: String,
    /// Transform applied when the press is released.
    #[serde(default = "default_release_transform")]
    pub release_transform: String,
}

fn default_press_transform() -> String {
    "translateY(1px) scale(0.98)".to_string()
}

fn default_release_transform() -> String {
    "translateY(-3px) scale(1.05)".to_string()
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            press_transform: default_press_transform(),
            release_transform: default_release_transform(),
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the page being enhanced, used for active-nav-link marking.
    pub page_path: String,
    /// Viewport width at or below which mobile-menu close rules apply.
    pub narrow_viewport_px: u32,
    /// Scroll offset beyond which the header gains the `scrolled` class.
    pub header_scroll_threshold: f64,
    /// Scroll offset beyond which the scroll-to-top button becomes visible.
    pub to_top_visible_threshold: f64,
    /// Fixed-header clearance subtracted from anchor scroll targets.
    pub anchor_offset_px: f64,
    /// Whether arrow keys anywhere on the page drive the slider.
    pub keyboard_navigation: bool,
    /// User agent for fragment requests.
    pub user_agent: String,
    /// Fragment request timeout in seconds.
    pub request_timeout: u64,
    /// Fragment registry, in load order.
    pub fragments: Vec<FragmentSpec>,
    pub slider: SliderSettings,
    pub to_top_feedback: FeedbackSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_path: "index.html".to_string(),
            narrow_viewport_px: DEFAULT_NARROW_VIEWPORT_PX,
            header_scroll_threshold: 100.0,
            to_top_visible_threshold: 300.0,
            anchor_offset_px: 80.0,
            keyboard_navigation: true,
            user_agent: "siteshell/0.4".to_string(),
            request_timeout: 30,
            fragments: default_fragments(),
            slider: SliderSettings::default(),
            to_top_feedback: FeedbackSettings::default(),
        }
    }
}

impl Settings {
    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Configuration file structure. Every field is optional; present fields
/// override the corresponding setting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrow_viewport_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_scroll_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_top_visible_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_offset_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_navigation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Replaces the default fragment registry when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<FragmentSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider: Option<SliderSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_top_feedback: Option<FeedbackSettings>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file path.
    /// Supports TOML and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => {
                toml::from_str(&contents).map_err(|e| format!("Failed to parse TOML config: {}", e))?
            }
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref page_path) = self.page_path {
            settings.page_path = page_path.clone();
        }
        if let Some(narrow) = self.narrow_viewport_px {
            settings.narrow_viewport_px = narrow;
        }
        if let Some(threshold) = self.header_scroll_threshold {
            settings.header_scroll_threshold = threshold;
        }
        if let Some(threshold) = self.to_top_visible_threshold {
            settings.to_top_visible_threshold = threshold;
        }
        if let Some(offset) = self.anchor_offset_px {
            settings.anchor_offset_px = offset;
        }
        if let Some(keyboard) = self.keyboard_navigation {
            settings.keyboard_navigation = keyboard;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if !self.fragments.is_empty() {
            settings.fragments = self.fragments.clone();
        }
        if let Some(ref slider) = self.slider {
            settings.slider = slider.clone();
        }
        if let Some(ref feedback) = self.to_top_feedback {
            settings.to_top_feedback = feedback.clone();
        }
    }
}
