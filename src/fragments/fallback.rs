//! Built-in markup mounted when a fragment fetch fails.
//!
//! The page must stay navigable even when every fetch fails, so the
//! fallbacks carry the structural hooks the rest of the engine expects:
//! the nav list with its marker classes and the copyright-year slot.

use super::FragmentKind;

/// Minimal header: trigger button plus a short inline nav.
pub const HEADER_FALLBACK: &str = r##"<header>
  <nav>
    <button class="mobile-menu-btn">☰</button>
    <ul class="nav-links">
      <li><a href="index.html">Home</a></li>
      <li><a href="#contact">Contact</a></li>
    </ul>
  </nav>
</header>"##;

/// Minimal footer: copyright line with the year slot.
pub const FOOTER_FALLBACK: &str = r#"<footer>
  <p>&copy; <span id="current-year"></span> All rights reserved.</p>
</footer>"#;

/// Built-in fallback markup for a fragment kind.
pub fn builtin(kind: FragmentKind) -> &'static str {
    match kind {
        FragmentKind::Header => HEADER_FALLBACK,
        FragmentKind::Footer => FOOTER_FALLBACK,
        FragmentKind::Plain => "",
    }
}
