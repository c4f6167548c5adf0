//! Host-delivered input events.

use super::NodeId;

/// Keyboard keys the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    /// Any other key, carried through for completeness.
    Other(String),
}

/// An input event dispatched by the embedding host.
///
/// The host translates its native input into these and feeds them through
/// `Enhancer::dispatch`; the engine never polls for input itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A click on the given element.
    Click { target: NodeId },
    /// The viewport scrolled to vertical offset `y`.
    Scroll { y: f64 },
    /// A key was pressed anywhere on the page.
    KeyDown { key: Key },
    /// The pointer entered the given element.
    PointerEnter { target: NodeId },
    /// The pointer left the given element.
    PointerLeave { target: NodeId },
    /// A pointer button was pressed on the given element.
    PointerDown { target: NodeId },
    /// A pointer button was released over the given element.
    PointerUp { target: NodeId },
    /// The viewport was resized to the given logical width.
    Resize { width: u32 },
}
