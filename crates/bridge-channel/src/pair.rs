//! # Window Pair
//!
//! A parent page and the content window of the frame it embeds.

use crate::window::Window;
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Two windows that talk to each other.
///
/// The parent listens on `parent` and posts to `content`; the embedded
/// context does the reverse.
#[derive(Debug, Clone)]
pub struct WindowPair {
    /// The embedding page's inbox (`window.parent` from inside the frame).
    pub parent: Window,
    /// The frame's inbox (`iframe.contentWindow` from the parent).
    pub content: Window,
}

impl WindowPair {
    /// Create a pair with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a pair with the given per-listener capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parent: Window::with_capacity("parent", capacity),
            content: Window::with_capacity("content", capacity),
        }
    }
}

impl Default for WindowPair {
    fn default() -> Self {
        Self::new()
    }
}
