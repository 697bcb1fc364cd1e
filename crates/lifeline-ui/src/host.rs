//! Host trait for the portal UI.
//!
//! Everything the core needs from the page goes through [`Host`]: element
//! lookup, class and content mutation, window queries and the two kinds of
//! suspension the UI uses (timer waits and animation frames). The browser
//! implementation lives in `lifeline-web`; [`MemoryHost`](crate::MemoryHost)
//! backs the tests.

use core::fmt::Debug;
use core::future::Future;

use crate::error::UiResult;

/// Page services required by the UI core.
///
/// Lookups never fail: a missing element is `None` (or an empty list) and the
/// caller skips whatever it wanted to do with it. Mutations return
/// [`UiResult`] because a host may reject them.
pub trait Host {
    /// Handle to an element of the page
    type Node: Clone + Debug + PartialEq;

    // ========== Lookup ==========

    /// Find an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// All elements matching a selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// The document body.
    fn body(&self) -> Option<Self::Node>;

    // ========== Class State ==========

    /// Add a class. Adding a class that is already present is a no-op.
    fn add_class(&self, node: &Self::Node, class: &str) -> UiResult<()>;

    /// Remove a class. Removing an absent class is a no-op.
    fn remove_class(&self, node: &Self::Node, class: &str) -> UiResult<()>;

    /// Check whether a class is present.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    // ========== Content ==========

    /// Replace the text content of an element.
    fn set_text(&self, node: &Self::Node, text: &str) -> UiResult<()>;

    /// Current text content of an element.
    fn text(&self, node: &Self::Node) -> String;

    /// Replace the markup of an element. Callers escape untrusted text.
    fn set_inner_html(&self, node: &Self::Node, html: &str) -> UiResult<()>;

    /// Set an inline style property. An empty value clears the property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> UiResult<()>;

    // ========== Attributes ==========

    /// Read an attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> UiResult<()>;

    /// Remove an attribute.
    fn remove_attribute(&self, node: &Self::Node, name: &str) -> UiResult<()>;

    // ========== Structure ==========

    /// Create an element with the given class attribute and append it to `parent`.
    fn append_element(&self, parent: &Self::Node, tag: &str, class: &str)
        -> UiResult<Self::Node>;

    /// Detach an element from the document. Detaching twice is a no-op.
    fn remove(&self, node: &Self::Node);

    // ========== Window ==========

    /// Viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Whether the user asked the system for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Path of the current document, e.g. `/pages/dashboard.html`.
    fn current_path(&self) -> String;

    /// Replace the current document with `url`.
    fn navigate(&self, url: &str) -> UiResult<()>;

    /// Current time in milliseconds on the same clock as [`Host::next_frame`].
    fn now(&self) -> f64;

    // ========== Scheduling ==========

    /// Resolve after `ms` milliseconds.
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;

    /// Resolve at the next animation frame with the frame timestamp.
    fn next_frame(&self) -> impl Future<Output = f64>;
}
