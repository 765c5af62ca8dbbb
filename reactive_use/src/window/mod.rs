//! The host window that [`use_window_size`](crate::use_window_size) and
//! [`use_media_query`](crate::use_media_query) observe.
//!
//! Composables never talk to the browser directly. They go through a
//! [`WindowTarget`], which is [`default_window`] unless the options name
//! another one. In the browser (with the `web` feature) that is
//! `BrowserWindow`; everywhere else there is no window at all and the
//! composables keep their initial values.

use std::{fmt, sync::Arc};
use thiserror::Error;

#[cfg(all(
    feature = "web",
    target_arch = "wasm32",
    target_os = "unknown"
))]
mod browser;
#[cfg(all(
    feature = "web",
    target_arch = "wasm32",
    target_os = "unknown"
))]
pub use browser::BrowserWindow;

/// A callback run when the window reports an event.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Width and height, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The visual viewport: the part of the page currently visible, which can be
/// smaller than the layout viewport when zoomed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualViewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    /// Pinch-zoom scale factor.
    pub scale: f64,
}

/// What a `resize` listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeTarget {
    /// The window itself.
    Window,
    /// The window's visual viewport.
    VisualViewport,
}

/// Options passed when registering an event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// The listener never cancels the event.
    pub passive: bool,
}

/// Errors reported by a [`WindowTarget`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The host refused to register an event listener.
    #[error("could not listen to `{event}`: {reason}")]
    Listener {
        /// The event name.
        event: &'static str,
        /// What the host reported.
        reason: String,
    },
    /// The host cannot evaluate the media query.
    #[error("media query `{0}` is not supported")]
    MediaQuery(String),
    /// The target has no visual viewport.
    #[error("the window has no visual viewport")]
    NoVisualViewport,
}

/// Unregisters a listener when dropped.
#[must_use = "the listener is removed as soon as the guard is dropped"]
pub struct ListenerGuard {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ListenerGuard {
    /// Runs `remove` when the guard is dropped.
    pub fn new(remove: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

/// A window whose dimensions and media queries can be observed.
pub trait WindowTarget: Send + Sync {
    /// `innerWidth`/`innerHeight`: the layout viewport including scrollbars.
    fn inner_size(&self) -> Size;

    /// `outerWidth`/`outerHeight`: the whole browser window.
    fn outer_size(&self) -> Size;

    /// `clientWidth`/`clientHeight` of the document element: the layout
    /// viewport without scrollbars.
    fn client_size(&self) -> Size;

    /// The visual viewport, if the host has one.
    fn visual_viewport(&self) -> Option<VisualViewport>;

    /// Whether `query` currently matches.
    fn media_matches(&self, query: &str) -> Result<bool, WindowError>;

    /// Calls `listener` on every `resize` event of `target`.
    fn add_resize_listener(
        &self,
        target: ResizeTarget,
        listener: Listener,
        options: ListenerOptions,
    ) -> Result<ListenerGuard, WindowError>;

    /// Calls `listener` whenever `query` starts or stops matching.
    fn add_media_listener(
        &self,
        query: &str,
        listener: Listener,
    ) -> Result<ListenerGuard, WindowError>;
}

/// The window of the current environment: the browser window on
/// `wasm32-unknown-unknown` with the `web` feature, `None` otherwise.
pub fn default_window() -> Option<Arc<dyn WindowTarget>> {
    #[cfg(all(
        feature = "web",
        target_arch = "wasm32",
        target_os = "unknown"
    ))]
    {
        BrowserWindow::new()
            .map(|window| Arc::new(window) as Arc<dyn WindowTarget>)
    }
    #[cfg(not(all(
        feature = "web",
        target_arch = "wasm32",
        target_os = "unknown"
    )))]
    {
        None
    }
}
