use crate::{
    logging::log_warn,
    window::{
        default_window, Listener, ListenerOptions, ResizeTarget, Size,
        WindowTarget,
    },
};
use reactive_graph::{
    owner::on_cleanup, prelude::*, signal::RwSignal, wrappers::read::Signal,
};
use std::{fmt, sync::Arc};
use typed_builder::TypedBuilder;

/// The media query whose changes signal a rotated screen.
pub const ORIENTATION_QUERY: &str = "(orientation: portrait)";

/// Reactive window size.
///
/// Measures the window once when called and again on every `resize` event
/// (and, by default, whenever the screen switches between portrait and
/// landscape). Without a window, e.g. during server rendering, `width` and
/// `height` keep their initial values, which default to [`f64::INFINITY`].
///
/// ```rust
/// # let owner = reactive_graph::owner::Owner::new(); owner.set();
/// use reactive_graph::prelude::*;
/// use reactive_use::{use_window_size_with_options, UseWindowSizeOptions};
///
/// let size = use_window_size_with_options(
///     UseWindowSizeOptions::builder()
///         .initial_width(1280.0)
///         .initial_height(720.0)
///         .build(),
/// );
/// # if cfg!(not(target_arch = "wasm32")) {
/// assert_eq!(size.width.get(), 1280.0);
/// # }
/// ```
pub fn use_window_size() -> UseWindowSizeReturn {
    use_window_size_with_options(UseWindowSizeOptions::default())
}

/// Version of [`use_window_size`] that takes a [`UseWindowSizeOptions`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn use_window_size_with_options(
    options: UseWindowSizeOptions,
) -> UseWindowSizeReturn {
    let UseWindowSizeOptions {
        window,
        initial_width,
        initial_height,
        listen_orientation,
        include_scrollbar,
        size_type,
    } = options;

    let width = RwSignal::new(initial_width);
    let height = RwSignal::new(initial_height);

    if let Some(window) = window {
        let update: Listener = Arc::new({
            let window = Arc::clone(&window);
            move || {
                let size = measure(&*window, size_type, include_scrollbar);
                width.set(size.width);
                height.set(size.height);
            }
        });
        update();

        let passive = ListenerOptions { passive: true };
        let mut guards = Vec::new();
        match window.add_resize_listener(
            ResizeTarget::Window,
            Arc::clone(&update),
            passive,
        ) {
            Ok(guard) => guards.push(guard),
            Err(err) => log_warn!("use_window_size: {err}"),
        }

        if size_type == WindowSizeType::Visual
            && window.visual_viewport().is_some()
        {
            match window.add_resize_listener(
                ResizeTarget::VisualViewport,
                Arc::clone(&update),
                passive,
            ) {
                Ok(guard) => guards.push(guard),
                Err(err) => log_warn!("use_window_size: {err}"),
            }
        }

        if listen_orientation {
            match window.add_media_listener(ORIENTATION_QUERY, update) {
                Ok(guard) => guards.push(guard),
                Err(err) => log_warn!("use_window_size: {err}"),
            }
        }

        on_cleanup(move || drop(guards));
    }

    UseWindowSizeReturn {
        width: width.into(),
        height: height.into(),
    }
}

fn measure(
    window: &dyn WindowTarget,
    size_type: WindowSizeType,
    include_scrollbar: bool,
) -> Size {
    match size_type {
        WindowSizeType::Outer => return window.outer_size(),
        WindowSizeType::Visual => {
            if let Some(viewport) = window.visual_viewport() {
                return Size::new(
                    (viewport.width * viewport.scale).round(),
                    (viewport.height * viewport.scale).round(),
                );
            }
        }
        WindowSizeType::Inner => {}
    }

    if include_scrollbar {
        window.inner_size()
    } else {
        window.client_size()
    }
}

/// Which of the window's sizes [`use_window_size`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowSizeType {
    /// The layout viewport (`innerWidth`/`innerHeight`).
    #[default]
    Inner,
    /// The whole browser window (`outerWidth`/`outerHeight`).
    Outer,
    /// The visual viewport scaled by the zoom factor. Falls back to `Inner`
    /// when there is no visual viewport.
    Visual,
}

/// Options for [`use_window_size_with_options`].
#[derive(TypedBuilder, Clone)]
pub struct UseWindowSizeOptions {
    /// The window to measure. Defaults to [`default_window`].
    #[builder(default = default_window(), setter(strip_option))]
    window: Option<Arc<dyn WindowTarget>>,

    /// Width reported until the window is measured, and forever without a
    /// window.
    #[builder(default = f64::INFINITY)]
    initial_width: f64,

    /// Height reported until the window is measured, and forever without a
    /// window.
    #[builder(default = f64::INFINITY)]
    initial_height: f64,

    /// Measure again when the screen orientation changes.
    #[builder(default = true)]
    listen_orientation: bool,

    /// Whether the inner size includes the scrollbars. Without them the
    /// document element's client size is used.
    #[builder(default = true)]
    include_scrollbar: bool,

    /// Which size to report.
    #[builder(default)]
    size_type: WindowSizeType,
}

impl Default for UseWindowSizeOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for UseWindowSizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseWindowSizeOptions")
            .field("window", &self.window.is_some())
            .field("initial_width", &self.initial_width)
            .field("initial_height", &self.initial_height)
            .field("listen_orientation", &self.listen_orientation)
            .field("include_scrollbar", &self.include_scrollbar)
            .field("size_type", &self.size_type)
            .finish()
    }
}

/// Return type of [`use_window_size`].
#[derive(Debug, Clone, Copy)]
pub struct UseWindowSizeReturn {
    /// The window width.
    pub width: Signal<f64>,
    /// The window height.
    pub height: Signal<f64>,
}
