use crate::{
    logging::log_warn,
    window::{default_window, Listener, WindowTarget},
};
use reactive_graph::{
    owner::on_cleanup, prelude::*, signal::RwSignal, wrappers::read::Signal,
};
use std::{fmt, sync::Arc};
use typed_builder::TypedBuilder;

/// Whether a CSS media query matches, updated whenever that changes.
///
/// Reads `false` when there is no window or the query cannot be evaluated.
pub fn use_media_query(query: impl Into<String>) -> Signal<bool> {
    use_media_query_with_options(query, UseMediaQueryOptions::default())
}

/// Version of [`use_media_query`] that takes a [`UseMediaQueryOptions`].
pub fn use_media_query_with_options(
    query: impl Into<String>,
    options: UseMediaQueryOptions,
) -> Signal<bool> {
    let query = query.into();
    let matches = RwSignal::new(false);

    if let Some(window) = options.window {
        let update: Listener = Arc::new({
            let window = Arc::clone(&window);
            let query = query.clone();
            move || match window.media_matches(&query) {
                Ok(value) => matches.set(value),
                Err(err) => log_warn!("use_media_query: {err}"),
            }
        });
        update();

        match window.add_media_listener(&query, update) {
            Ok(guard) => on_cleanup(move || drop(guard)),
            Err(err) => log_warn!("use_media_query: {err}"),
        }
    }

    matches.into()
}

/// Options for [`use_media_query_with_options`].
#[derive(TypedBuilder, Clone)]
pub struct UseMediaQueryOptions {
    /// The window evaluating the query. Defaults to [`default_window`].
    #[builder(default = default_window(), setter(strip_option))]
    window: Option<Arc<dyn WindowTarget>>,
}

impl Default for UseMediaQueryOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for UseMediaQueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseMediaQueryOptions")
            .field("window", &self.window.is_some())
            .finish()
    }
}
