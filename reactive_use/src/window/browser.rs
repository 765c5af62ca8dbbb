use super::{
    Listener, ListenerGuard, ListenerOptions, ResizeTarget, Size,
    VisualViewport, WindowError, WindowTarget,
};
use send_wrapper::SendWrapper;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{AddEventListenerOptions, EventTarget, MediaQueryList};

/// The browser window, accessed through `web-sys`.
#[derive(Debug, Clone, Copy)]
pub struct BrowserWindow {
    _private: (),
}

impl BrowserWindow {
    /// Returns `None` when there is no `window` global, e.g. inside a web
    /// worker.
    pub fn new() -> Option<Self> {
        web_sys::window().map(|_| Self { _private: () })
    }
}

fn number(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|value| value.as_f64()).unwrap_or_default()
}

fn media_query_list(query: &str) -> Result<MediaQueryList, WindowError> {
    web_sys::window()
        .and_then(|window| window.match_media(query).ok().flatten())
        .ok_or_else(|| WindowError::MediaQuery(query.to_string()))
}

fn listen(
    target: EventTarget,
    event: &'static str,
    listener: Listener,
    options: ListenerOptions,
) -> Result<ListenerGuard, WindowError> {
    let closure = Closure::<dyn Fn()>::new(move || listener());
    let event_options = AddEventListenerOptions::new();
    event_options.set_passive(options.passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &event_options,
        )
        .map_err(|err| WindowError::Listener {
            event,
            reason: format!("{err:?}"),
        })?;

    // browser handles are !Send; they never leave the main thread
    let handle = SendWrapper::new((target, closure));
    Ok(ListenerGuard::new(move || {
        let (target, closure) = handle.take();
        _ = target.remove_event_listener_with_callback(
            event,
            closure.as_ref().unchecked_ref(),
        );
    }))
}

impl WindowTarget for BrowserWindow {
    fn inner_size(&self) -> Size {
        web_sys::window()
            .map(|window| {
                Size::new(
                    number(window.inner_width()),
                    number(window.inner_height()),
                )
            })
            .unwrap_or_default()
    }

    fn outer_size(&self) -> Size {
        web_sys::window()
            .map(|window| {
                Size::new(
                    number(window.outer_width()),
                    number(window.outer_height()),
                )
            })
            .unwrap_or_default()
    }

    fn client_size(&self) -> Size {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .map(|element| {
                Size::new(
                    f64::from(element.client_width()),
                    f64::from(element.client_height()),
                )
            })
            .unwrap_or_default()
    }

    fn visual_viewport(&self) -> Option<VisualViewport> {
        let viewport = web_sys::window()?.visual_viewport()?;
        Some(VisualViewport {
            width: viewport.width(),
            height: viewport.height(),
            scale: viewport.scale(),
        })
    }

    fn media_matches(&self, query: &str) -> Result<bool, WindowError> {
        media_query_list(query).map(|list| list.matches())
    }

    fn add_resize_listener(
        &self,
        target: ResizeTarget,
        listener: Listener,
        options: ListenerOptions,
    ) -> Result<ListenerGuard, WindowError> {
        let window = web_sys::window().ok_or_else(|| WindowError::Listener {
            event: "resize",
            reason: "no window".to_string(),
        })?;
        let target: EventTarget = match target {
            ResizeTarget::Window => window.into(),
            ResizeTarget::VisualViewport => window
                .visual_viewport()
                .ok_or(WindowError::NoVisualViewport)?
                .into(),
        };
        listen(target, "resize", listener, options)
    }

    fn add_media_listener(
        &self,
        query: &str,
        listener: Listener,
    ) -> Result<ListenerGuard, WindowError> {
        let list = media_query_list(query)?;
        listen(list.into(), "change", listener, ListenerOptions::default())
    }
}
