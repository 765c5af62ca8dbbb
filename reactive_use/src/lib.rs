//! Small, composable reactive-state utilities built on [`reactive_graph`].
//!
//! Each `use_*` function creates some reactive state under the current
//! [`Owner`](reactive_graph::owner::Owner), wires it to its inputs and returns
//! signals together with a few control methods:
//!
//! - [`use_cloned`]: a writable copy of a reactive source, with a flag telling
//!   whether the copy has drifted from the source since the last sync.
//! - [`use_manual_ref_history`] and [`use_ref_history`]: undo/redo history
//!   over a [`RwSignal`](reactive_graph::signal::RwSignal), committed by hand or
//!   on every change.
//! - [`use_window_size`] and [`use_media_query`]: the dimensions of the
//!   browser window, and whether a media query matches.
//!
//! ```rust
//! # let owner = reactive_graph::owner::Owner::new(); owner.set();
//! use reactive_graph::{prelude::*, signal::RwSignal};
//! use reactive_use::use_manual_ref_history;
//!
//! let counter = RwSignal::new(0);
//! let history = use_manual_ref_history(counter);
//!
//! counter.set(1);
//! history.commit();
//! counter.set(2);
//! history.commit();
//!
//! history.undo();
//! assert_eq!(counter.get(), 1);
//! history.redo();
//! assert_eq!(counter.get(), 2);
//! ```
//!
//! Composables that watch a source register effects. [`use_cloned`] resyncs as
//! soon as its source is written, while [`use_ref_history`] commits on the next
//! tick of the async executor, like any other `reactive_graph` effect. Effects
//! only run with the `effects` feature, which is on by default. Everything a
//! composable registers (effects, event listeners) is released when the owner
//! it was created under is cleaned up.
//!
//! ## Feature flags
//! - `effects` (default): lets composables follow their sources. Turn it off
//!   for server rendering, where effects should not run.
//! - `web`: enables `window::BrowserWindow`, the `web-sys`
//!   backed window used by default on `wasm32-unknown-unknown`.
//! - `serde`: derives `Serialize`/`Deserialize` for history records and sizes.
//! - `tracing`: routes warnings and trace events through `tracing`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod history;
mod logging;
mod use_cloned;
mod use_media_query;
mod use_window_size;
mod utils;
pub mod window;

pub use history::{
    use_manual_ref_history, use_manual_ref_history_with_options,
    use_ref_history, use_ref_history_with_options, ManualRefHistory,
    RefHistory, UseManualRefHistoryOptions, UseRefHistoryOptions,
    UseRefHistoryRecord,
};
pub use use_cloned::*;
pub use use_media_query::*;
pub use use_window_size::*;

/// Reexports the composables and their option types.
pub mod prelude {
    pub use crate::{
        history::*, use_cloned::*, use_media_query::*, use_window_size::*,
        window::WindowTarget,
    };
}
