//! Undo/redo history over a [`RwSignal`].
//!
//! [`use_manual_ref_history`] records a snapshot of the source whenever
//! [`commit`](ManualRefHistory::commit) is called. [`use_ref_history`] does the
//! same automatically every time the source changes.
//!
//! Snapshots are produced by a `dump` function and turned back into values by
//! a `parse` function. Both default to [`Clone::clone`], so a snapshot is an
//! owned copy that later edits of the source never reach. Choosing a different
//! snapshot type (for example a serialized string) is done with
//! [`UseManualRefHistoryOptions::dump_parse`].

use reactive_graph::{signal::RwSignal, traits::Set};
use std::{fmt, sync::Arc};

mod auto;
mod manual;
mod stack;

pub use auto::*;
pub use manual::*;
pub use stack::HistoryStack;

/// One entry in the history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseRefHistoryRecord<S> {
    /// The recorded value, as produced by the `dump` function.
    pub snapshot: S,
    /// When the snapshot was taken, in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

pub(crate) type DumpFn<T, S> = Arc<dyn Fn(&T) -> S + Send + Sync>;
pub(crate) type ParseFn<T, S> = Arc<dyn Fn(&S) -> T + Send + Sync>;
pub(crate) type SetSourceFn<T> = Arc<dyn Fn(&RwSignal<T>, T) + Send + Sync>;
pub(crate) type ShouldCommitFn<S> = Arc<dyn Fn(&S, &S) -> bool + Send + Sync>;

/// Options for [`use_manual_ref_history_with_options`].
///
/// `S` is the snapshot type stored in the history. It is the source type unless
/// [`dump_parse`](Self::dump_parse) says otherwise.
pub struct UseManualRefHistoryOptions<T, S = T> {
    pub(crate) capacity: Option<usize>,
    pub(crate) dump: DumpFn<T, S>,
    pub(crate) parse: ParseFn<T, S>,
    pub(crate) set_source: SetSourceFn<T>,
}

impl<T> Default for UseManualRefHistoryOptions<T, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            capacity: None,
            dump: Arc::new(T::clone),
            parse: Arc::new(T::clone),
            set_source: Arc::new(|source: &RwSignal<T>, value: T| {
                source.set(value)
            }),
        }
    }
}

impl<T: 'static, S> UseManualRefHistoryOptions<T, S> {
    /// Maximum number of undo steps kept. The oldest are dropped first.
    /// Unbounded by default.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// How a restored value is written back into the source. Defaults to
    /// [`Set::set`](reactive_graph::traits::Set::set).
    pub fn set_source(
        mut self,
        set_source: impl Fn(&RwSignal<T>, T) + Send + Sync + 'static,
    ) -> Self {
        self.set_source = Arc::new(set_source);
        self
    }

    /// Stores snapshots as `S2`: `dump` turns the source value into a snapshot
    /// and `parse` turns a snapshot back into a value.
    pub fn dump_parse<S2>(
        self,
        dump: impl Fn(&T) -> S2 + Send + Sync + 'static,
        parse: impl Fn(&S2) -> T + Send + Sync + 'static,
    ) -> UseManualRefHistoryOptions<T, S2> {
        UseManualRefHistoryOptions {
            capacity: self.capacity,
            dump: Arc::new(dump),
            parse: Arc::new(parse),
            set_source: self.set_source,
        }
    }
}

impl<T: 'static> UseManualRefHistoryOptions<T, T> {
    /// Replaces [`Clone::clone`] as the way snapshots are taken and restored.
    pub fn clone_with(
        mut self,
        clone: impl Fn(&T) -> T + Send + Sync + 'static,
    ) -> Self {
        let clone_fn = Arc::new(clone);
        self.dump = Arc::clone(&clone_fn) as DumpFn<T, T>;
        self.parse = clone_fn;
        self
    }
}

impl<T, S> fmt::Debug for UseManualRefHistoryOptions<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseManualRefHistoryOptions")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Options for [`use_ref_history_with_options`].
pub struct UseRefHistoryOptions<T, S = T> {
    pub(crate) manual: UseManualRefHistoryOptions<T, S>,
    pub(crate) should_commit: Option<ShouldCommitFn<S>>,
}

impl<T> Default for UseRefHistoryOptions<T, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            manual: UseManualRefHistoryOptions::default(),
            should_commit: None,
        }
    }
}

impl<T: 'static, S> UseRefHistoryOptions<T, S> {
    /// See [`UseManualRefHistoryOptions::capacity`].
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.manual = self.manual.capacity(capacity);
        self
    }

    /// See [`UseManualRefHistoryOptions::set_source`].
    pub fn set_source(
        mut self,
        set_source: impl Fn(&RwSignal<T>, T) + Send + Sync + 'static,
    ) -> Self {
        self.manual = self.manual.set_source(set_source);
        self
    }

    /// See [`UseManualRefHistoryOptions::dump_parse`]. Resets
    /// [`should_commit`](Self::should_commit), which is typed by the snapshot.
    pub fn dump_parse<S2>(
        self,
        dump: impl Fn(&T) -> S2 + Send + Sync + 'static,
        parse: impl Fn(&S2) -> T + Send + Sync + 'static,
    ) -> UseRefHistoryOptions<T, S2> {
        UseRefHistoryOptions {
            manual: self.manual.dump_parse(dump, parse),
            should_commit: None,
        }
    }

    /// Called with the last recorded snapshot and the new one before an
    /// automatic commit. Returning `false` skips the commit.
    pub fn should_commit(
        mut self,
        should_commit: impl Fn(&S, &S) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_commit = Some(Arc::new(should_commit));
        self
    }
}

impl<T: 'static> UseRefHistoryOptions<T, T> {
    /// See [`UseManualRefHistoryOptions::clone_with`].
    pub fn clone_with(
        mut self,
        clone: impl Fn(&T) -> T + Send + Sync + 'static,
    ) -> Self {
        self.manual = self.manual.clone_with(clone);
        self
    }
}

impl<T, S> fmt::Debug for UseRefHistoryOptions<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseRefHistoryOptions")
            .field("manual", &self.manual)
            .field("should_commit", &self.should_commit.is_some())
            .finish()
    }
}
