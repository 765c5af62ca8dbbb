use super::{
    use_manual_ref_history_with_options, ManualRefHistory, ShouldCommitFn,
    UseRefHistoryOptions, UseRefHistoryRecord,
};
use crate::logging::trace;
use reactive_graph::{
    effect::{ImmediateEffect, RenderEffect},
    owner::on_cleanup,
    prelude::*,
    signal::RwSignal,
    wrappers::read::Signal,
};
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

/// Tracks the history of `source`, committing a snapshot every time it
/// changes.
///
/// Changes are picked up by an effect, so they are committed on the next tick
/// rather than at the moment the source is written, and several writes in the
/// same tick become one record. Writes made by [`undo`](RefHistory::undo),
/// [`redo`](RefHistory::redo) and [`reset`](RefHistory::reset) are not
/// committed, unless the source was also written by someone else in the same
/// tick. Tracking can be suspended with [`pause`](RefHistory::pause).
///
/// Committing automatically needs the `effects` feature.
pub fn use_ref_history<T>(source: RwSignal<T>) -> RefHistory<T, T>
where
    T: Clone + Send + Sync + 'static,
{
    use_ref_history_with_options(source, UseRefHistoryOptions::default())
}

/// Version of [`use_ref_history`] that takes a [`UseRefHistoryOptions`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn use_ref_history_with_options<T, S>(
    source: RwSignal<T>,
    options: UseRefHistoryOptions<T, S>,
) -> RefHistory<T, S>
where
    T: Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    let UseRefHistoryOptions {
        manual: mut manual_options,
        should_commit,
    } = options;

    // writes seen since the last commit check, and how many of them the
    // history made itself
    let writes = Arc::new(AtomicUsize::new(0));
    let ignored = Arc::new(AtomicUsize::new(0));
    let restoring = Arc::new(AtomicBool::new(false));

    let set_source = manual_options.set_source;
    manual_options.set_source = Arc::new({
        let restoring = Arc::clone(&restoring);
        move |source: &RwSignal<T>, value: T| {
            restoring.store(true, Ordering::Relaxed);
            set_source(source, value);
            restoring.store(false, Ordering::Relaxed);
        }
    });

    let manual = use_manual_ref_history_with_options(source, manual_options);
    let tracking = RwSignal::new(true);

    // counts every single write, as it happens
    let _counter = ImmediateEffect::new_sync({
        let writes = Arc::clone(&writes);
        let ignored = Arc::clone(&ignored);
        move |prev: Option<()>| {
            source.track();
            if prev.is_some() {
                writes.fetch_add(1, Ordering::Relaxed);
                if restoring.load(Ordering::Relaxed) {
                    ignored.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    });

    let effect = RenderEffect::new({
        let manual = manual.clone();
        let should_commit = should_commit.clone();
        move |_: Option<()>| {
            source.track();
            let writes = writes.swap(0, Ordering::Relaxed);
            let ignored = ignored.swap(0, Ordering::Relaxed);
            if writes == 0 {
                return;
            }
            if writes == ignored {
                trace!(writes, "ignoring writes made by the history");
                return;
            }
            if tracking.get_untracked() {
                manual.commit_filtered(should_commit.as_ref());
            }
        }
    });
    on_cleanup(move || drop(effect));

    RefHistory {
        source,
        last: manual.last,
        history: manual.history,
        undo_stack: manual.undo_stack,
        redo_stack: manual.redo_stack,
        can_undo: manual.can_undo,
        can_redo: manual.can_redo,
        is_tracking: tracking.into(),
        tracking,
        manual,
        should_commit,
    }
}

/// Return type of [`use_ref_history`].
pub struct RefHistory<T, S = T>
where
    T: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    /// The signal whose history is tracked.
    pub source: RwSignal<T>,
    /// The record describing the current state.
    pub last: Signal<UseRefHistoryRecord<S>>,
    /// `last` followed by the undo stack, newest first.
    pub history: Signal<Vec<UseRefHistoryRecord<S>>>,
    /// Records that can be undone, newest first.
    pub undo_stack: Signal<Vec<UseRefHistoryRecord<S>>>,
    /// Records that can be redone, newest first.
    pub redo_stack: Signal<Vec<UseRefHistoryRecord<S>>>,
    /// Whether there is anything to undo.
    pub can_undo: Signal<bool>,
    /// Whether there is anything to redo.
    pub can_redo: Signal<bool>,
    /// Whether changes of the source are being committed.
    pub is_tracking: Signal<bool>,
    tracking: RwSignal<bool>,
    manual: ManualRefHistory<T, S>,
    should_commit: Option<ShouldCommitFn<S>>,
}

impl<T, S> RefHistory<T, S>
where
    T: Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    /// Records the current value of the source right away, even while paused.
    pub fn commit(&self) {
        self.manual.commit();
    }

    /// See [`ManualRefHistory::undo`].
    pub fn undo(&self) {
        self.manual.undo();
    }

    /// See [`ManualRefHistory::redo`].
    pub fn redo(&self) {
        self.manual.redo();
    }

    /// See [`ManualRefHistory::reset`].
    pub fn reset(&self) {
        self.manual.reset();
    }

    /// See [`ManualRefHistory::clear`].
    pub fn clear(&self) {
        self.manual.clear();
    }

    /// Stops committing changes of the source.
    pub fn pause(&self) {
        self.tracking.set(false);
    }

    /// Starts committing changes again. With `commit_now`, the current value
    /// is committed immediately, unless `should_commit` rejects it.
    pub fn resume(&self, commit_now: bool) {
        self.tracking.set(true);
        if commit_now {
            self.manual.commit_filtered(self.should_commit.as_ref());
        }
    }
}

impl<T, S> Clone for RefHistory<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            last: self.last,
            history: self.history,
            undo_stack: self.undo_stack,
            redo_stack: self.redo_stack,
            can_undo: self.can_undo,
            can_redo: self.can_redo,
            is_tracking: self.is_tracking,
            tracking: self.tracking,
            manual: self.manual.clone(),
            should_commit: self.should_commit.clone(),
        }
    }
}

impl<T, S> fmt::Debug for RefHistory<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefHistory").finish_non_exhaustive()
    }
}
