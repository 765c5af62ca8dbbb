use super::{
    DumpFn, HistoryStack, ParseFn, SetSourceFn, ShouldCommitFn,
    UseManualRefHistoryOptions, UseRefHistoryRecord,
};
use crate::{logging::trace, utils::timestamp};
use reactive_graph::{
    prelude::*, signal::RwSignal, wrappers::read::Signal,
};
use std::{fmt, sync::Arc};

/// Tracks the history of `source`, recording a snapshot every time
/// [`commit`](ManualRefHistory::commit) is called.
///
/// The current value is recorded once when the history is created, so
/// [`history`](ManualRefHistory::history) always holds at least one record.
///
/// ```rust
/// # let owner = reactive_graph::owner::Owner::new(); owner.set();
/// use reactive_graph::{prelude::*, signal::RwSignal};
/// use reactive_use::use_manual_ref_history;
///
/// let text = RwSignal::new(String::from("a"));
/// let history = use_manual_ref_history(text);
///
/// text.set("ab".into());
/// history.commit();
/// text.set("abc".into());
///
/// // throw away the uncommitted edit
/// history.reset();
/// assert_eq!(text.get(), "ab");
///
/// history.undo();
/// assert_eq!(text.get(), "a");
/// assert!(history.can_redo.get());
/// ```
pub fn use_manual_ref_history<T>(source: RwSignal<T>) -> ManualRefHistory<T, T>
where
    T: Clone + Send + Sync + 'static,
{
    use_manual_ref_history_with_options(
        source,
        UseManualRefHistoryOptions::default(),
    )
}

/// Version of [`use_manual_ref_history`] that takes a
/// [`UseManualRefHistoryOptions`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn use_manual_ref_history_with_options<T, S>(
    source: RwSignal<T>,
    options: UseManualRefHistoryOptions<T, S>,
) -> ManualRefHistory<T, S>
where
    T: Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    let UseManualRefHistoryOptions {
        capacity,
        dump,
        parse,
        set_source,
    } = options;

    let first = record(&source, &dump);
    let stack = RwSignal::new(HistoryStack::new(first, capacity));

    ManualRefHistory {
        source,
        last: Signal::derive(move || stack.with(|s| s.last().clone())),
        history: Signal::derive(move || {
            stack.with(|s| s.history().cloned().collect())
        }),
        undo_stack: Signal::derive(move || {
            stack.with(|s| s.undo_stack().iter().cloned().collect())
        }),
        redo_stack: Signal::derive(move || {
            stack.with(|s| s.redo_stack().iter().cloned().collect())
        }),
        can_undo: Signal::derive(move || stack.with(HistoryStack::can_undo)),
        can_redo: Signal::derive(move || stack.with(HistoryStack::can_redo)),
        stack,
        dump,
        parse,
        set_source,
    }
}

fn record<T, S>(
    source: &RwSignal<T>,
    dump: &DumpFn<T, S>,
) -> UseRefHistoryRecord<S>
where
    T: Send + Sync + 'static,
{
    UseRefHistoryRecord {
        snapshot: source.with_untracked(|value| dump(value)),
        timestamp: timestamp(),
    }
}

/// Return type of [`use_manual_ref_history`].
pub struct ManualRefHistory<T, S = T>
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
    stack: RwSignal<HistoryStack<S>>,
    dump: DumpFn<T, S>,
    parse: ParseFn<T, S>,
    set_source: SetSourceFn<T>,
}

impl<T, S> ManualRefHistory<T, S>
where
    T: Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    /// Records the current value of the source. Anything that could have been
    /// redone is discarded.
    pub fn commit(&self) {
        let record = record(&self.source, &self.dump);
        self.stack.update(|stack| stack.commit(record));
        trace!(
            undo = self.stack.with_untracked(|s| s.undo_stack().len()),
            "committed history record"
        );
    }

    /// Commits unless `should_commit` rejects the new snapshot.
    pub(crate) fn commit_filtered(
        &self,
        should_commit: Option<&ShouldCommitFn<S>>,
    ) {
        let record = record(&self.source, &self.dump);
        if let Some(should_commit) = should_commit {
            let accepted = self.stack.with_untracked(|stack| {
                should_commit(&stack.last().snapshot, &record.snapshot)
            });
            if !accepted {
                trace!("history commit skipped");
                return;
            }
        }
        self.stack.update(|stack| stack.commit(record));
    }

    /// Restores the previous record into the source. Does nothing if there
    /// is nothing to undo.
    pub fn undo(&self) {
        if !self.stack.with_untracked(HistoryStack::can_undo) {
            return;
        }
        let restored = self
            .stack
            .try_update(|stack| stack.undo().cloned())
            .flatten();
        if let Some(record) = restored {
            trace!(timestamp = record.timestamp, "undo");
            self.apply(&record);
        }
    }

    /// Restores the next record into the source. Does nothing if there is
    /// nothing to redo.
    pub fn redo(&self) {
        if !self.stack.with_untracked(HistoryStack::can_redo) {
            return;
        }
        let restored = self
            .stack
            .try_update(|stack| stack.redo().cloned())
            .flatten();
        if let Some(record) = restored {
            trace!(timestamp = record.timestamp, "redo");
            self.apply(&record);
        }
    }

    /// Writes the last record back into the source, discarding uncommitted
    /// changes. The history itself is unchanged.
    pub fn reset(&self) {
        let value = self
            .stack
            .with_untracked(|stack| (self.parse)(&stack.last().snapshot));
        (self.set_source)(&self.source, value);
    }

    /// Forgets everything that could be undone or redone. The last record is
    /// kept.
    pub fn clear(&self) {
        self.stack.update(HistoryStack::clear);
    }

    fn apply(&self, record: &UseRefHistoryRecord<S>) {
        let value = (self.parse)(&record.snapshot);
        (self.set_source)(&self.source, value);
    }
}

impl<T, S> Clone for ManualRefHistory<T, S>
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
            stack: self.stack,
            dump: Arc::clone(&self.dump),
            parse: Arc::clone(&self.parse),
            set_source: Arc::clone(&self.set_source),
        }
    }
}

impl<T, S> fmt::Debug for ManualRefHistory<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualRefHistory").finish_non_exhaustive()
    }
}
