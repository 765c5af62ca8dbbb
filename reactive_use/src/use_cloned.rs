use crate::logging::trace;
use reactive_graph::{
    effect::ImmediateEffect,
    prelude::*,
    signal::RwSignal,
    wrappers::read::Signal,
};
use std::{fmt, sync::Arc};

type CloneFn<T> = Arc<dyn Fn(&T) -> T + Send + Sync>;
type SnapshotFn<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Creates a writable copy of `source` that follows it.
///
/// `source` can be any readable signal: a [`RwSignal`], a `ReadSignal`, a
/// `Memo`, or a [`Signal`] (including [`Signal::derive`] and
/// [`Signal::stored`]).
///
/// The copy in [`cloned`](UseClonedReturn::cloned) can be edited freely without
/// touching the source. As soon as the source changes, the copy is replaced
/// with a fresh clone of it, and [`is_modified`](UseClonedReturn::is_modified)
/// tells whether the copy has drifted from what the last sync wrote. Following
/// the source needs the `effects` feature.
///
/// ```rust
/// # let owner = reactive_graph::owner::Owner::new(); owner.set();
/// use reactive_graph::{prelude::*, signal::RwSignal};
/// use reactive_use::{use_cloned_with_options, UseClonedOptions};
///
/// let name = RwSignal::new(String::from("Ferris"));
/// let draft = use_cloned_with_options(name, UseClonedOptions::default().manual(true));
///
/// draft.cloned.update(|n| n.push_str(" the crab"));
/// assert!(draft.is_modified.get());
/// assert_eq!(name.get(), "Ferris");
///
/// draft.sync();
/// assert!(!draft.is_modified.get());
/// assert_eq!(draft.cloned.get(), "Ferris");
/// ```
pub fn use_cloned<S, T>(source: S) -> UseClonedReturn<T>
where
    S: With<Value = T>
        + WithUntracked<Value = T>
        + Clone
        + Send
        + Sync
        + 'static,
    T: Clone + Default + PartialEq + Send + Sync + 'static,
{
    use_cloned_with_options(source, UseClonedOptions::default())
}

/// Version of [`use_cloned`] that takes a [`UseClonedOptions`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn use_cloned_with_options<S, T>(
    source: S,
    options: UseClonedOptions<T>,
) -> UseClonedReturn<T>
where
    S: With<Value = T>
        + WithUntracked<Value = T>
        + Clone
        + Send
        + Sync
        + 'static,
    T: Clone + Default + PartialEq + Send + Sync + 'static,
{
    let UseClonedOptions {
        manual,
        immediate,
        clone,
    } = options;

    let cloned = RwSignal::new(T::default());
    let synced = RwSignal::new(T::default());
    let is_modified = Signal::derive(move || {
        synced.with(|synced| cloned.with(|cloned| cloned != synced))
    });

    let ret = UseClonedReturn {
        cloned,
        is_modified,
        synced,
        snapshot: Arc::new({
            let source = source.clone();
            move || source.with_untracked(|value| clone(value))
        }),
    };

    if manual || immediate {
        ret.sync();
    }

    if !manual {
        let watcher = ret.clone();
        // disposed together with the current owner
        let _watcher = ImmediateEffect::new_sync(move |prev: Option<()>| {
            // the first run only subscribes
            source.with(|_| ());
            if prev.is_some() {
                watcher.sync();
            }
        });
    }

    ret
}

/// Options for [`use_cloned_with_options`].
pub struct UseClonedOptions<T> {
    manual: bool,
    immediate: bool,
    clone: CloneFn<T>,
}

impl<T> UseClonedOptions<T> {
    /// Only sync when [`sync`](UseClonedReturn::sync) is called. The source is
    /// still cloned once when the composable is created. Defaults to `false`.
    pub fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Clone the source when the composable is created instead of waiting for
    /// its first change. Defaults to `true`.
    ///
    /// A source that never changes, such as [`Signal::stored`], is then only
    /// copied by an explicit [`sync`](UseClonedReturn::sync); until then
    /// `cloned` holds `T::default()`.
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Replaces [`Clone::clone`] as the way a copy of the source is made.
    pub fn clone_with(
        mut self,
        clone: impl Fn(&T) -> T + Send + Sync + 'static,
    ) -> Self {
        self.clone = Arc::new(clone);
        self
    }
}

impl<T: Clone + 'static> Default for UseClonedOptions<T> {
    fn default() -> Self {
        Self {
            manual: false,
            immediate: true,
            clone: Arc::new(|value: &T| value.clone()),
        }
    }
}

impl<T> fmt::Debug for UseClonedOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseClonedOptions")
            .field("manual", &self.manual)
            .field("immediate", &self.immediate)
            .finish_non_exhaustive()
    }
}

/// Return type of [`use_cloned`].
pub struct UseClonedReturn<T>
where
    T: Send + Sync + 'static,
{
    /// The copy. Writing to it never affects the source.
    pub cloned: RwSignal<T>,
    /// Whether `cloned` differs from what the last sync wrote into it.
    ///
    /// The values are compared, not the writes: setting `cloned` back to the
    /// synced value clears the flag again.
    pub is_modified: Signal<bool>,
    synced: RwSignal<T>,
    snapshot: SnapshotFn<T>,
}

impl<T> UseClonedReturn<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Replaces the copy with a fresh clone of the source, discarding any
    /// local edits.
    pub fn sync(&self) {
        let value = (self.snapshot)();
        trace!("syncing cloned value");
        self.synced.set(value.clone());
        self.cloned.set(value);
    }
}

impl<T> Clone for UseClonedReturn<T>
where
    T: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cloned: self.cloned,
            is_modified: self.is_modified,
            synced: self.synced,
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<T> fmt::Debug for UseClonedReturn<T>
where
    T: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseClonedReturn").finish_non_exhaustive()
    }
}
