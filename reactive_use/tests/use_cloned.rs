use any_spawner::Executor;
use reactive_graph::{
    computed::Memo,
    owner::Owner,
    prelude::*,
    signal::{signal, RwSignal},
    wrappers::read::Signal,
};
use reactive_use::{use_cloned, use_cloned_with_options, UseClonedOptions};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};
use tokio::task;

#[derive(Debug, Clone, Default, PartialEq)]
struct Data {
    test: String,
    tagged: bool,
}

fn data(test: &str) -> Data {
    Data {
        test: test.to_string(),
        tagged: false,
    }
}

#[tokio::test]
async fn works_with_plain_values() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let value = data("test");
            let ret = use_cloned(Signal::stored(value.clone()));

            assert_eq!(ret.cloned.get(), value);

            ret.cloned.set(data("failed"));
            ret.sync();

            assert_eq!(ret.cloned.get(), value);
        })
        .await
}

#[tokio::test]
async fn follows_signal_source() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let ret = use_cloned(source);

            source.update(|d| d.test = "success".to_string());
            Executor::tick().await;

            assert_eq!(ret.cloned.get(), source.get());
        })
        .await
}

#[tokio::test]
async fn follows_derived_source() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let ret = use_cloned(Signal::derive(move || source.get()));

            source.update(|d| d.test = "success".to_string());
            Executor::tick().await;

            assert_eq!(ret.cloned.get().test, "success");
        })
        .await
}

#[tokio::test]
async fn manual_sync_ignores_changes() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let ret = use_cloned_with_options(
                source,
                UseClonedOptions::default().manual(true),
            );

            source.update(|d| d.test = "success".to_string());
            Executor::tick().await;
            assert_ne!(ret.cloned.get(), source.get());

            ret.sync();
            assert_eq!(ret.cloned.get(), source.get());
        })
        .await
}

#[tokio::test]
async fn custom_clone_function() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let ret = use_cloned_with_options(
                source,
                UseClonedOptions::default().clone_with(|d: &Data| Data {
                    tagged: true,
                    ..d.clone()
                }),
            );

            source.update(|d| d.test = "partial".to_string());
            Executor::tick().await;

            let cloned = ret.cloned.get();
            assert_eq!(cloned.test, "partial");
            assert!(cloned.tagged);
            assert!(!ret.is_modified.get());
        })
        .await
}

#[tokio::test]
async fn not_immediate_waits_for_first_change() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let ret = use_cloned_with_options(
                source,
                UseClonedOptions::default().immediate(false),
            );

            Executor::tick().await;
            assert_eq!(ret.cloned.get(), Data::default());

            source.set(data("valid"));
            Executor::tick().await;
            assert_eq!(ret.cloned.get(), data("valid"));
        })
        .await
}

#[tokio::test]
async fn tracks_modification() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let ret = use_cloned(source);

            assert!(!ret.is_modified.get());

            ret.cloned.update(|d| d.test = "edited".to_string());
            assert!(ret.is_modified.get());

            ret.sync();
            assert!(!ret.is_modified.get());

            // editing back to the synced value is not a modification
            ret.cloned.update(|d| d.test = "edited".to_string());
            ret.cloned.update(|d| d.test = "test".to_string());
            assert!(!ret.is_modified.get());
        })
        .await
}

#[tokio::test]
async fn source_change_discards_local_edits() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let ret = use_cloned(source);

            ret.cloned.update(|d| d.test = "local".to_string());
            assert!(ret.is_modified.get());

            source.set(data("remote"));
            Executor::tick().await;

            assert_eq!(ret.cloned.get(), data("remote"));
            assert!(!ret.is_modified.get());
            assert_eq!(source.get(), data("remote"));
        })
        .await
}

#[tokio::test]
async fn follows_read_signal_and_memo() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let (read, write) = signal(data("test"));
            let from_read = use_cloned(read);
            let memo = Memo::new(move |_| read.get());
            let from_memo = use_cloned(memo);

            write.set(data("success"));
            Executor::tick().await;

            assert_eq!(from_read.cloned.get(), data("success"));
            assert_eq!(from_memo.cloned.get(), data("success"));
        })
        .await
}

#[tokio::test]
async fn stored_source_without_immediate_waits_for_sync() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let ret = use_cloned_with_options(
                Signal::stored(data("test")),
                UseClonedOptions::default().immediate(false),
            );

            Executor::tick().await;
            assert_eq!(ret.cloned.get(), Data::default());

            ret.sync();
            assert_eq!(ret.cloned.get(), data("test"));
            assert!(!ret.is_modified.get());
        })
        .await
}

#[tokio::test]
async fn stops_following_after_cleanup() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = RwSignal::new(data("test"));

            let child = owner.child();
            child.with(|| {
                use_cloned_with_options(
                    source,
                    UseClonedOptions::default().clone_with({
                        let calls = Arc::clone(&calls);
                        move |d: &Data| {
                            calls.fetch_add(1, Ordering::Relaxed);
                            d.clone()
                        }
                    }),
                )
            });
            assert_eq!(calls.load(Ordering::Relaxed), 1);

            source.set(data("followed"));
            Executor::tick().await;
            assert_eq!(calls.load(Ordering::Relaxed), 2);

            child.cleanup();
            source.set(data("ignored"));
            Executor::tick().await;
            assert_eq!(calls.load(Ordering::Relaxed), 2);
        })
        .await
}

#[tokio::test]
async fn cleanup_on_another_thread() {
    _ = Executor::init_tokio();
    let owner = Owner::new();
    owner.set();

    task::LocalSet::new()
        .run_until(async {
            let source = RwSignal::new(data("test"));
            let child = owner.child();
            child.with(|| use_cloned(source));

            let cleanup = thread::spawn(move || child.cleanup());
            assert!(cleanup.join().is_ok());

            source.set(data("after"));
            Executor::tick().await;
            assert_eq!(source.get(), data("after"));
        })
        .await
}
