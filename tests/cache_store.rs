use redirector::infrastructure::cache::{CacheStore, ReadTransaction};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_readers_hold_transactions_concurrently() {
    let store = Arc::new(CacheStore::open());
    store.update(|tx| tx.set("abc", "https://example.com/a"));

    const READERS: usize = 4;
    let barrier = Arc::new(Barrier::new(READERS));

    let handles: Vec<_> = (0..READERS)
        .map(|_| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                store.view(|tx| {
                    // Every reader is inside its transaction before any leaves.
                    barrier.wait();
                    tx.get("abc")
                })
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap().as_deref(),
            Some("https://example.com/a")
        );
    }
}

#[test]
fn test_writers_are_exclusive() {
    let store = Arc::new(CacheStore::open());
    let writing = Arc::new(AtomicBool::new(false));
    let overlaps = Arc::new(AtomicUsize::new(0));

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            let writing = writing.clone();
            let overlaps = overlaps.clone();
            thread::spawn(move || {
                for j in 0..10 {
                    store.update(|tx| {
                        if writing.swap(true, Ordering::SeqCst) {
                            overlaps.fetch_add(1, Ordering::SeqCst);
                        }
                        tx.set(format!("key{}", i), format!("https://example.com/{}", j));
                        thread::sleep(Duration::from_millis(1));
                        writing.store(false, Ordering::SeqCst);
                    });
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            let writing = writing.clone();
            let overlaps = overlaps.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    store.view(|_| {
                        if writing.load(Ordering::SeqCst) {
                            overlaps.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(store.len(), 4);
    assert_eq!(
        store.view(|tx| tx.get("key0")).as_deref(),
        Some("https://example.com/9")
    );
}

fn panicking_reader(_tx: &ReadTransaction<'_>) {
    panic!("reader failed");
}

#[test]
fn test_panic_inside_read_releases_lock() {
    let store = CacheStore::open();

    let result = catch_unwind(AssertUnwindSafe(|| store.view(panicking_reader)));
    assert!(result.is_err());

    store.update(|tx| tx.set("abc", "https://example.com/a"));
    assert_eq!(
        store.view(|tx| tx.get("abc")).as_deref(),
        Some("https://example.com/a")
    );
}

#[test]
fn test_writer_waits_for_open_reader() {
    let store = Arc::new(CacheStore::open());
    let reader_done = Arc::new(AtomicBool::new(false));

    let read = store.begin_read();

    let writer = {
        let store = store.clone();
        let reader_done = reader_done.clone();
        thread::spawn(move || {
            store.update(|tx| tx.set("abc", "https://example.com/a"));
            reader_done.load(Ordering::SeqCst)
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(read.get("abc").is_none());
    reader_done.store(true, Ordering::SeqCst);
    read.end();

    assert!(writer.join().unwrap());
    assert_eq!(store.len(), 1);
}
