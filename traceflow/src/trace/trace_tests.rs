//! Thread-contract tests for the trace subsystem.

#[cfg(test)]
mod tests {
    use crate::trace::{TraceBlob, TraceContextStore, TraceKey, TraceKeyRegistry};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    fn shared_store(keys: &[&str]) -> Arc<TraceContextStore> {
        let registry = Arc::new(TraceKeyRegistry::with_keys(keys.iter().copied()).unwrap());
        Arc::new(TraceContextStore::new(registry))
    }

    #[test]
    fn test_fresh_thread_sees_all_keys_absent() {
        let store = shared_store(&["a", "b"]);
        store.set_value("a", TraceBlob::text("main-only")).unwrap();

        let worker = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let snapshot = store.get_current();
                (snapshot.len(), snapshot.present_count())
            })
        };

        let (keys, present) = worker.join().unwrap();
        assert_eq!(keys, 2);
        assert_eq!(present, 0);
    }

    #[test]
    fn test_writes_are_invisible_across_threads() {
        let store = shared_store(&["k"]);
        let key = TraceKey::new("k");

        store.set_value("k", TraceBlob::text("from-main")).unwrap();

        let worker = {
            let store = Arc::clone(&store);
            let key = key.clone();
            thread::spawn(move || {
                assert!(store.get_current().is_absent(&key));
                store.set_value("k", TraceBlob::text("from-worker")).unwrap();
            })
        };
        worker.join().unwrap();

        // The worker's write did not leak back either.
        let blob = store.get_value(&key).unwrap();
        assert_eq!(blob.as_text(), Some("from-main"));
    }

    #[test]
    fn test_explicit_carry_moves_data_between_threads() {
        let store = shared_store(&["session-id", "geometry"]);

        store.set_value("session-id", TraceBlob::text("abc")).unwrap();
        let snapshot = store.get_current();

        let worker = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.set_current(snapshot.present()).unwrap();
                let restored = store.get_current();
                (
                    restored
                        .get(&TraceKey::new("session-id"))
                        .and_then(TraceBlob::as_text)
                        .map(String::from),
                    restored.is_absent(&TraceKey::new("geometry")),
                )
            })
        };

        let (carried, geometry_absent) = worker.join().unwrap();
        assert_eq!(carried.as_deref(), Some("abc"));
        assert!(geometry_absent);
    }

    #[test]
    fn test_carry_preserves_object_identity() {
        #[derive(Debug)]
        struct PersistentHandle;

        let store = shared_store(&["handle"]);
        let original: Arc<PersistentHandle> = Arc::new(PersistentHandle);
        store
            .set_value("handle", TraceBlob::Object(original.clone()))
            .unwrap();

        let snapshot = store.get_current();
        let worker = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.set_current(snapshot.present()).unwrap();
                store
                    .get_value(&TraceKey::new("handle"))
                    .and_then(|blob| blob.downcast_object::<PersistentHandle>())
                    .unwrap()
            })
        };

        let carried = worker.join().unwrap();
        assert!(Arc::ptr_eq(&original, &carried));
    }

    #[test]
    fn test_many_threads_have_independent_rows() {
        let store = shared_store(&["slot"]);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .set_value("slot", TraceBlob::text(format!("thread-{i}")))
                        .unwrap();
                    store
                        .get_value(&TraceKey::new("slot"))
                        .and_then(|b| b.as_text().map(String::from))
                        .unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("thread-{i}"));
        }
    }
}
