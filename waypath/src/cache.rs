use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use log::debug;
use serde::Serialize;

use crate::error::{PathError, Result};
use crate::grid::Point;
use crate::solver::SubpathResult;

/// Directed `(start, end)` pair. `(a, b)` and `(b, a)` are separate entries since the stored
/// route runs from start to end.
pub type SubpathKey = (Point, Point);

type Slot = Arc<Mutex<Option<Arc<SubpathResult>>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Memo table for sub-path results, shared by every task of one routing run.
///
/// Each key owns a slot with its own lock. The table lock is only held to find or create the
/// slot; the computation itself runs under the slot lock, so different keys are computed in
/// parallel while concurrent requests for the same key wait for the first one and then read
/// its result. A key is computed at most once unless the computation fails, in which case
/// nothing is stored and the next caller tries again.
#[derive(Debug, Default)]
pub struct SubpathCache {
    slots: Mutex<HashMap<SubpathKey, Slot>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl SubpathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, key: SubpathKey, compute: F) -> Result<Arc<SubpathResult>>
    where
        F: FnOnce() -> Result<SubpathResult>,
    {
        let slot = {
            let mut slots = self.slots.lock().map_err(|_| PathError::CachePoisoned)?;
            Arc::clone(slots.entry(key).or_default())
        };

        let mut entry = slot.lock().map_err(|_| PathError::CachePoisoned)?;
        if let Some(result) = entry.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("cache hit for {} -> {}", key.0, key.1);
            return Ok(Arc::clone(result));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = Arc::new(compute()?);
        *entry = Some(Arc::clone(&result));

        Ok(result)
    }

    /// Looks up a finished result without computing anything
    pub fn get(&self, key: &SubpathKey) -> Result<Option<Arc<SubpathResult>>> {
        let slot = {
            let slots = self.slots.lock().map_err(|_| PathError::CachePoisoned)?;
            match slots.get(key) {
                Some(slot) => Arc::clone(slot),
                None => return Ok(None),
            }
        };
        let entry = slot.lock().map_err(|_| PathError::CachePoisoned)?;
        Ok(entry.clone())
    }

    /// Number of keys with a stored result
    pub fn len(&self) -> Result<usize> {
        // slot locks can be held for a whole solve, so never wait on them under the table lock
        let slots: Vec<Slot> = {
            let slots = self.slots.lock().map_err(|_| PathError::CachePoisoned)?;
            slots.values().cloned().collect()
        };

        let mut len = 0;
        for slot in &slots {
            if slot.lock().map_err(|_| PathError::CachePoisoned)?.is_some() {
                len += 1;
            }
        }
        Ok(len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use std::sync::Barrier;
    use std::thread;

    fn result(cost: f64) -> SubpathResult {
        SubpathResult {
            cost,
            route: vec![Point::new(0, 0), Point::new(1, 1)],
        }
    }

    fn key(a: (usize, usize), b: (usize, usize)) -> SubpathKey {
        (Point::new(a.0, a.1), Point::new(b.0, b.1))
    }

    #[test]
    fn test_second_lookup_is_a_hit() {
        let cache = SubpathCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(result(2.0))
        };

        let first = cache.get_or_compute(key((0, 0), (1, 1)), compute).unwrap();
        let second = cache.get_or_compute(key((0, 0), (1, 1)), compute).unwrap();

        assert_eq!(first.cost, second.cost);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_direction_is_part_of_the_key() {
        let cache = SubpathCache::new();
        cache
            .get_or_compute(key((0, 0), (1, 1)), || Ok(result(1.0)))
            .unwrap();
        cache
            .get_or_compute(key((1, 1), (0, 0)), || Ok(result(5.0)))
            .unwrap();

        assert_eq!(cache.stats().misses, 2);
        assert_eq!(
            cache.get(&key((1, 1), (0, 0))).unwrap().map(|r| r.cost),
            Some(5.0)
        );
        assert!(cache.get(&key((2, 2), (0, 0))).unwrap().is_none());
    }

    #[test]
    fn test_failures_are_not_stored() {
        let cache = SubpathCache::new();
        let k = key((0, 0), (4, 4));

        let err = cache.get_or_compute(k, || {
            Err(PathError::Unreachable {
                start: k.0,
                end: k.1,
            })
        });
        assert!(matches!(err, Err(PathError::Unreachable { .. })));
        assert!(cache.is_empty().unwrap());

        let ok = cache.get_or_compute(k, || Ok(result(3.0))).unwrap();
        assert_eq!(ok.cost, 3.0);
    }

    #[test]
    fn test_concurrent_requests_compute_once() {
        let cache = SubpathCache::new();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    let r = cache
                        .get_or_compute(key((3, 3), (7, 7)), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Ok(result(4.0))
                        })
                        .unwrap();
                    assert_eq!(r.cost, 4.0);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 7, misses: 1 });
    }

    #[test]
    fn test_distinct_keys_do_not_wait_for_each_other() {
        let cache = SubpathCache::new();
        let barrier = Barrier::new(2);

        // both computations must be in flight at the same time for the barrier to release,
        // which would deadlock if one key's computation blocked the other
        thread::scope(|s| {
            for i in 0..2 {
                let cache = &cache;
                let barrier = &barrier;
                s.spawn(move || {
                    cache
                        .get_or_compute(key((i, 0), (i, 5)), || {
                            barrier.wait();
                            Ok(result(i as f64))
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(cache.len().unwrap(), 2);
    }

    #[test]
    fn test_len_does_not_block_other_keys() {
        let cache = SubpathCache::new();
        let started = Barrier::new(2);
        let release = Barrier::new(2);

        thread::scope(|s| {
            // holds the slot lock of the first key until released
            s.spawn(|| {
                cache
                    .get_or_compute(key((0, 0), (0, 9)), || {
                        started.wait();
                        release.wait();
                        Ok(result(9.0))
                    })
                    .unwrap();
            });
            started.wait();

            // waits on the busy slot
            let counting = s.spawn(|| cache.len().unwrap());
            thread::sleep(std::time::Duration::from_millis(50));

            let other = cache
                .get_or_compute(key((1, 0), (1, 9)), || Ok(result(1.0)))
                .unwrap();
            assert_eq!(other.cost, 1.0);

            release.wait();
            assert!(counting.join().unwrap() >= 1);
        });

        assert_eq!(cache.len().unwrap(), 2);
    }
}
