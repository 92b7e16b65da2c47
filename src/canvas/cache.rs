//! Memoized rendering with least-recently-used eviction
//!
//! Keys combine the requested size and scale with a caller key. Many threads
//! may ask for the same key at once; only the first one renders, the rest wait
//! on that key's slot and get the shared result.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::geometry::Size;

use super::Image;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey<K> {
    width: u64,
    height: u64,
    scale: u64,
    key: K,
}

impl<K> CacheKey<K> {
    fn new(size: Size, scale: f64, key: K) -> Self {
        Self {
            width: size.width.to_bits(),
            height: size.height.to_bits(),
            scale: scale.to_bits(),
            key,
        }
    }
}

type Slot = Arc<Mutex<Option<Arc<dyn Image>>>>;

struct CacheEntry {
    slot: Slot,
    last_tick: u64,
}

struct CacheState<K> {
    map: HashMap<CacheKey<K>, CacheEntry>,
    current_tick: u64,
}

pub struct DrawCache<K> {
    capacity: usize,
    state: Mutex<CacheState<K>>,
}

impl<K: Clone + Eq + Hash> DrawCache<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState {
                map: HashMap::new(),
                current_tick: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock_state().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached image for `(size, scale, key)`, calling `render` on a miss.
    ///
    /// A failed render leaves the slot empty, so the next caller retries.
    pub fn get_or_render<F>(&self, size: Size, scale: f64, key: K, render: F) -> Result<Arc<dyn Image>>
    where
        F: FnOnce() -> Result<Arc<dyn Image>>,
    {
        let slot = self.touch(CacheKey::new(size, scale, key));

        // Holding the slot lock while rendering makes this the only writer
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(image) = guard.as_ref() {
            return Ok(Arc::clone(image));
        }
        log::debug!("draw cache miss at {}x{} @{}", size.width, size.height, scale);
        let image = render()?;
        *guard = Some(Arc::clone(&image));
        Ok(image)
    }

    pub fn clear(&self) {
        self.lock_state().map.clear();
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CacheState<K>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Find or create the slot for `key` and mark it most recently used
    fn touch(&self, key: CacheKey<K>) -> Slot {
        let mut state = self.lock_state();
        state.current_tick = state.current_tick.wrapping_add(1);
        let tick = state.current_tick;
        let slot = {
            let entry = state.map.entry(key.clone()).or_insert_with(|| CacheEntry {
                slot: Arc::new(Mutex::new(None)),
                last_tick: tick,
            });
            entry.last_tick = tick;
            Arc::clone(&entry.slot)
        };
        while state.map.len() > self.capacity {
            let oldest = state
                .map
                .iter()
                .filter(|(k, _)| **k != key)
                .min_by_key(|(_, e)| e.last_tick)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(old) => {
                    state.map.remove(&old);
                }
                None => break,
            }
        }
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::platform::PixelImage;
    use crate::style::Color;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn image() -> Arc<dyn Image> {
        Arc::new(PixelImage {
            colors: vec![Color::WHITE; 4],
            width: 2,
            scale: 1.0,
        })
    }

    #[test]
    fn test_hit_skips_render() {
        let cache = DrawCache::new(4);
        let renders = AtomicUsize::new(0);
        for _ in 0..3 {
            cache
                .get_or_render(Size::new(2.0, 2.0), 1.0, "icon", || {
                    renders.fetch_add(1, Ordering::SeqCst);
                    Ok(image())
                })
                .unwrap();
        }
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_size_and_scale_are_part_of_key() {
        let cache = DrawCache::new(4);
        let renders = AtomicUsize::new(0);
        let render = || {
            renders.fetch_add(1, Ordering::SeqCst);
            Ok(image())
        };
        cache.get_or_render(Size::new(2.0, 2.0), 1.0, "icon", render).unwrap();
        cache.get_or_render(Size::new(2.0, 2.0), 2.0, "icon", render).unwrap();
        cache.get_or_render(Size::new(4.0, 2.0), 1.0, "icon", render).unwrap();
        assert_eq!(renders.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = DrawCache::new(2);
        let size = Size::new(1.0, 1.0);
        cache.get_or_render(size, 1.0, 1, || Ok(image())).unwrap();
        cache.get_or_render(size, 1.0, 2, || Ok(image())).unwrap();
        // Touch 1 so that 2 becomes the oldest
        cache.get_or_render(size, 1.0, 1, || Ok(image())).unwrap();
        cache.get_or_render(size, 1.0, 3, || Ok(image())).unwrap();
        assert_eq!(cache.len(), 2);

        let rerendered = AtomicUsize::new(0);
        cache
            .get_or_render(size, 1.0, 1, || {
                rerendered.fetch_add(1, Ordering::SeqCst);
                Ok(image())
            })
            .unwrap();
        assert_eq!(rerendered.load(Ordering::SeqCst), 0);
        cache
            .get_or_render(size, 1.0, 2, || {
                rerendered.fetch_add(1, Ordering::SeqCst);
                Ok(image())
            })
            .unwrap();
        assert_eq!(rerendered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_render_is_retried() {
        let cache: DrawCache<&str> = DrawCache::new(2);
        let size = Size::new(1.0, 1.0);
        let failed = cache.get_or_render(size, 1.0, "x", || {
            Err(crate::error::GraphicsError::unsupported("no backend"))
        });
        assert!(failed.is_err());
        assert!(cache.get_or_render(size, 1.0, "x", || Ok(image())).is_ok());
    }

    #[test]
    fn test_concurrent_callers_render_once() {
        let cache = Arc::new(DrawCache::new(8));
        let renders = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let renders = Arc::clone(&renders);
                thread::spawn(move || {
                    cache
                        .get_or_render(Size::new(3.0, 3.0), 1.0, "shared", || {
                            renders.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(5));
                            Ok(image())
                        })
                        .map(|_| ())
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }
}
