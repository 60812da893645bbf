use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use crate::config::ScrollConfig;

pub const DEFAULT_THRESHOLD: f64 = 500.0;

/// Viewport position at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
            document_height,
        }
    }

    pub fn is_near_bottom(&self, threshold: f64) -> bool {
        self.scroll_y + self.viewport_height >= self.document_height - threshold
    }
}

type Listener = Box<dyn FnMut(ScrollMetrics) + Send>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    map: BTreeMap<u64, Listener>,
}

fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Source of scroll events that listeners attach to.
///
/// Listeners run while the registry is locked; they must not subscribe or
/// emit from inside the callback.
#[derive(Clone, Default)]
pub struct ScrollSignal {
    listeners: Arc<Mutex<Listeners>>,
}

impl ScrollSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(ScrollMetrics) + Send + 'static,
    {
        let mut listeners = lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.map.insert(id, Box::new(listener));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn emit(&self, metrics: ScrollMetrics) {
        for listener in lock(&self.listeners).map.values_mut() {
            listener(metrics);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).map.len()
    }
}

/// Keeps a listener registered; dropping it unregisters the listener.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).map.remove(&self.id);
        }
    }
}

/// Decides when a scroll event should load the next page.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    threshold: f64,
    throttle: Option<Duration>,
    last_fired: Option<Instant>,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ScrollTrigger {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            throttle: None,
            last_fired: None,
        }
    }

    pub fn from_config(config: &ScrollConfig) -> Self {
        Self::new(config.threshold).with_throttle(config.throttle())
    }

    pub fn with_throttle(mut self, throttle: Option<Duration>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn should_fire(&mut self, metrics: ScrollMetrics, now: Instant) -> bool {
        if !metrics.is_near_bottom(self.threshold) {
            return false;
        }

        if let (Some(min), Some(last)) = (self.throttle, self.last_fired) {
            if now.saturating_duration_since(last) < min {
                return false;
            }
        }

        self.last_fired = Some(now);
        true
    }

    /// Listen on `signal` and call `callback` on every qualifying scroll
    /// event until the returned subscription is dropped.
    pub fn mount<F>(mut self, signal: &ScrollSignal, mut callback: F) -> Subscription
    where
        F: FnMut() + Send + 'static,
    {
        signal.subscribe(move |metrics| {
            if self.should_fire(metrics, Instant::now()) {
                callback();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_near_bottom() {
        // 3000px page, 800px viewport: bottom edge within 500px from 1700 on.
        assert!(!ScrollMetrics::new(1699.0, 800.0, 3000.0).is_near_bottom(500.0));
        assert!(ScrollMetrics::new(1700.0, 800.0, 3000.0).is_near_bottom(500.0));
        assert!(ScrollMetrics::new(0.0, 800.0, 600.0).is_near_bottom(500.0));
    }

    #[test]
    fn test_unthrottled_fires_every_time() {
        let mut trigger = ScrollTrigger::default();
        let now = Instant::now();
        let metrics = ScrollMetrics::new(2000.0, 800.0, 3000.0);
        assert!(trigger.should_fire(metrics, now));
        assert!(trigger.should_fire(metrics, now));
        assert!(!trigger.should_fire(ScrollMetrics::new(0.0, 800.0, 3000.0), now));
    }

    #[test]
    fn test_throttled() {
        let mut trigger =
            ScrollTrigger::new(500.0).with_throttle(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let metrics = ScrollMetrics::new(2000.0, 800.0, 3000.0);
        assert!(trigger.should_fire(metrics, start));
        assert!(!trigger.should_fire(metrics, start + Duration::from_millis(100)));
        assert!(trigger.should_fire(metrics, start + Duration::from_millis(200)));
    }

    #[test]
    fn test_mount_and_teardown() {
        let signal = ScrollSignal::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        let subscription = ScrollTrigger::default().mount(&signal, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(signal.listener_count(), 1);

        signal.emit(ScrollMetrics::new(0.0, 800.0, 3000.0));
        signal.emit(ScrollMetrics::new(2500.0, 800.0, 3000.0));
        signal.emit(ScrollMetrics::new(2600.0, 800.0, 3000.0));
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        drop(subscription);
        assert_eq!(signal.listener_count(), 0);
        signal.emit(ScrollMetrics::new(2600.0, 800.0, 3000.0));
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
