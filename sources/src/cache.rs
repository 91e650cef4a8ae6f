//! Single slot cache for the last `StateList`.
//!
//! The slot is keyed by nothing: there is only one feed and one answer worth keeping.  An entry
//! is valid while its age is strictly below the TTL.
//!
//! Time comes from a monotonic `Clock` so that wall clock steps (NTP, manual changes) never
//! make an entry look younger than it is.  Tests use `ManualClock` to move it around.
//!

use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::trace;

use flightmap_formats::StateList;

/// Keep answers for that long
pub const DEF_TTL: Duration = Duration::from_secs(15);

/// Source of the current time, never going backwards.
///
pub trait Clock: Debug + Send {
    fn now(&self) -> Instant;
}

/// Monotonic system clock
///
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock only moving when told to, as a fixed base plus an offset.  Clones share the offset.
///
#[derive(Clone, Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, d: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset = offset.saturating_add(d);
    }

    /// Time elapsed since creation.
    ///
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }
}

#[derive(Debug)]
struct Entry {
    stamp: Instant,
    value: Arc<StateList>,
}

/// The cache itself.
///
#[derive(Debug)]
pub struct StateCache<C: Clock = SystemClock> {
    ttl: Duration,
    clock: C,
    slot: Option<Entry>,
}

impl StateCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> StateCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        StateCache {
            ttl,
            clock,
            slot: None,
        }
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Age of the current entry, if any.
    ///
    pub fn age(&self) -> Option<Duration> {
        let entry = self.slot.as_ref()?;
        Some(self.clock.now().saturating_duration_since(entry.stamp))
    }

    /// Return the cached list if it is still fresh.
    ///
    pub fn get(&self) -> Option<Arc<StateList>> {
        let age = self.age()?;
        if age < self.ttl {
            trace!("cache hit, {:?} old", age);
            self.slot.as_ref().map(|e| Arc::clone(&e.value))
        } else {
            trace!("cache expired, {:?} old", age);
            None
        }
    }

    /// Replace the entry, stamped with the current time.
    ///
    pub fn put(&mut self, value: StateList) -> Arc<StateList> {
        let value = Arc::new(value);
        self.slot = Some(Entry {
            stamp: self.clock.now(),
            value: Arc::clone(&value),
        });
        value
    }

    /// When was the current entry stored?
    ///
    pub fn stamp(&self) -> Option<Instant> {
        self.slot.as_ref().map(|e| e.stamp)
    }

    pub fn invalidate(&mut self) {
        trace!("cache invalidated");
        self.slot = None;
    }
}
