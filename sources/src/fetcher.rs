//! The feed fetcher: a `Fetchable` site behind a `StateCache`.
//!
//! Calling `fetch_current_states()` within the TTL returns the very same `StateList` without
//! any network traffic.  After expiry the site is called again.
//!
//! Any failure is logged, turned into a message for the user and masked by an empty list.  It
//! is never propagated, never retried and never cached: the next call (i.e. the next refresh)
//! goes back to the network.
//!

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, trace};

use flightmap_formats::StateList;

use crate::{Clock, Fetchable, StateCache, Stats, SystemClock};

/// Where a snapshot comes from
///
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Origin {
    Cache,
    Network,
    Failed,
}

/// Result of one fetch, always usable.
///
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Shared with the cache
    pub states: Arc<StateList>,
    pub origin: Origin,
    /// Message to show the user when the fetch failed
    pub error: Option<String>,
}

impl Snapshot {
    fn failed(msg: String) -> Self {
        Snapshot {
            states: Arc::new(StateList::default()),
            origin: Origin::Failed,
            error: Some(msg),
        }
    }
}

/// Fetch the current states from a site, with caching.
///
#[derive(Debug)]
pub struct FeedFetcher<F: Fetchable, C: Clock = SystemClock> {
    site: F,
    cache: StateCache<C>,
    stats: Stats,
}

impl<F: Fetchable> FeedFetcher<F, SystemClock> {
    pub fn new(site: F, ttl: Duration) -> Self {
        Self::with_clock(site, ttl, SystemClock)
    }
}

impl<F: Fetchable, C: Clock> FeedFetcher<F, C> {
    pub fn with_clock(site: F, ttl: Duration, clock: C) -> Self {
        FeedFetcher {
            site,
            cache: StateCache::with_clock(ttl, clock),
            stats: Stats::default(),
        }
    }

    /// Return the cached states or fetch fresh ones.
    ///
    #[tracing::instrument(skip(self))]
    pub fn fetch_current_states(&mut self) -> Snapshot {
        if let Some(states) = self.cache.get() {
            self.stats.hits += 1;
            trace!("{} states from cache", states.len());
            return Snapshot {
                states,
                origin: Origin::Cache,
                error: None,
            };
        }
        self.stats.miss += 1;
        self.stats.fetches += 1;

        match self.site.fetch() {
            Ok(states) => {
                if states.is_empty() {
                    self.stats.empty += 1;
                }
                self.stats.pkts += states.len() as u64;
                info!("{}: {} states", self.site.name(), states.len());

                let states = self.cache.put(states);
                Snapshot {
                    states,
                    origin: Origin::Network,
                    error: None,
                }
            }
            Err(e) => {
                self.stats.err += 1;
                error!("{}: {}", self.site.name(), e);
                Snapshot::failed(format!("API Error: {e}"))
            }
        }
    }

    /// The refresh action.  Without `force` this only re-checks the TTL, with `force` the
    /// cached entry is dropped first.
    ///
    #[tracing::instrument(skip(self))]
    pub fn refresh(&mut self, force: bool) -> Snapshot {
        if force {
            self.cache.invalidate();
        }
        let snap = self.fetch_current_states();
        debug!("stats: {}", self.stats);
        snap
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn site(&self) -> &F {
        &self.site
    }

    pub fn cache(&self) -> &StateCache<C> {
        &self.cache
    }
}
