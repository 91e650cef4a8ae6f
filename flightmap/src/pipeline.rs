//! One render cycle: fetch (or reuse) the current states and turn them into flights.
//!

use serde::Serialize;
use tracing::{debug, info};

use flightmap_formats::{FlightTable, Transformer};
use flightmap_sources::{Clock, FeedFetcher, Fetchable, Origin, Stats, SystemClock};

/// Result of one cycle, discarded once displayed.
///
#[derive(Clone, Debug, Serialize)]
pub struct View {
    /// Feed timestamp, if any
    pub time: Option<i64>,
    pub origin: Origin,
    /// Message for the user when the feed failed
    pub error: Option<String>,
    pub count: usize,
    pub flights: FlightTable,
}

/// Fetcher and transformer, composed.
///
#[derive(Debug)]
pub struct Pipeline<F: Fetchable, C: Clock = SystemClock> {
    fetcher: FeedFetcher<F, C>,
    transformer: Transformer,
}

impl<F: Fetchable, C: Clock> Pipeline<F, C> {
    pub fn new(fetcher: FeedFetcher<F, C>, transformer: Transformer) -> Self {
        Pipeline {
            fetcher,
            transformer,
        }
    }

    /// Run a cycle, `force` bypassing the cache.  Never fails, see `View::error`.
    ///
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, force: bool) -> View {
        let snap = self.fetcher.refresh(force);
        let flights = self.transformer.transform(&snap.states);

        info!(
            "{} flights out of {} states ({})",
            flights.len(),
            snap.states.len(),
            snap.origin
        );
        debug!("stats: {}", self.fetcher.stats());

        View {
            time: snap.states.time,
            origin: snap.origin,
            error: snap.error,
            count: flights.len(),
            flights,
        }
    }

    pub fn stats(&self) -> &Stats {
        self.fetcher.stats()
    }

    pub fn fetcher(&self) -> &FeedFetcher<F, C> {
        &self.fetcher
    }
}
