//! OpenSky (.org) specific code
//!
//! We only use the anonymous `/states/all` endpoint: one GET returns the whole world as a
//! `StateList`.  No credentials are sent.
//!
//! The request is bounded by a timeout, there is no retry here.  Caching is the job of the
//! `FeedFetcher`.
//!

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, trace};

use flightmap_formats::StateList;

use crate::{http_get, FetchError, Fetchable};

/// Public endpoint for all current state vectors
pub const DEF_URL: &str = "https://opensky-network.org/api/states/all";
/// How long we wait for the whole round-trip
pub const DEF_TIMEOUT: Duration = Duration::from_secs(10);

/// This is the Opensky client/source struct.
///
#[derive(Clone, Debug)]
pub struct Opensky {
    /// Full URL of the states endpoint
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
    /// reqwest blocking client
    client: Client,
}

impl Opensky {
    /// Create a source for `url`, every request being bounded by `timeout`.
    ///
    #[tracing::instrument]
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        trace!("opensky::new");

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(FetchError::Http)?;

        Ok(Opensky {
            url: url.to_owned(),
            timeout,
            client,
        })
    }

    /// Separate timeouts from the other transport errors.
    ///
    fn http_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(e)
        }
    }
}

impl Fetchable for Opensky {
    fn name(&self) -> String {
        "opensky".to_string()
    }

    /// Single call API
    ///
    #[tracing::instrument(skip(self))]
    fn fetch(&self) -> Result<StateList, FetchError> {
        trace!("Fetching data from {}…", self.url);

        let resp = http_get!(self.client, &self.url).map_err(|e| self.http_error(e))?;
        debug!("{:?}", &resp);

        // Check status
        //
        let code = resp.status();
        if !code.is_success() {
            return Err(FetchError::Status(code, self.url.clone()));
        }

        trace!("Fetching raw data");
        let body = resp.text().map_err(|e| self.http_error(e))?;
        debug!("{} bytes", body.len());

        Ok(StateList::from_json(&body)?)
    }
}
