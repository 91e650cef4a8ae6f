//! Configuration of the `flightmap` tool.
//!
//! Every block and every field is optional, missing ones take the built-in defaults below.
//!
//! ```hcl
//! version = 1
//!
//! feed {
//!   url     = "https://opensky-network.org/api/states/all"
//!   timeout = 10
//!   ttl     = 15
//! }
//!
//! transform {
//!   ground    = "drop"
//!   clockwise = true
//!   offset    = 0
//! }
//!
//! map {
//!   latitude = 32.0
//!   longitude = 34.8
//! }
//!
//! server {
//!   listen = "127.0.0.1:8501"
//! }
//! ```
//!

use std::time::Duration;

use eyre::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use tracing::trace;

use flightmap_common::Versioned;
use flightmap_formats::{
    AngleTransform, GroundPolicy, IconData, Transformer, PLANE_ICON_ANCHOR_Y, PLANE_ICON_HEIGHT,
    PLANE_ICON_URL, PLANE_ICON_WIDTH,
};
use flightmap_sources::{FeedFetcher, Opensky, DEF_TIMEOUT, DEF_TTL, DEF_URL};

use crate::{
    Deck, IconLayer, Pipeline, ViewState, DEF_COLOR, DEF_LATITUDE, DEF_LONGITUDE, DEF_MAP_STYLE,
    DEF_PITCH, DEF_SIZE, DEF_SIZE_SCALE, DEF_ZOOM,
};

/// Current version
pub const CVERSION: usize = 1;
/// Page title
pub const DEF_TITLE: &str = "Global Flight Tracker - Live";
/// Where `serve` listens by default
pub const DEF_LISTEN: &str = "127.0.0.1:8501";

/// Configuration for the CLI tool.
///
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: usize,
    pub feed: FeedConfig,
    pub icon: IconConfig,
    pub transform: TransformConfig,
    pub map: MapConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: CVERSION,
            feed: FeedConfig::default(),
            icon: IconConfig::default(),
            transform: TransformConfig::default(),
            map: MapConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Versioned for Config {
    const VERSION: usize = CVERSION;

    fn version(&self) -> usize {
        self.version
    }
}

/// Upstream feed, durations in seconds.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    /// A zero timeout would fail every request
    #[serde(deserialize_with = "non_zero_secs")]
    pub timeout: u64,
    pub ttl: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            url: DEF_URL.to_string(),
            timeout: DEF_TIMEOUT.as_secs(),
            ttl: DEF_TTL.as_secs(),
        }
    }
}

fn non_zero_secs<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match u64::deserialize(d)? {
        0 => Err(D::Error::custom("feed timeout must be at least 1s")),
        secs => Ok(secs),
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct IconConfig {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub anchor_y: u32,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            url: PLANE_ICON_URL.to_string(),
            width: PLANE_ICON_WIDTH,
            height: PLANE_ICON_HEIGHT,
            anchor_y: PLANE_ICON_ANCHOR_Y,
        }
    }
}

impl From<&IconConfig> for IconData {
    fn from(c: &IconConfig) -> Self {
        IconData {
            url: c.url.clone(),
            width: c.width,
            height: c.height,
            anchor_y: c.anchor_y,
        }
    }
}

/// Record transformer knobs.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransformConfig {
    /// What to do with unknown `on_ground`
    pub ground: GroundPolicy,
    pub clockwise: bool,
    /// Degrees
    pub offset: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        let angle = AngleTransform::default();
        TransformConfig {
            ground: GroundPolicy::default(),
            clockwise: angle.clockwise,
            offset: angle.offset,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    /// Base map style URL
    pub style: String,
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub size: f64,
    pub size_scale: f64,
    /// RGBA
    pub color: [u8; 4],
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            title: DEF_TITLE.to_string(),
            style: DEF_MAP_STYLE.to_string(),
            latitude: DEF_LATITUDE,
            longitude: DEF_LONGITUDE,
            zoom: DEF_ZOOM,
            pitch: DEF_PITCH,
            size: DEF_SIZE,
            size_scale: DEF_SIZE_SCALE,
            color: DEF_COLOR,
        }
    }
}

impl MapConfig {
    /// Build the map for `data` with these settings.
    ///
    pub fn deck<'a>(&self, data: &'a flightmap_formats::FlightTable) -> Deck<'a> {
        let view_state = ViewState {
            latitude: self.latitude,
            longitude: self.longitude,
            zoom: self.zoom,
            pitch: self.pitch,
        };
        let layer = IconLayer::default()
            .size(self.size, self.size_scale)
            .color(self.color);
        Deck::new(data)
            .map_style(&self.style)
            .view_state(view_state)
            .layer(layer)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: DEF_LISTEN.to_string(),
        }
    }
}

impl Config {
    /// The feed source described by the `feed` block.
    ///
    #[tracing::instrument(skip(self))]
    pub fn source(&self) -> Result<Opensky> {
        trace!("source from {}", self.feed.url);
        Ok(Opensky::new(
            &self.feed.url,
            Duration::from_secs(self.feed.timeout),
        )?)
    }

    /// The transformer described by the `icon` and `transform` blocks.
    ///
    pub fn transformer(&self) -> Transformer {
        Transformer::new()
            .icon(IconData::from(&self.icon))
            .ground(self.transform.ground)
            .angle(AngleTransform {
                clockwise: self.transform.clockwise,
                offset: self.transform.offset,
            })
    }

    /// Everything needed for a render cycle.
    ///
    pub fn pipeline(&self) -> Result<Pipeline<Opensky>> {
        let fetcher = FeedFetcher::new(self.source()?, Duration::from_secs(self.feed.ttl));
        Ok(Pipeline::new(fetcher, self.transformer()))
    }
}
