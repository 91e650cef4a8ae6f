//! Display records, what the map layer actually draws.
//!

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::StateVector;

/// Generic plane icon, nose up, so 0° means north.
pub const PLANE_ICON_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/1/17/Plane_icon_nose_up.svg/512px-Plane_icon_nose_up.svg.png";
/// Icon width in pixels
pub const PLANE_ICON_WIDTH: u32 = 512;
/// Icon height in pixels
pub const PLANE_ICON_HEIGHT: u32 = 512;
/// Vertical anchor, the middle of the icon sits on the position
pub const PLANE_ICON_ANCHOR_Y: u32 = 256;

/// Icon descriptor in the shape the icon layer expects.
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IconData {
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "anchorY")]
    pub anchor_y: u32,
}

impl Default for IconData {
    fn default() -> Self {
        IconData {
            url: PLANE_ICON_URL.to_string(),
            width: PLANE_ICON_WIDTH,
            height: PLANE_ICON_HEIGHT,
            anchor_y: PLANE_ICON_ANCHOR_Y,
        }
    }
}

/// One aircraft ready to be drawn.
///
/// Fields of the state vector are flattened so the map sees `longitude`, `callsign`, etc.
/// directly.  `longitude`, `latitude` and `true_track` are always set and `on_ground` is never
/// `true` (cf. `Transformer`).
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Flight {
    #[serde(flatten)]
    pub state: StateVector,
    /// Shared by every row
    pub icon_data: Arc<IconData>,
    /// Rotation of the icon, in degrees
    pub angle: f64,
}

impl Flight {
    /// `[longitude, latitude]`, in that order.
    ///
    pub fn position(&self) -> [f64; 2] {
        [
            self.state.longitude.unwrap_or_default(),
            self.state.latitude.unwrap_or_default(),
        ]
    }
}

impl Deref for Flight {
    type Target = StateVector;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

/// All the flights of one render cycle, same order as the feed.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlightTable {
    flights: Vec<Flight>,
}

impl FlightTable {
    pub fn new(flights: Vec<Flight>) -> Self {
        FlightTable { flights }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flight> {
        self.flights.iter()
    }
}

impl<'a> IntoIterator for &'a FlightTable {
    type Item = &'a Flight;
    type IntoIter = std::slice::Iter<'a, Flight>;

    fn into_iter(self) -> Self::IntoIter {
        self.flights.iter()
    }
}
