//! The record transformer, from the raw `StateList` to the `FlightTable` we draw.
//!
//! Steps, in that order:
//!
//! 1. drop rows without `longitude`, `latitude` or `true_track`
//! 2. drop rows on the ground, unknown `on_ground` being handled by `GroundPolicy`
//! 3. attach the shared icon
//! 4. compute `angle` from `true_track` through `AngleTransform`
//!
//! Row order is kept and nothing is ever repaired or defaulted.
//!

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{EnumString, VariantNames};
use tracing::{debug, trace};

use crate::{Flight, FlightTable, IconData, StateList, StateVector};

/// What to do with a row whose `on_ground` is `null`.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[derive(EnumString, VariantNames, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroundPolicy {
    /// Unknown means excluded, only `Some(false)` goes through
    #[default]
    Drop,
    /// Unknown means airborne
    Keep,
}

impl GroundPolicy {
    /// Is this row airborne according to the policy?
    ///
    #[inline]
    pub fn airborne(&self, on_ground: Option<bool>) -> bool {
        match (self, on_ground) {
            (_, Some(on_ground)) => !on_ground,
            (GroundPolicy::Drop, None) => false,
            (GroundPolicy::Keep, None) => true,
        }
    }
}

/// Conversion from the compass heading to the icon rotation.
///
/// `true_track` is clockwise from north.  Renderers rotating counter-clockwise need
/// `clockwise = false`, a differently oriented icon needs an `offset`.  The default is a plain
/// passthrough.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct AngleTransform {
    /// Keep the heading sign
    pub clockwise: bool,
    /// Added after the sign, in degrees
    pub offset: f64,
}

impl Default for AngleTransform {
    fn default() -> Self {
        AngleTransform {
            clockwise: true,
            offset: 0.,
        }
    }
}

impl AngleTransform {
    #[inline]
    pub fn apply(&self, track: f64) -> f64 {
        let angle = if self.clockwise { track } else { -track };
        angle + self.offset
    }
}

/// Turn raw state vectors into displayable flights.
///
#[derive(Clone, Debug, Default)]
pub struct Transformer {
    /// Icon shared by all rows
    icon: Arc<IconData>,
    /// Handling of unknown `on_ground`
    ground: GroundPolicy,
    /// Heading to rotation
    angle: AngleTransform,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn icon(mut self, icon: IconData) -> Self {
        self.icon = Arc::new(icon);
        self
    }

    pub fn ground(mut self, ground: GroundPolicy) -> Self {
        self.ground = ground;
        self
    }

    pub fn angle(mut self, angle: AngleTransform) -> Self {
        self.angle = angle;
        self
    }

    /// Run all steps on `states`.
    ///
    #[tracing::instrument(skip_all)]
    pub fn transform(&self, states: &StateList) -> FlightTable {
        trace!("transform {} rows", states.len());

        let flights: Vec<Flight> = states
            .states
            .iter()
            .filter(|sv| is_complete(sv))
            .filter(|sv| self.ground.airborne(sv.on_ground))
            .filter_map(|sv| {
                let track = sv.true_track?;
                Some(Flight {
                    state: sv.clone(),
                    icon_data: Arc::clone(&self.icon),
                    angle: self.angle.apply(track),
                })
            })
            .collect();

        debug!("{} rows in, {} flights out", states.len(), flights.len());
        FlightTable::new(flights)
    }
}

/// Position and heading are all present.
///
#[inline]
fn is_complete(sv: &StateVector) -> bool {
    sv.longitude.is_some() && sv.latitude.is_some() && sv.true_track.is_some()
}
