//! Module to load and process the data coming from the Opensky network.
//!
//! XXX they send out an array of arrays, each representing a specific state vector, so the
//!     position in the array is the only thing telling us what a value is.
//!
//! Rows come in three flavours:
//!
//! - 16 fields, the short layout described in `COLUMNS`
//! - 17 fields, the live `/states/all` layout with `vertical_rate` inserted after `true_track`
//! - 18 fields, the same plus the aircraft `category` (`extended=1`)
//!
//! Documentation is taken from [The Opensky site](https://openskynetwork.github.io/opensky-api/rest.html)
//!

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_repr::{Deserialize_repr, Serialize_repr};
use tracing::{debug, trace};

use crate::FormatError;

/// Short row layout, one name per position.
///
pub const COLUMNS: [&str; 16] = [
    "icao24",
    "callsign",
    "origin_country",
    "time_position",
    "last_contact",
    "longitude",
    "latitude",
    "baro_altitude",
    "on_ground",
    "velocity",
    "true_track",
    "sensors",
    "geo_altitude",
    "squawk",
    "spi",
    "position_source",
];

/// Live feed row layout, `category` is only there for extended answers.
///
pub const FEED_COLUMNS: [&str; 18] = [
    "icao24",
    "callsign",
    "origin_country",
    "time_position",
    "last_contact",
    "longitude",
    "latitude",
    "baro_altitude",
    "on_ground",
    "velocity",
    "true_track",
    "vertical_rate",
    "sensors",
    "geo_altitude",
    "squawk",
    "spi",
    "position_source",
    "category",
];

/// Origin of state's position
///
#[derive(Clone, Copy, Debug, Deserialize_repr, Eq, PartialEq, Serialize_repr, strum::Display)]
#[repr(u8)]
pub enum PositionSource {
    #[strum(serialize = "ADS-B")]
    AdsB = 0,
    #[strum(serialize = "ASTERIX")]
    Asterix,
    #[strum(serialize = "MLAT")]
    MLAT,
    #[strum(serialize = "FLARM")]
    FLARM,
}

/// Aircraft category
///
#[derive(Clone, Copy, Debug, Deserialize_repr, Eq, PartialEq, Serialize_repr)]
#[repr(u8)]
pub enum Category {
    NoInfo = 0,
    NoAdsBEmitterCategoryInfo,
    Light,
    Small,
    Large,
    HighVortexLarge,
    Heavy,
    HighPerformance,
    RotorCraft,
    Glider,
    Lighter,
    Skydiver,
    UltraLight,
    Reserved,
    Uav,
    Space,
    SurfaceEmergencyVehicule,
    SurfaceServiceVehicule,
    PointObstacle,
    ClusterObstacle,
    LineObstacle,
}

// Public structs

/// This is the main container for packets sent by the API.
/// It includes a UNIX timestamp and the set of `StateVector`, in the order they were received.
///
/// An empty list is what we use when there is nothing (or nothing usable) to show.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StateList {
    /// UNIX timestamp
    pub time: Option<i64>,
    /// The state vectors
    pub states: Vec<StateVector>,
}

impl StateList {
    /// Deserialize from json
    ///
    /// `"states": null` is the normal answer when there is no traffic and gives an empty list,
    /// whereas a missing `states` field means the answer is not what we expect.
    ///
    #[tracing::instrument(skip(input))]
    pub fn from_json(input: &str) -> Result<Self, FormatError> {
        trace!("statelist::from_json");

        let data: Payload = serde_json::from_str(input)?;

        let rows = match data.states {
            None => return Err(FormatError::MissingStates),
            Some(None) => vec![],
            Some(Some(rows)) => rows,
        };

        let states = rows
            .iter()
            .enumerate()
            .map(|(row, values)| StateVector::from_row(row, values))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("{} points", states.len());

        Ok(StateList {
            time: data.time,
            states,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Definition of a state vector as generated
///
/// Only `icao24` is guaranteed, everything else may be `null` in the feed.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StateVector {
    /// ICAO ID
    pub icao24: String,
    /// Call-sign of the vehicule
    pub callsign: Option<String>,
    /// Origin Country
    pub origin_country: Option<String>,
    pub time_position: Option<i64>,
    pub last_contact: Option<i64>,
    /// Position
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Barometric altitude in meters
    pub baro_altitude: Option<f64>,
    pub on_ground: Option<bool>,
    /// Ground speed in m/s
    pub velocity: Option<f64>,
    /// Compass heading, clockwise from north
    pub true_track: Option<f64>,
    /// m/s, only in the live layout
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<i64>>,
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    pub spi: Option<bool>,
    /// Position source
    pub position_source: Option<PositionSource>,
    /// Aircraft category, only in extended answers
    pub category: Option<Category>,
}

impl StateVector {
    /// Map one positional row onto named fields.  Only a bad `icao24` fails the row, any other
    /// value of the wrong type is logged and treated as `null`.
    ///
    pub fn from_row(row: usize, values: &[Value]) -> Result<Self, FormatError> {
        // Everything after `true_track` moves one slot right in the live layout.
        //
        let shift = match values.len() {
            16 => 0,
            17 | 18 => 1,
            len => return Err(FormatError::BadRow { row, len }),
        };
        let at = |idx: usize| if idx > 10 { idx + shift } else { idx };

        Ok(StateVector {
            icao24: field(row, values, 0, "icao24")?,
            callsign: opt_field(row, values, 1, "callsign"),
            origin_country: opt_field(row, values, 2, "origin_country"),
            time_position: opt_field(row, values, 3, "time_position"),
            last_contact: opt_field(row, values, 4, "last_contact"),
            longitude: opt_field(row, values, 5, "longitude"),
            latitude: opt_field(row, values, 6, "latitude"),
            baro_altitude: opt_field(row, values, 7, "baro_altitude"),
            on_ground: opt_field(row, values, 8, "on_ground"),
            velocity: opt_field(row, values, 9, "velocity"),
            true_track: opt_field(row, values, 10, "true_track"),
            vertical_rate: if shift == 1 {
                opt_field(row, values, 11, "vertical_rate")
            } else {
                None
            },
            sensors: opt_field(row, values, at(11), "sensors"),
            geo_altitude: opt_field(row, values, at(12), "geo_altitude"),
            squawk: opt_field(row, values, at(13), "squawk"),
            spi: opt_field(row, values, at(14), "spi"),
            position_source: opt_field(row, values, at(15), "position_source"),
            category: if values.len() == 18 {
                opt_field(row, values, 17, "category")
            } else {
                None
            },
        })
    }
}

// Private structs

/// Struct returned by the Opensky API
///
#[derive(Debug, Deserialize)]
struct Payload {
    /// UNIX timestamp
    #[serde(default)]
    time: Option<i64>,
    /// State vectors, `None` when missing and `Some(None)` when `null`
    #[serde(default, with = "::serde_with::rust::double_option")]
    states: Option<Option<Vec<Vec<Value>>>>,
}

/// Decode a mandatory value of a row.
///
fn field<T: DeserializeOwned>(
    row: usize,
    values: &[Value],
    idx: usize,
    name: &'static str,
) -> Result<T, FormatError> {
    T::deserialize(&values[idx]).map_err(|source| FormatError::BadField {
        row,
        field: name,
        source,
    })
}

/// Decode an optional value of a row, anything we cannot make sense of is dropped.
///
fn opt_field<T: DeserializeOwned>(
    row: usize,
    values: &[Value],
    idx: usize,
    name: &'static str,
) -> Option<T> {
    Option::<T>::deserialize(&values[idx]).unwrap_or_else(|e| {
        debug!("row {}: ignoring {} = {}: {}", row, name, values[idx], e);
        None
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const SHORT: &str = r##"{"time": 1700000000, "states": [
        ["abc123", "EL123   ", "Israel", 1700000000, 1700000001, 34.8, 32.0, 10000.0, false, 230.5, 90.0, null, 10100.0, "1234", false, 0]
    ]}"##;

    const LIVE: &str = r##"{"time": 1700000000, "states": [
        ["abc123", "EL123   ", "Israel", 1700000000, 1700000001, 34.8, 32.0, 10000.0, false, 230.5, 90.0, -2.5, [1, 2], 10100.0, "1234", false, 0],
        ["def456", null, "France", null, 1700000001, null, null, null, true, null, null, null, null, null, null, false, 2, 4]
    ]}"##;

    #[test]
    fn test_columns_order() {
        assert_eq!("true_track", COLUMNS[10]);
        assert_eq!("sensors", COLUMNS[11]);
        assert_eq!("vertical_rate", FEED_COLUMNS[11]);
        assert_eq!(&COLUMNS[..11], &FEED_COLUMNS[..11]);
    }

    #[test]
    fn test_short_layout() -> Result<(), FormatError> {
        let sl = StateList::from_json(SHORT)?;

        assert_eq!(Some(1700000000), sl.time);
        assert_eq!(1, sl.len());

        let sv = &sl.states[0];
        assert_eq!("abc123", sv.icao24);
        assert_eq!(Some("EL123   ".to_string()), sv.callsign);
        assert_eq!(Some(34.8), sv.longitude);
        assert_eq!(Some(32.0), sv.latitude);
        assert_eq!(Some(false), sv.on_ground);
        assert_eq!(Some(90.0), sv.true_track);
        assert_eq!(None, sv.vertical_rate);
        assert_eq!(None, sv.sensors);
        assert_eq!(Some(10100.0), sv.geo_altitude);
        assert_eq!(Some("1234".to_string()), sv.squawk);
        assert_eq!(Some(PositionSource::AdsB), sv.position_source);
        Ok(())
    }

    #[test]
    fn test_live_layout() -> Result<(), FormatError> {
        let sl = StateList::from_json(LIVE)?;
        assert_eq!(2, sl.len());

        let sv = &sl.states[0];
        assert_eq!(Some(-2.5), sv.vertical_rate);
        assert_eq!(Some(vec![1, 2]), sv.sensors);
        assert_eq!(Some(10100.0), sv.geo_altitude);
        assert_eq!(Some(false), sv.spi);
        assert_eq!(None, sv.category);

        // extended row, with nulls everywhere
        let sv = &sl.states[1];
        assert_eq!("def456", sv.icao24);
        assert_eq!(None, sv.callsign);
        assert_eq!(None, sv.longitude);
        assert_eq!(Some(true), sv.on_ground);
        assert_eq!(Some(PositionSource::MLAT), sv.position_source);
        assert_eq!(Some(Category::Large), sv.category);
        Ok(())
    }

    #[test]
    fn test_null_states_is_empty() -> Result<(), FormatError> {
        let sl = StateList::from_json(r##"{"time": 1700000000, "states": null}"##)?;
        assert!(sl.is_empty());
        assert_eq!(Some(1700000000), sl.time);
        Ok(())
    }

    #[test]
    fn test_missing_states() {
        let sl = StateList::from_json(r##"{"time": 1700000000}"##);
        assert!(matches!(sl, Err(FormatError::MissingStates)));
    }

    #[rstest]
    #[case("not json at all")]
    #[case("")]
    #[case(r##"{"states": "nope"}"##)]
    fn test_malformed_body(#[case] input: &str) {
        assert!(StateList::from_json(input).is_err());
    }

    #[test]
    fn test_bad_row_length() {
        let sl = StateList::from_json(r##"{"states": [["abc123", "EL123", "Israel"]]}"##);
        assert!(matches!(sl, Err(FormatError::BadRow { row: 0, len: 3 })));
    }

    #[rstest]
    #[case(r##"[null, null, null, null, null, null, null, null, null, null, null, null, null, null, null, null]"##)]
    #[case(r##"[42, null, null, null, null, null, null, null, null, null, null, null, null, null, null, null]"##)]
    #[case(r##"[["abc123"], "EL123", null, null, null, null, null, null, null, null, null, null, null, null, null, 0]"##)]
    fn test_bad_icao24(#[case] row: &str) {
        let input = format!(r##"{{"states": [{}]}}"##, row);
        match StateList::from_json(&input) {
            Err(FormatError::BadField { row, field, .. }) => {
                assert_eq!(0, row);
                assert_eq!("icao24", field);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    const GOOD_ROW: &str = r##"["abc123", "EL123   ", "Israel", 1700000000, 1700000001, 34.8, 32.0, 10000.0, false, 230.5, 90.0, null, 10100.0, "1234", false, 0]"##;

    #[rstest]
    #[case(r##"["def456", "AF456   ", "France", 1700000000, 1700000001, 2.3, 48.8, 9000.0, false, 220.0, 10.0, null, 9100.0, "4321", false, 4]"##, "position_source")]
    #[case(r##"["def456", "AF456   ", "France", 1700000000, 1700000001, "east", 48.8, 9000.0, false, 220.0, 10.0, null, 9100.0, "4321", false, 0]"##, "longitude")]
    #[case(r##"["def456", "AF456   ", "France", 1700000000, 1700000001, 2.3, 48.8, 9000.0, "no", 220.0, 10.0, null, 9100.0, "4321", false, 0]"##, "on_ground")]
    #[case(r##"["def456", 1234, "France", 1700000000, 1700000001, 2.3, 48.8, 9000.0, false, 220.0, 10.0, null, 9100.0, "4321", false, 0]"##, "callsign")]
    #[case(r##"["def456", "AF456   ", "France", 1700000000, 1700000001, 2.3, 48.8, 9000.0, false, 220.0, 10.0, "all", 9100.0, "4321", false, 0]"##, "sensors")]
    fn test_bad_optional_field(#[case] bad: &str, #[case] name: &str) -> Result<(), FormatError> {
        let input = format!(r##"{{"time": 1700000000, "states": [{}, {}]}}"##, GOOD_ROW, bad);
        let sl = StateList::from_json(&input)?;
        assert_eq!(2, sl.len());

        let good = &sl.states[0];
        assert_eq!("abc123", good.icao24);
        assert_eq!(Some(34.8), good.longitude);
        assert_eq!(Some(PositionSource::AdsB), good.position_source);

        let sv = &sl.states[1];
        assert_eq!("def456", sv.icao24);
        assert_eq!(Some(48.8), sv.latitude);
        assert_eq!(Some(10.0), sv.true_track);
        match name {
            "position_source" => assert_eq!(None, sv.position_source),
            "longitude" => assert_eq!(None, sv.longitude),
            "on_ground" => assert_eq!(None, sv.on_ground),
            "callsign" => assert_eq!(None, sv.callsign),
            "sensors" => assert_eq!(None, sv.sensors),
            _ => unreachable!(),
        }
        Ok(())
    }
}
