//! Declarative description of the map handed to the browser-side renderer.
//!
//! Nothing is drawn here: `Deck` is serialized into the page and deck.gl does the work.  Field
//! names in the layer are accessors, the browser side reads `d[getIcon]`, `d[getAngle]`, etc.
//!

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use flightmap_formats::{Flight, FlightTable};

use crate::template::substitute;

/// Dark vector base map, no token needed
pub const DEF_MAP_STYLE: &str = "https://basemaps.cartocdn.com/gl/dark-matter-gl-style/style.json";
/// Initial camera, roughly over Israel
pub const DEF_LATITUDE: f64 = 32.0;
pub const DEF_LONGITUDE: f64 = 34.8;
pub const DEF_ZOOM: f64 = 5.;
/// 3-D tilt in degrees
pub const DEF_PITCH: f64 = 45.;
/// Icon size and its multiplier
pub const DEF_SIZE: f64 = 4.;
pub const DEF_SIZE_SCALE: f64 = 15.;
/// Bright yellow stands out on a dark map
pub const DEF_COLOR: [u8; 4] = [255, 200, 0, 255];

/// Hover text, `{field}` being replaced by the value of the hovered flight.
pub const TOOLTIP: &str = "Callsign: {callsign}\nCountry: {origin_country}\nAltitude: {baro_altitude}m\nSpeed: {velocity}m/s\nHeading: {true_track}°";

/// What we show for a `null` value
const MISSING: &str = "-";

/// Initial camera position.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            latitude: DEF_LATITUDE,
            longitude: DEF_LONGITUDE,
            zoom: DEF_ZOOM,
            pitch: DEF_PITCH,
        }
    }
}

/// Icon layer, one icon per flight.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconLayer {
    pub id: String,
    pub get_icon: &'static str,
    pub get_position: [&'static str; 2],
    pub get_angle: &'static str,
    pub get_size: f64,
    pub size_scale: f64,
    pub get_color: [u8; 4],
    pub pickable: bool,
}

impl Default for IconLayer {
    fn default() -> Self {
        IconLayer {
            id: "flights".to_string(),
            get_icon: "icon_data",
            get_position: ["longitude", "latitude"],
            get_angle: "angle",
            get_size: DEF_SIZE,
            size_scale: DEF_SIZE_SCALE,
            get_color: DEF_COLOR,
            pickable: true,
        }
    }
}

impl IconLayer {
    pub fn size(mut self, size: f64, scale: f64) -> Self {
        self.get_size = size;
        self.size_scale = scale;
        self
    }

    pub fn color(mut self, color: [u8; 4]) -> Self {
        self.get_color = color;
        self
    }
}

/// Tooltip template.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
}

impl Default for Tooltip {
    fn default() -> Self {
        Tooltip {
            text: TOOLTIP.to_string(),
        }
    }
}

impl Tooltip {
    /// Fill the template the way the browser does, for terminal output.
    ///
    /// Unknown fields are left as-is, `null` ones become `-` and strings are trimmed (callsigns
    /// come padded with spaces).
    ///
    pub fn render(&self, flight: &Flight) -> String {
        let fields = match serde_json::to_value(flight) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        substitute(&self.text, "{", "}", |key| {
            fields.get(key).map(|v| match v {
                Value::String(s) => s.trim().to_string(),
                Value::Null => MISSING.to_string(),
                v => v.to_string(),
            })
        })
    }
}

/// The complete map: base style, camera, layer, tooltip and data.
///
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck<'a> {
    pub map_style: String,
    #[serde(rename = "initialViewState")]
    pub view_state: ViewState,
    pub layer: IconLayer,
    pub tooltip: Tooltip,
    pub data: &'a FlightTable,
}

impl<'a> Deck<'a> {
    pub fn new(data: &'a FlightTable) -> Self {
        Deck {
            map_style: DEF_MAP_STYLE.to_string(),
            view_state: ViewState::default(),
            layer: IconLayer::default(),
            tooltip: Tooltip::default(),
            data,
        }
    }

    pub fn map_style(mut self, style: &str) -> Self {
        self.map_style = style.to_string();
        self
    }

    pub fn view_state(mut self, view_state: ViewState) -> Self {
        self.view_state = view_state;
        self
    }

    pub fn layer(mut self, layer: IconLayer) -> Self {
        self.layer = layer;
        self
    }
}
